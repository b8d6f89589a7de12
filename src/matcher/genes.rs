//! Breakpoint-to-gene attribution and gene-pair comparison.
//!
//! A breakpoint is attributed to the gene with the most annotated exons among
//! the genes whose exons overlap it. Overlapping exons are visited in
//! annotation order and the first gene wins ties. This is an approximation,
//! kept exactly as is so results stay reproducible.

use indexmap::IndexSet;
use log::debug;
use rayon::prelude::*;

use crate::error::EvalError;
use crate::matcher::interval::{Interval, IntervalIndex};
use crate::matcher::reduce::unique;
use crate::types::{Annotation, Breakpoint, GenePair, Junction};

/// Gene resolution for one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    Gene {
        gene_id: String,
        /// Distinct overlapping genes in annotation order.
        candidates: Vec<String>,
    },
    NoOverlap {
        /// Distance to the closest exon on the same chromosome and strand.
        nearest_exon_distance: Option<u64>,
    },
}

impl Attribution {
    pub fn gene_id(&self) -> Option<&str> {
        match self {
            Attribution::Gene { gene_id, .. } => Some(gene_id),
            Attribution::NoOverlap { .. } => None,
        }
    }
}

/// Gene attribution for both sides of a junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionGenes {
    pub junction_id: String,
    pub donor: Attribution,
    pub acceptor: Attribution,
}

impl JunctionGenes {
    /// Gene pair, when both breakpoints were attributed.
    pub fn gene_pair(&self) -> Option<GenePair> {
        Some(GenePair::new(self.donor.gene_id()?, self.acceptor.gene_id()?))
    }
}

/// Pick the candidate with the largest exon count; first wins ties.
pub fn best_gene<'a>(candidates: &'a [String], annotation: &Annotation) -> Option<&'a str> {
    let exon_count = |id: &str| annotation.gene(id).map_or(0, |g| g.exon_count);

    let mut best: Option<(&str, usize)> = None;
    for id in candidates {
        let count = exon_count(id);
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((id.as_str(), count)),
        }
    }
    best.map(|(id, _)| id)
}

/// Exon index over an annotation, used to attribute breakpoints to genes.
pub struct GeneAttributor<'a> {
    annotation: &'a Annotation,
    /// Payload is the exon's position in annotation order.
    exons: IntervalIndex<usize>,
}

impl<'a> GeneAttributor<'a> {
    pub fn new(annotation: &'a Annotation) -> Self {
        let exons = IntervalIndex::build(annotation.exons.iter().enumerate().map(|(i, e)| {
            (e.chrom.clone(), e.strand, Interval::new(e.start, e.end, i))
        }));
        GeneAttributor { annotation, exons }
    }

    /// Distinct genes whose exons overlap the breakpoint, in annotation order.
    pub fn overlapping_genes(&self, breakpoint: &Breakpoint) -> Vec<String> {
        let mut ordinals: Vec<usize> = self
            .exons
            .overlapping(
                &breakpoint.chrom,
                breakpoint.strand,
                breakpoint.position,
                breakpoint.position,
            )
            .map(|iv| iv.payload)
            .collect();
        ordinals.sort_unstable();

        unique(
            ordinals
                .into_iter()
                .map(|i| self.annotation.exons[i].gene_id.clone()),
        )
    }

    /// Resolve a breakpoint to its most likely gene.
    pub fn attribute(&self, breakpoint: &Breakpoint) -> Attribution {
        let candidates = self.overlapping_genes(breakpoint);

        match best_gene(&candidates, self.annotation).map(str::to_string) {
            Some(gene_id) => Attribution::Gene {
                gene_id,
                candidates,
            },
            None => {
                debug!(
                    "{}",
                    EvalError::NoGeneOverlap {
                        breakpoint: breakpoint.to_string()
                    }
                );
                Attribution::NoOverlap {
                    nearest_exon_distance: self
                        .exons
                        .nearest(&breakpoint.chrom, breakpoint.strand, breakpoint.position)
                        .map(|n| n.distance),
                }
            }
        }
    }

    pub fn attribute_junction(&self, junction: &Junction) -> JunctionGenes {
        JunctionGenes {
            junction_id: junction.id.clone(),
            donor: self.attribute(&junction.donor),
            acceptor: self.attribute(&junction.acceptor),
        }
    }

    /// Attribute every junction, preserving input order.
    pub fn attribute_all(&self, junctions: &[Junction]) -> Vec<JunctionGenes> {
        junctions
            .par_iter()
            .map(|j| self.attribute_junction(j))
            .collect()
    }
}

/// Distinct gene pairs of attributed junctions, in first-seen order.
pub fn gene_pairs(genes: &[JunctionGenes]) -> IndexSet<GenePair> {
    genes.iter().filter_map(JunctionGenes::gene_pair).collect()
}

/// Common gene pairs between reference and prediction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenePairComparison {
    /// Pairs present in both sets in the same orientation.
    pub correct_order: Vec<GenePair>,
    /// Remaining reference pairs found only as a swapped predicted pair.
    pub incorrect_order: Vec<GenePair>,
}

/// Compare two gene-pair sets, in reference order.
pub fn compare_gene_pairs(
    reference: &IndexSet<GenePair>,
    predicted: &IndexSet<GenePair>,
) -> GenePairComparison {
    let mut comparison = GenePairComparison::default();
    for pair in reference {
        if predicted.contains(pair) {
            comparison.correct_order.push(pair.clone());
        } else if predicted.contains(&pair.swapped()) {
            comparison.incorrect_order.push(pair.clone());
        }
    }
    comparison
}
