//! Core data structures for chimeval.
//!
//! This module contains the genomic model shared by every evaluation stage:
//! breakpoints, junctions, annotation exons and genes, and the transient
//! keys (match candidates, gene pairs) produced while comparing two sets.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use log::warn;

use crate::error::EvalError;

/// Marker used by upstream tools for an unknown coordinate field.
pub const UNKNOWN_MARKER: &str = "NA";

/// Strand orientation for genomic features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Positive,
    Negative,
}

impl Strand {
    /// Parse strand from a string ('+' or '-').
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Strand::Positive),
            "-" => Some(Strand::Negative),
            _ => None,
        }
    }

    /// Convert strand to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One side of a chimeric junction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    pub chrom: String,
    /// 1-based genomic position.
    pub position: u64,
    pub strand: Strand,
}

impl Breakpoint {
    pub fn new(chrom: impl Into<String>, position: u64, strand: Strand) -> Self {
        Breakpoint {
            chrom: chrom.into(),
            position,
            strand,
        }
    }

    /// True when both breakpoints lie on the same chromosome and strand.
    ///
    /// Distances and overlaps are only defined between such breakpoints.
    pub fn same_locus(&self, other: &Breakpoint) -> bool {
        self.strand == other.strand && self.chrom == other.chrom
    }

    /// Absolute distance to another breakpoint, or `None` across loci.
    pub fn distance(&self, other: &Breakpoint) -> Option<u64> {
        if self.same_locus(other) {
            Some(self.position.abs_diff(other.position))
        } else {
            None
        }
    }

    /// Parse one side of a junction id (`chrom_position_strand`).
    ///
    /// The chromosome may itself contain underscores, so fields are taken
    /// from the right.
    fn parse(side: &str, id: &str) -> Result<Self, EvalError> {
        let malformed = |reason: &str| EvalError::MalformedJunctionId {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = side.rsplitn(3, '_');
        let strand = fields.next().ok_or_else(|| malformed("missing strand"))?;
        let position = fields.next().ok_or_else(|| malformed("missing position"))?;
        let chrom = fields.next().ok_or_else(|| malformed("missing chromosome"))?;

        if [chrom, position, strand].contains(&UNKNOWN_MARKER) {
            return Err(malformed("unknown coordinate"));
        }
        if chrom.is_empty() {
            return Err(malformed("empty chromosome"));
        }

        let position: u64 = position
            .parse()
            .map_err(|_| malformed("position is not an integer"))?;
        if position == 0 {
            return Err(malformed("position must be >= 1"));
        }
        let strand = Strand::from_str(strand).ok_or_else(|| malformed("strand must be + or -"))?;

        Ok(Breakpoint::new(chrom, position, strand))
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.chrom, self.position, self.strand)
    }
}

/// A chimeric junction: donor (5') and acceptor (3') breakpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Junction {
    pub id: String,
    pub donor: Breakpoint,
    pub acceptor: Breakpoint,
}

impl Junction {
    /// Parse a canonical junction id (`chrA_posA_strandA:chrB_posB_strandB`).
    pub fn parse(id: &str) -> Result<Self, EvalError> {
        let (donor, acceptor) =
            id.split_once(':')
                .ok_or_else(|| EvalError::MalformedJunctionId {
                    id: id.to_string(),
                    reason: "missing ':' between donor and acceptor".to_string(),
                })?;

        Ok(Junction {
            id: id.to_string(),
            donor: Breakpoint::parse(donor, id)?,
            acceptor: Breakpoint::parse(acceptor, id)?,
        })
    }
}

/// A de-duplicated collection of junctions read from one input.
///
/// Every well-formed id takes part in exact matching; only ids that parse
/// into coordinates take part in overlap and distance computations.
#[derive(Debug, Clone, Default)]
pub struct JunctionSet {
    /// Distinct ids in first-seen order.
    pub ids: IndexSet<String>,
    /// Junctions with usable coordinates, in the same relative order as `ids`.
    pub junctions: Vec<Junction>,
    /// Number of repeated ids that were dropped.
    pub duplicates: usize,
    /// Number of distinct ids excluded from coordinate-based work.
    pub malformed: usize,
    /// Number of records discarded outright (empty or whitespace-bearing ids).
    pub rejected: usize,
}

impl JunctionSet {
    /// Build a set from ids in input order.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = JunctionSet::default();

        for id in ids {
            let id = id.as_ref();
            if id.is_empty() || id.chars().any(char::is_whitespace) {
                set.rejected += 1;
                continue;
            }
            if !set.ids.insert(id.to_string()) {
                set.duplicates += 1;
                continue;
            }
            match Junction::parse(id) {
                Ok(junction) => set.junctions.push(junction),
                Err(e) => {
                    warn!("{}", e);
                    set.malformed += 1;
                }
            }
        }

        set
    }

    /// Number of distinct ids (the set size used for exact-match metrics).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// An annotated exon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub gene_id: String,
    pub transcript_id: String,
}

/// Per-gene summary derived from the annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    pub gene_id: String,
    /// Name from the first annotation record seen for this gene id.
    pub gene_name: String,
    /// Number of exon records carrying this gene id.
    pub exon_count: usize,
}

/// Parsed genome annotation.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// Exons in annotation order.
    pub exons: Vec<ExonInterval>,
    /// Gene records keyed by gene id, in first-seen order.
    pub genes: IndexMap<String, GeneRecord>,
    /// Exon records skipped for missing gene or transcript ids.
    pub skipped_exons: usize,
}

impl Annotation {
    /// Build an annotation from `(exon, gene_name)` records in file order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (ExonInterval, String)>,
    {
        let mut annotation = Annotation::default();
        for (exon, gene_name) in records {
            annotation.push(exon, gene_name);
        }
        annotation
    }

    /// Add one exon record. The first name seen for a gene id sticks.
    pub fn push(&mut self, exon: ExonInterval, gene_name: String) {
        self.genes
            .entry(exon.gene_id.clone())
            .or_insert_with(|| GeneRecord {
                gene_id: exon.gene_id.clone(),
                gene_name,
                exon_count: 0,
            })
            .exon_count += 1;
        self.exons.push(exon);
    }

    pub fn gene(&self, gene_id: &str) -> Option<&GeneRecord> {
        self.genes.get(gene_id)
    }

    /// Gene name for reporting; falls back to the id for unknown genes.
    pub fn gene_name<'a>(&'a self, gene_id: &'a str) -> &'a str {
        self.genes
            .get(gene_id)
            .map(|g| g.gene_name.as_str())
            .unwrap_or(gene_id)
    }
}

/// Distances between one predicted junction and one reference junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub ref_id: String,
    pub pred_id: String,
    pub donor_distance: u64,
    pub acceptor_distance: u64,
    pub sum_distance: u64,
}

impl MatchCandidate {
    pub fn new(ref_id: String, pred_id: String, donor_distance: u64, acceptor_distance: u64) -> Self {
        MatchCandidate {
            ref_id,
            pred_id,
            donor_distance,
            acceptor_distance,
            sum_distance: donor_distance.saturating_add(acceptor_distance),
        }
    }
}

/// Ordered (donor gene, acceptor gene) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenePair {
    pub donor: String,
    pub acceptor: String,
}

impl GenePair {
    pub fn new(donor: impl Into<String>, acceptor: impl Into<String>) -> Self {
        GenePair {
            donor: donor.into(),
            acceptor: acceptor.into(),
        }
    }

    /// The same genes in acceptor-donor order.
    pub fn swapped(&self) -> Self {
        GenePair {
            donor: self.acceptor.clone(),
            acceptor: self.donor.clone(),
        }
    }
}

impl fmt::Display for GenePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.donor, self.acceptor)
    }
}
