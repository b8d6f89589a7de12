//! End-to-end evaluation of a predicted junction set against a reference.
//!
//! Stages run in dependency order over immutable inputs: exact matching,
//! close matching, nearest-candidate ranking, gene attribution, gene-pair
//! comparison, then aggregation.

use indexmap::{IndexMap, IndexSet};
use log::info;

use crate::config::Config;
use crate::matcher::close::close_matches;
use crate::matcher::exact::common_ids;
use crate::matcher::genes::{
    compare_gene_pairs, gene_pairs, GeneAttributor, GenePairComparison, JunctionGenes,
};
use crate::matcher::nearest::{rank_candidates, PredictionRanking};
use crate::metrics::{gene_pair_distances, DataQuality, GeneCounts, GenePairDistance, Summary};
use crate::types::{Annotation, GenePair, JunctionSet};

/// Every output of one evaluation run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub summary: Summary,
    /// Ids present in both sets, in reference order.
    pub common: Vec<String>,
    /// Non-exact reference id -> close predicted ids.
    pub close_matches: IndexMap<String, Vec<String>>,
    /// One ranking per valid predicted junction, in predicted order.
    pub rankings: Vec<PredictionRanking>,
    pub reference_genes: Vec<JunctionGenes>,
    pub predicted_genes: Vec<JunctionGenes>,
    pub reference_pairs: IndexSet<GenePair>,
    pub predicted_pairs: IndexSet<GenePair>,
    pub gene_pairs: GenePairComparison,
    pub gene_pair_distances: Vec<GenePairDistance>,
}

fn without_genes(genes: &[JunctionGenes]) -> usize {
    genes.iter().filter(|g| g.gene_pair().is_none()).count()
}

/// Run the full evaluation.
pub fn evaluate(
    reference: &JunctionSet,
    predicted: &JunctionSet,
    annotation: &Annotation,
    config: &Config,
) -> Evaluation {
    let common = common_ids(reference, predicted);
    info!(
        "{} reference, {} predicted, {} in common",
        reference.len(),
        predicted.len(),
        common.len()
    );

    let exact: IndexSet<String> = common.iter().cloned().collect();
    let close = close_matches(
        &reference.junctions,
        &predicted.junctions,
        &exact,
        config.tolerance,
    );
    info!(
        "{} reference junctions closely matched (tolerance {} bp)",
        close.len(),
        config.tolerance
    );

    let rankings = rank_candidates(&reference.junctions, &predicted.junctions);

    let attributor = GeneAttributor::new(annotation);
    let reference_genes = attributor.attribute_all(&reference.junctions);
    let predicted_genes = attributor.attribute_all(&predicted.junctions);

    let reference_pairs = gene_pairs(&reference_genes);
    let predicted_pairs = gene_pairs(&predicted_genes);
    let comparison = compare_gene_pairs(&reference_pairs, &predicted_pairs);
    info!(
        "{} reference gene pairs, {} predicted, {} in common ({} swapped)",
        reference_pairs.len(),
        predicted_pairs.len(),
        comparison.correct_order.len(),
        comparison.incorrect_order.len()
    );

    let distances = gene_pair_distances(&predicted_genes, &rankings, &comparison.correct_order);

    let quality = DataQuality {
        ref_duplicates: reference.duplicates,
        pred_duplicates: predicted.duplicates,
        ref_malformed: reference.malformed,
        pred_malformed: predicted.malformed,
        ref_rejected: reference.rejected,
        pred_rejected: predicted.rejected,
        skipped_exons: annotation.skipped_exons,
        ref_without_genes: without_genes(&reference_genes),
        pred_without_genes: without_genes(&predicted_genes),
    };

    let summary = Summary::aggregate(
        reference,
        predicted,
        common.len(),
        close.len(),
        &rankings,
        GeneCounts {
            reference: reference_pairs.len(),
            predicted: predicted_pairs.len(),
            correct_order: comparison.correct_order.len(),
            incorrect_order: comparison.incorrect_order.len(),
        },
        &distances,
        quality,
    );

    Evaluation {
        summary,
        common,
        close_matches: close,
        rankings,
        reference_genes,
        predicted_genes,
        reference_pairs,
        predicted_pairs,
        gene_pairs: comparison,
        gene_pair_distances: distances,
    }
}
