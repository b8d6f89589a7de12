//! Junction-level and gene-level evaluation metrics.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use log::warn;

use crate::error::EvalError;
use crate::matcher::genes::JunctionGenes;
use crate::matcher::nearest::PredictionRanking;
use crate::types::{GenePair, JunctionSet};

/// `count / total * 100`, undefined for an empty denominator.
pub fn percentage(count: usize, total: usize, set: &'static str) -> Result<f64, EvalError> {
    if total == 0 {
        return Err(EvalError::EmptyInputSet { set });
    }
    Ok(count as f64 / total as f64 * 100.0)
}

fn percentage_or_warn(count: usize, total: usize, set: &'static str) -> Option<f64> {
    percentage(count, total, set)
        .map_err(|e| warn!("{}", e))
        .ok()
}

/// Linear interpolation between order statistics at `(n - 1) * p`.
fn quantile(sorted: &[u64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let base = sorted[lo] as f64;
    base + (h - lo as f64) * (sorted[hi] as f64 - base)
}

/// Summary statistics of a distance distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSummary {
    pub min: u64,
    pub max: u64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    pub count: usize,
    /// Sample standard deviation; undefined below two values.
    pub sd: Option<f64>,
}

impl DistanceSummary {
    /// Summarize a set of distances, `None` when it is empty.
    pub fn from_values(values: &[u64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / count as f64;
        let sd = (count > 1).then(|| {
            let ss: f64 = sorted.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Some(DistanceSummary {
            min: sorted[0],
            max: sorted[count - 1],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            mean,
            count,
            sd,
        })
    }
}

impl fmt::Display for DistanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{:.2}:{:.2}:{:.2}:{:.2}:{}:{}",
            self.min,
            self.max,
            self.q1,
            self.median,
            self.q3,
            self.mean,
            self.count,
            fmt_opt(self.sd)
        )
    }
}

/// Format an optional ratio with two decimals, `NA` when undefined.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{:.2}", v))
}

/// Best predicted junction for a common gene pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenePairDistance {
    pub pair: GenePair,
    pub pred_id: String,
    pub ref_id: String,
    pub distance: u64,
}

/// Best summed distance per common gene pair, in `common` order.
///
/// Each predicted junction attributed to a common pair contributes its best
/// candidate; the smallest distance wins and the first junction wins ties.
/// Pairs whose junctions have no candidate are left out.
pub fn gene_pair_distances(
    predicted_genes: &[JunctionGenes],
    rankings: &[PredictionRanking],
    common: &[GenePair],
) -> Vec<GenePairDistance> {
    let common_set: AHashSet<&GenePair> = common.iter().collect();
    let by_pred: AHashMap<&str, &PredictionRanking> =
        rankings.iter().map(|r| (r.pred_id.as_str(), r)).collect();

    let mut best: AHashMap<GenePair, GenePairDistance> = AHashMap::new();
    for genes in predicted_genes {
        let Some(pair) = genes.gene_pair() else {
            continue;
        };
        if !common_set.contains(&pair) {
            continue;
        }
        let Some(candidate) = by_pred
            .get(genes.junction_id.as_str())
            .and_then(|r| r.best_candidate())
        else {
            continue;
        };

        let replace = best
            .get(&pair)
            .map_or(true, |current| candidate.sum_distance < current.distance);
        if replace {
            best.insert(
                pair.clone(),
                GenePairDistance {
                    pair,
                    pred_id: candidate.pred_id.clone(),
                    ref_id: candidate.ref_id.clone(),
                    distance: candidate.sum_distance,
                },
            );
        }
    }

    common.iter().filter_map(|pair| best.remove(pair)).collect()
}

/// Record counts that did not take part in every computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataQuality {
    pub ref_duplicates: usize,
    pub pred_duplicates: usize,
    pub ref_malformed: usize,
    pub pred_malformed: usize,
    pub ref_rejected: usize,
    pub pred_rejected: usize,
    pub skipped_exons: usize,
    /// Valid junctions with at least one breakpoint outside every exon.
    pub ref_without_genes: usize,
    pub pred_without_genes: usize,
}

/// The final evaluation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub reference: usize,
    pub predicted: usize,
    pub common: usize,
    pub ref_not_in_common: usize,
    pub pred_not_in_common: usize,
    pub sensitivity: Option<f64>,
    pub precision: Option<f64>,
    pub close_not_exact: usize,
    pub same_chr_strand: usize,
    pub ref_gene_pairs: usize,
    pub pred_gene_pairs: usize,
    pub common_gene_pairs: usize,
    pub ref_gene_pairs_not_in_common: usize,
    pub pred_gene_pairs_not_in_common: usize,
    pub gene_sensitivity: Option<f64>,
    pub gene_precision: Option<f64>,
    pub common_gene_pairs_swapped: usize,
    pub distance: Option<DistanceSummary>,
    pub quality: DataQuality,
}

/// Gene-level inputs to the summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneCounts {
    pub reference: usize,
    pub predicted: usize,
    pub correct_order: usize,
    pub incorrect_order: usize,
}

impl Summary {
    /// Aggregate stage outputs into one record.
    #[allow(clippy::too_many_arguments)]
    pub fn aggregate(
        reference: &JunctionSet,
        predicted: &JunctionSet,
        common: usize,
        close_not_exact: usize,
        rankings: &[PredictionRanking],
        genes: GeneCounts,
        distances: &[GenePairDistance],
        quality: DataQuality,
    ) -> Self {
        let values: Vec<u64> = distances.iter().map(|d| d.distance).collect();

        Summary {
            reference: reference.len(),
            predicted: predicted.len(),
            common,
            ref_not_in_common: reference.len() - common,
            pred_not_in_common: predicted.len() - common,
            sensitivity: percentage_or_warn(common, reference.len(), "reference"),
            precision: percentage_or_warn(common, predicted.len(), "predicted"),
            close_not_exact,
            same_chr_strand: rankings.iter().filter(|r| r.has_candidates()).count(),
            ref_gene_pairs: genes.reference,
            pred_gene_pairs: genes.predicted,
            common_gene_pairs: genes.correct_order,
            ref_gene_pairs_not_in_common: genes.reference - genes.correct_order,
            pred_gene_pairs_not_in_common: genes.predicted - genes.correct_order,
            gene_sensitivity: percentage_or_warn(
                genes.correct_order,
                genes.reference,
                "reference gene pair",
            ),
            gene_precision: percentage_or_warn(
                genes.correct_order,
                genes.predicted,
                "predicted gene pair",
            ),
            common_gene_pairs_swapped: genes.incorrect_order,
            distance: DistanceSummary::from_values(&values),
            quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::genes::Attribution;
    use crate::matcher::nearest::rank_candidates;
    use crate::types::Junction;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4, "reference").unwrap(), 25.0);
        assert!(matches!(
            percentage(0, 0, "predicted"),
            Err(EvalError::EmptyInputSet { set: "predicted" })
        ));
    }

    #[test]
    fn test_distance_summary() {
        let s = DistanceSummary::from_values(&[8, 2, 4, 6]).unwrap();
        assert_eq!((s.min, s.max, s.count), (2, 8, 4));
        assert_eq!(s.q1, 3.5);
        assert_eq!(s.median, 5.0);
        assert_eq!(s.q3, 6.5);
        assert_eq!(s.mean, 5.0);
        assert!((s.sd.unwrap() - 2.581988897).abs() < 1e-6);
        assert_eq!(s.to_string(), "2:8:3.50:5.00:6.50:5.00:4:2.58");
    }

    #[test]
    fn test_distance_summary_single_and_empty() {
        let s = DistanceSummary::from_values(&[7]).unwrap();
        assert_eq!(s.median, 7.0);
        assert_eq!(s.sd, None);
        assert!(s.to_string().ends_with(":1:NA"));
        assert!(DistanceSummary::from_values(&[]).is_none());
    }

    fn gene(id: &str) -> Attribution {
        Attribution::Gene {
            gene_id: id.to_string(),
            candidates: vec![id.to_string()],
        }
    }

    fn genes(junction: &str, donor: &str, acceptor: &str) -> JunctionGenes {
        JunctionGenes {
            junction_id: junction.to_string(),
            donor: gene(donor),
            acceptor: gene(acceptor),
        }
    }

    #[test]
    fn test_gene_pair_distances_min_per_pair() {
        let reference = vec![Junction::parse("chr1_100_+:chr2_500_+").unwrap()];
        let predicted = vec![
            Junction::parse("chr1_110_+:chr2_500_+").unwrap(),
            Junction::parse("chr1_103_+:chr2_495_+").unwrap(),
            Junction::parse("chr3_1_+:chr4_1_+").unwrap(),
        ];
        let rankings = rank_candidates(&reference, &predicted);
        let predicted_genes = vec![
            genes(&predicted[0].id, "A", "B"),
            genes(&predicted[1].id, "A", "B"),
            genes(&predicted[2].id, "C", "D"),
        ];
        let common = vec![GenePair::new("C", "D"), GenePair::new("A", "B")];

        let distances = gene_pair_distances(&predicted_genes, &rankings, &common);
        assert_eq!(distances.len(), 1);
        assert_eq!(distances[0].pair, GenePair::new("A", "B"));
        assert_eq!(distances[0].pred_id, "chr1_103_+:chr2_495_+");
        assert_eq!(distances[0].ref_id, "chr1_100_+:chr2_500_+");
        assert_eq!(distances[0].distance, 8);
    }

    #[test]
    fn test_summary_empty_predicted_is_undefined() {
        let reference = JunctionSet::from_ids(["chr1_1_+:chr1_9_+"]);
        let predicted = JunctionSet::default();
        let summary = Summary::aggregate(
            &reference,
            &predicted,
            0,
            0,
            &[],
            GeneCounts::default(),
            &[],
            DataQuality::default(),
        );
        assert_eq!(summary.sensitivity, Some(0.0));
        assert_eq!(summary.precision, None);
        assert_eq!(summary.gene_sensitivity, None);
        assert_eq!(summary.ref_not_in_common, 1);
        assert!(summary.distance.is_none());
    }
}
