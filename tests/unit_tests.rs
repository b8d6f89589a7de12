//! Behavioral tests for the evaluation stages, grouped by component.

use chimeval::config::Config;
use chimeval::evaluate::evaluate;
use chimeval::matcher::close::close_matches;
use chimeval::matcher::exact::common_ids;
use chimeval::matcher::genes::{compare_gene_pairs, GeneAttributor};
use chimeval::matcher::nearest::{rank_candidates, Ranking};
use chimeval::types::{Annotation, ExonInterval, GenePair, Junction, JunctionSet, Strand};
use indexmap::IndexSet;

// -------------------------------------------------------------------------
// Helper functions
// -------------------------------------------------------------------------

fn junctions(ids: &[&str]) -> Vec<Junction> {
    ids.iter().map(|id| Junction::parse(id).unwrap()).collect()
}

fn exon(chrom: &str, start: u64, end: u64, strand: Strand, gene: &str) -> (ExonInterval, String) {
    (
        ExonInterval {
            chrom: chrom.to_string(),
            start,
            end,
            strand,
            gene_id: gene.to_string(),
            transcript_id: format!("{}-T1", gene),
        },
        format!("{}-name", gene),
    )
}

fn pairs(items: &[(&str, &str)]) -> IndexSet<GenePair> {
    items.iter().map(|(d, a)| GenePair::new(*d, *a)).collect()
}

// -------------------------------------------------------------------------
// Exact matching
// -------------------------------------------------------------------------

mod test_exact {
    use super::*;

    #[test]
    fn test_sensitivity_100_iff_reference_subset() {
        let reference = JunctionSet::from_ids(["a_1_+:b_2_+", "c_3_+:d_4_+"]);
        let predicted = JunctionSet::from_ids(["c_3_+:d_4_+", "a_1_+:b_2_+", "e_5_+:f_6_+"]);
        let eval = evaluate(&reference, &predicted, &Annotation::default(), &Config::default());

        assert_eq!(eval.summary.common, 2);
        assert_eq!(eval.summary.sensitivity, Some(100.0));
        assert!(eval.summary.precision.unwrap() < 100.0);
    }

    #[test]
    fn test_common_is_symmetric_in_count() {
        let reference = JunctionSet::from_ids(["a_1_+:b_2_+", "c_3_+:d_4_+"]);
        let predicted = JunctionSet::from_ids(["c_3_+:d_4_+"]);
        assert_eq!(
            common_ids(&reference, &predicted).len(),
            common_ids(&predicted, &reference).len()
        );
    }

    #[test]
    fn test_empty_predicted_precision_undefined() {
        let reference = JunctionSet::from_ids(["a_1_+:b_2_+"]);
        let predicted = JunctionSet::from_ids(Vec::<String>::new());
        let eval = evaluate(&reference, &predicted, &Annotation::default(), &Config::default());

        assert_eq!(eval.summary.precision, None);
        assert_eq!(eval.summary.sensitivity, Some(0.0));
        assert!(eval.rankings.is_empty());
    }

    #[test]
    fn test_empty_reference_sensitivity_undefined() {
        let reference = JunctionSet::default();
        let predicted = JunctionSet::from_ids(["a_1_+:b_2_+"]);
        let eval = evaluate(&reference, &predicted, &Annotation::default(), &Config::default());

        assert_eq!(eval.summary.sensitivity, None);
        assert_eq!(eval.summary.precision, Some(0.0));
        assert_eq!(eval.rankings[0].ranking, Ranking::NoCandidate);
    }
}

// -------------------------------------------------------------------------
// Close matching
// -------------------------------------------------------------------------

mod test_close {
    use super::*;

    #[test]
    fn test_example_close_match() {
        let reference = junctions(&["chr1_100_+:chr2_500_+"]);
        let predicted = junctions(&["chr1_103_+:chr2_495_+"]);
        let close = close_matches(&reference, &predicted, &IndexSet::new(), 50);
        assert_eq!(close["chr1_100_+:chr2_500_+"], vec!["chr1_103_+:chr2_495_+"]);
    }

    #[test]
    fn test_zero_tolerance_only_same_position() {
        let reference = junctions(&["chr1_100_+:chr2_500_+"]);
        let predicted = junctions(&["chr1_101_+:chr2_500_+"]);
        assert!(close_matches(&reference, &predicted, &IndexSet::new(), 0).is_empty());
    }

    #[test]
    fn test_close_not_exact_count_in_summary() {
        let reference = JunctionSet::from_ids([
            "chr1_100_+:chr2_500_+",
            "chr1_1000_+:chr2_5000_+",
            "chr7_1_+:chr8_1_+",
        ]);
        let predicted = JunctionSet::from_ids([
            "chr1_100_+:chr2_500_+",
            "chr1_103_+:chr2_495_+",
            "chr1_1010_+:chr2_4990_+",
        ]);
        let eval = evaluate(&reference, &predicted, &Annotation::default(), &Config::default());

        assert_eq!(eval.summary.close_not_exact, 1);
        assert_eq!(
            eval.close_matches["chr1_1000_+:chr2_5000_+"],
            vec!["chr1_1010_+:chr2_4990_+"]
        );
    }

    #[test]
    fn test_malformed_junctions_excluded_from_overlap() {
        let reference = JunctionSet::from_ids(["chr1_NA_+:chr2_500_+"]);
        let predicted = JunctionSet::from_ids(["chr1_100_+:chr2_500_+"]);
        let eval = evaluate(&reference, &predicted, &Annotation::default(), &Config::default());

        assert!(eval.close_matches.is_empty());
        assert_eq!(eval.summary.same_chr_strand, 0);
        assert_eq!(eval.summary.quality.ref_malformed, 1);
        // Still counted for exact-match totals.
        assert_eq!(eval.summary.reference, 1);
    }
}

// -------------------------------------------------------------------------
// Nearest candidates
// -------------------------------------------------------------------------

mod test_nearest {
    use super::*;

    #[test]
    fn test_unbounded_distance() {
        let reference = junctions(&["chr1_100_+:chr2_500_+"]);
        let predicted = junctions(&["chr1_90000000_+:chr2_1_+"]);
        let rankings = rank_candidates(&reference, &predicted);
        let best = rankings[0].best_candidate().unwrap();
        assert_eq!(best.donor_distance, 89_999_900);
        assert_eq!(best.acceptor_distance, 499);
    }

    #[test]
    fn test_acceptor_locus_must_match() {
        let reference = junctions(&["chr1_100_+:chr2_500_+"]);
        let predicted = junctions(&["chr1_100_+:chr2_500_-"]);
        let rankings = rank_candidates(&reference, &predicted);
        assert_eq!(rankings[0].ranking, Ranking::NoCandidate);
    }

    #[test]
    fn test_rankings_follow_predicted_order() {
        let reference = junctions(&["chr1_100_+:chr2_500_+"]);
        let predicted = junctions(&[
            "chr1_300_+:chr2_500_+",
            "chr1_200_+:chr2_500_+",
            "chr1_100_+:chr2_600_+",
        ]);
        let ids: Vec<String> = rank_candidates(&reference, &predicted)
            .into_iter()
            .map(|r| r.pred_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "chr1_300_+:chr2_500_+",
                "chr1_200_+:chr2_500_+",
                "chr1_100_+:chr2_600_+"
            ]
        );
    }
}

// -------------------------------------------------------------------------
// Gene attribution
// -------------------------------------------------------------------------

mod test_genes {
    use super::*;

    fn annotation() -> Annotation {
        Annotation::from_records([
            exon("chr1", 100, 200, Strand::Positive, "SHORT"),
            exon("chr1", 150, 400, Strand::Positive, "LONG"),
            exon("chr1", 1000, 1100, Strand::Positive, "LONG"),
            exon("chr1", 2000, 2100, Strand::Positive, "LONG"),
            exon("chr2", 500, 600, Strand::Positive, "PARTNER"),
        ])
    }

    #[test]
    fn test_more_exons_beats_annotation_order() {
        let annotation = annotation();
        let attributor = GeneAttributor::new(&annotation);
        let j = Junction::parse("chr1_160_+:chr2_550_+").unwrap();
        let genes = attributor.attribute_junction(&j);
        assert_eq!(genes.gene_pair(), Some(GenePair::new("LONG", "PARTNER")));
    }

    #[test]
    fn test_no_overlap_excluded_from_gene_level_only() {
        let annotation = annotation();
        let reference = JunctionSet::from_ids(["chr1_160_+:chr2_550_+", "chr1_5000_+:chr2_550_+"]);
        let predicted = JunctionSet::from_ids(["chr1_160_+:chr2_550_+", "chr1_5000_+:chr2_550_+"]);
        let eval = evaluate(&reference, &predicted, &annotation, &Config::default());

        assert_eq!(eval.summary.common, 2);
        assert_eq!(eval.summary.ref_gene_pairs, 1);
        assert_eq!(eval.summary.quality.ref_without_genes, 1);
        assert_eq!(eval.summary.quality.pred_without_genes, 1);
    }

    #[test]
    fn test_gene_pairs_deduplicated() {
        let annotation = annotation();
        let reference = JunctionSet::from_ids(["chr1_160_+:chr2_550_+", "chr1_1050_+:chr2_510_+"]);
        let predicted = JunctionSet::from_ids(["chr1_170_+:chr2_560_+"]);
        let eval = evaluate(&reference, &predicted, &annotation, &Config::default());

        assert_eq!(eval.summary.ref_gene_pairs, 1);
        assert_eq!(eval.summary.pred_gene_pairs, 1);
        assert_eq!(eval.summary.common_gene_pairs, 1);
        assert_eq!(eval.summary.gene_sensitivity, Some(100.0));
        assert_eq!(eval.summary.common, 0);
    }

    #[test]
    fn test_order_swap_fixture() {
        let reference = pairs(&[("A", "B"), ("C", "D")]);
        let predicted = pairs(&[("A", "B"), ("B", "A")]);
        let cmp = compare_gene_pairs(&reference, &predicted);
        assert_eq!(cmp.correct_order.len(), 1);
        assert_eq!(cmp.incorrect_order.len(), 0);
    }

    #[test]
    fn test_swapped_pair_counted_in_summary() {
        let annotation = Annotation::from_records([
            exon("chr1", 100, 200, Strand::Positive, "A"),
            exon("chr2", 100, 200, Strand::Positive, "B"),
        ]);
        let reference = JunctionSet::from_ids(["chr1_150_+:chr2_150_+"]);
        let predicted = JunctionSet::from_ids(["chr2_150_+:chr1_150_+"]);
        let eval = evaluate(&reference, &predicted, &annotation, &Config::default());

        assert_eq!(eval.summary.common_gene_pairs, 0);
        assert_eq!(eval.summary.common_gene_pairs_swapped, 1);
        assert_eq!(eval.summary.gene_precision, Some(0.0));
    }
}

// -------------------------------------------------------------------------
// Distance distribution
// -------------------------------------------------------------------------

mod test_distances {
    use super::*;

    #[test]
    fn test_distribution_over_common_gene_pairs() {
        let annotation = Annotation::from_records([
            exon("chr1", 1, 1000, Strand::Positive, "A"),
            exon("chr2", 1, 1000, Strand::Positive, "B"),
            exon("chr3", 1, 1000, Strand::Positive, "C"),
            exon("chr4", 1, 1000, Strand::Positive, "D"),
        ]);
        let reference = JunctionSet::from_ids(["chr1_100_+:chr2_500_+", "chr3_100_+:chr4_100_+"]);
        let predicted = JunctionSet::from_ids([
            "chr1_103_+:chr2_495_+",
            "chr1_150_+:chr2_500_+",
            "chr3_120_+:chr4_110_+",
        ]);
        let eval = evaluate(&reference, &predicted, &annotation, &Config::default());

        let distances: Vec<u64> = eval.gene_pair_distances.iter().map(|d| d.distance).collect();
        assert_eq!(distances, vec![8, 30]);
        assert_eq!(eval.gene_pair_distances[0].pred_id, "chr1_103_+:chr2_495_+");

        let summary = eval.summary.distance.unwrap();
        assert_eq!((summary.min, summary.max, summary.count), (8, 30, 2));
        assert_eq!(summary.median, 19.0);
    }
}
