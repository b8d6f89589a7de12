//! Report writers.
//!
//! All reports are tab-separated text files written into one directory.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::evaluate::Evaluation;
use crate::matcher::genes::{Attribution, JunctionGenes};
use crate::matcher::nearest::{PredictionRanking, Ranking};
use crate::metrics::{fmt_opt, GenePairDistance, Summary};
use crate::types::Annotation;

pub const SUMMARY_FILE: &str = "summary.tsv";
pub const COMMON_FILE: &str = "common_junctions.txt";
pub const CLOSE_FILE: &str = "close_matches.tsv";
pub const NEAREST_FILE: &str = "nearest_candidates.tsv";
pub const GENE_PAIR_FILE: &str = "gene_pair_distances.tsv";
pub const REFERENCE_GENES_FILE: &str = "reference_genes.tsv";
pub const PREDICTED_GENES_FILE: &str = "predicted_genes.tsv";

/// Marker written for predicted junctions without any candidate.
pub const NO_CANDIDATE: &str = "NO_CANDIDATE";

const SUMMARY_COLUMNS: [&str; 27] = [
    "ref",
    "pred",
    "common",
    "ref_not_in_common",
    "pred_not_in_common",
    "sensitivity",
    "precision",
    "close_not_exact",
    "samechrstr",
    "refgn",
    "predgn",
    "commongn",
    "refgn_not_in_commongn",
    "predgn_not_in_commongn",
    "sngn",
    "precgn",
    "commongn2",
    "sum_don_acc_dist",
    "ref_duplicates",
    "pred_duplicates",
    "ref_malformed",
    "pred_malformed",
    "ref_rejected",
    "pred_rejected",
    "skipped_exons",
    "ref_without_genes",
    "pred_without_genes",
];

/// Summary header line.
pub fn summary_header() -> String {
    SUMMARY_COLUMNS.join("\t")
}

/// Summary values, in header order.
pub fn format_summary_line(summary: &Summary) -> String {
    let q = &summary.quality;
    let fields = [
        summary.reference.to_string(),
        summary.predicted.to_string(),
        summary.common.to_string(),
        summary.ref_not_in_common.to_string(),
        summary.pred_not_in_common.to_string(),
        fmt_opt(summary.sensitivity),
        fmt_opt(summary.precision),
        summary.close_not_exact.to_string(),
        summary.same_chr_strand.to_string(),
        summary.ref_gene_pairs.to_string(),
        summary.pred_gene_pairs.to_string(),
        summary.common_gene_pairs.to_string(),
        summary.ref_gene_pairs_not_in_common.to_string(),
        summary.pred_gene_pairs_not_in_common.to_string(),
        fmt_opt(summary.gene_sensitivity),
        fmt_opt(summary.gene_precision),
        summary.common_gene_pairs_swapped.to_string(),
        summary
            .distance
            .as_ref()
            .map_or_else(|| "NA".to_string(), |d| d.to_string()),
        q.ref_duplicates.to_string(),
        q.pred_duplicates.to_string(),
        q.ref_malformed.to_string(),
        q.pred_malformed.to_string(),
        q.ref_rejected.to_string(),
        q.pred_rejected.to_string(),
        q.skipped_exons.to_string(),
        q.ref_without_genes.to_string(),
        q.pred_without_genes.to_string(),
    ];
    fields.join("\t")
}

/// Candidate lines for one predicted junction.
pub fn format_ranking_lines(ranking: &PredictionRanking) -> Vec<String> {
    match &ranking.ranking {
        Ranking::NoCandidate => vec![format!(
            "{}\t{}\tNA\tNA\tNA\t0",
            ranking.pred_id, NO_CANDIDATE
        )],
        Ranking::Candidates(candidates) => candidates
            .iter()
            .map(|c| {
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    ranking.pred_id,
                    c.candidate.ref_id,
                    c.candidate.donor_distance,
                    c.candidate.acceptor_distance,
                    c.candidate.sum_distance,
                    u8::from(c.best)
                )
            })
            .collect(),
    }
}

fn format_attribution(attribution: &Attribution, annotation: &Annotation) -> String {
    match attribution {
        Attribution::Gene {
            gene_id,
            candidates,
        } => format!(
            "{}\t{}\t{}\t0",
            gene_id,
            annotation.gene_name(gene_id),
            candidates.join(",")
        ),
        Attribution::NoOverlap {
            nearest_exon_distance,
        } => format!(
            "NA\tNA\tNA\t{}",
            nearest_exon_distance.map_or_else(|| "NA".to_string(), |d| d.to_string())
        ),
    }
}

/// Per-junction gene attribution line.
pub fn format_genes_line(genes: &JunctionGenes, annotation: &Annotation) -> String {
    format!(
        "{}\t{}\t{}",
        genes.junction_id,
        format_attribution(&genes.donor, annotation),
        format_attribution(&genes.acceptor, annotation)
    )
}

/// Per-gene-pair best distance line.
pub fn format_gene_pair_line(distance: &GenePairDistance, annotation: &Annotation) -> String {
    format!(
        "{}\t{}:{}\t{}\t{}\t{}",
        distance.pair,
        annotation.gene_name(&distance.pair.donor),
        annotation.gene_name(&distance.pair.acceptor),
        distance.pred_id,
        distance.ref_id,
        distance.distance
    )
}

fn write_lines<I>(path: &Path, header: Option<&str>, lines: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    if let Some(header) = header {
        writeln!(writer, "{}", header)?;
    }
    for line in lines {
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every report of an evaluation into `outdir`, creating it if needed.
pub fn write_reports(outdir: &Path, evaluation: &Evaluation, annotation: &Annotation) -> Result<()> {
    fs::create_dir_all(outdir)
        .with_context(|| format!("Failed to create output directory {}", outdir.display()))?;

    write_lines(
        &outdir.join(SUMMARY_FILE),
        Some(summary_header().as_str()),
        [format_summary_line(&evaluation.summary)],
    )?;

    write_lines(
        &outdir.join(COMMON_FILE),
        None,
        evaluation.common.iter().cloned(),
    )?;

    write_lines(
        &outdir.join(CLOSE_FILE),
        Some("ref_id\tpred_ids"),
        evaluation
            .close_matches
            .iter()
            .map(|(ref_id, preds)| format!("{}\t{}", ref_id, preds.join(","))),
    )?;

    write_lines(
        &outdir.join(NEAREST_FILE),
        Some("pred_id\tref_id\tdonor_dist\tacceptor_dist\tsum_dist\tbest"),
        evaluation.rankings.iter().flat_map(format_ranking_lines),
    )?;

    write_lines(
        &outdir.join(GENE_PAIR_FILE),
        Some("gene_pair\tgene_names\tpred_id\tref_id\tsum_dist"),
        evaluation
            .gene_pair_distances
            .iter()
            .map(|d| format_gene_pair_line(d, annotation)),
    )?;

    let genes_header = "junction_id\t\
donor_gene\tdonor_name\tdonor_candidates\tdonor_nearest_exon\t\
acceptor_gene\tacceptor_name\tacceptor_candidates\tacceptor_nearest_exon";
    for (file, genes) in [
        (REFERENCE_GENES_FILE, &evaluation.reference_genes),
        (PREDICTED_GENES_FILE, &evaluation.predicted_genes),
    ] {
        write_lines(
            &outdir.join(file),
            Some(genes_header),
            genes.iter().map(|g| format_genes_line(g, annotation)),
        )?;
    }

    Ok(())
}
