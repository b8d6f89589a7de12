//! CLI entry point for chimeval.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use chimeval::config::Config;
use chimeval::evaluate::evaluate;
use chimeval::metrics::fmt_opt;
use chimeval::output::write_reports;
use chimeval::parser::{parse_gtf, parse_junctions};

/// Chimeric junction benchmark.
///
/// Compares predicted chimeric junctions against a reference set at the
/// junction and gene-pair level.
#[derive(Parser, Debug)]
#[command(name = "chimeval")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reference junction list (required)
    #[arg(short = 'r', long = "reference")]
    reference: PathBuf,

    /// Predicted junction list (required)
    #[arg(short = 'p', long = "predicted")]
    predicted: PathBuf,

    /// GTF annotation file (required)
    #[arg(short = 'g', long = "gtf")]
    gtf: PathBuf,

    /// Output directory (required)
    #[arg(short = 'o', long = "outdir")]
    outdir: PathBuf,

    /// Close-match tolerance in bp around each breakpoint
    #[arg(short = 't', long = "tolerance", default_value = "50")]
    tolerance: i64,

    /// GTF tag for gene ID
    #[arg(short = 'G', long = "gene", default_value = "gene_id")]
    gene_tag: String,

    /// GTF tag for transcript ID
    #[arg(short = 'T', long = "transcript", default_value = "transcript_id")]
    transcript_tag: String,

    /// GTF tag for gene name
    #[arg(short = 'N', long = "gene-name", default_value = "gene_name")]
    gene_name_tag: String,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long = "threads", default_value = "0")]
    threads: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Validate inputs
    for (label, path) in [
        ("Reference", &args.reference),
        ("Predicted", &args.predicted),
        ("GTF", &args.gtf),
    ] {
        if !path.exists() {
            bail!("{} file not found: {}", label, path.display());
        }
    }

    // Build configuration
    let mut config = Config::new();
    if args.tolerance >= 0 {
        config.tolerance = args.tolerance as u64;
    } else {
        bail!("The tolerance cannot be lower than 0 bps.");
    }
    config.gene_id_tag = args.gene_tag;
    config.transcript_id_tag = args.transcript_tag;
    config.gene_name_tag = args.gene_name_tag;
    config.set_threads(args.threads);

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
        .context("Failed to initialize thread pool")?;

    info!("Parsing reference junctions: {}", args.reference.display());
    let reference = parse_junctions(&args.reference)?;

    info!("Parsing predicted junctions: {}", args.predicted.display());
    let predicted = parse_junctions(&args.predicted)?;

    info!("Parsing GTF file: {}", args.gtf.display());
    let annotation = parse_gtf(&args.gtf, &config)?;

    info!("Evaluating with {} threads...", config.threads);
    let evaluation = evaluate(&reference, &predicted, &annotation, &config);

    info!("Writing reports to: {}", args.outdir.display());
    write_reports(&args.outdir, &evaluation, &annotation)?;

    let summary = &evaluation.summary;
    info!(
        "Junctions: sensitivity {} precision {}; gene pairs: sensitivity {} precision {}",
        fmt_opt(summary.sensitivity),
        fmt_opt(summary.precision),
        fmt_opt(summary.gene_sensitivity),
        fmt_opt(summary.gene_precision)
    );
    info!("Done!");
    Ok(())
}
