//! GTF annotation parser with gzip support.
//!
//! Only `exon` features are kept. Each exon must carry the configured gene
//! and transcript id attributes; exons missing either are skipped and
//! counted rather than failing the run.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::BufRead;
use std::path::Path;

use crate::config::Config;
use crate::error::EvalError;
use crate::parser::open_text;
use crate::types::{Annotation, ExonInterval, Strand};

/// Extract the value of `tag` from a GTF attribute column.
///
/// Format: `key1 "value1"; key2 "value2";`
fn extract_attribute<'a>(attributes: &'a str, tag: &str) -> Option<&'a str> {
    attributes.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once(char::is_whitespace)?;
        (key == tag).then(|| value.trim().trim_matches('"'))
    })
}

/// Parse a GTF file into an annotation.
pub fn parse_gtf(path: &Path, config: &Config) -> Result<Annotation> {
    let reader = open_text(path)?;
    let annotation = parse_gtf_reader(reader, config)
        .with_context(|| format!("Failed to read GTF file {}", path.display()))?;

    info!(
        "Loaded {} exons from {} genes",
        annotation.exons.len(),
        annotation.genes.len()
    );
    if annotation.skipped_exons > 0 {
        warn!(
            "Skipped {} exon records missing '{}' or '{}'",
            annotation.skipped_exons, config.gene_id_tag, config.transcript_id_tag
        );
    }
    Ok(annotation)
}

/// Parse GTF records from a reader.
pub fn parse_gtf_reader<R: BufRead>(reader: R, config: &Config) -> Result<Annotation> {
    let mut annotation = Annotation::default();

    for (i, line_result) in reader.lines().enumerate() {
        let line_num = i + 1;
        let line = line_result.context("Failed to read GTF line")?;

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 || fields[2] != "exon" {
            continue;
        }

        match parse_exon(&fields, line_num, config) {
            Ok((exon, gene_name)) => annotation.push(exon, gene_name),
            Err(e @ EvalError::MissingAnnotationFields { .. }) => {
                debug!("{}", e);
                annotation.skipped_exons += 1;
            }
            Err(e) => warn!("Skipping GTF record: {}", e),
        }
    }

    Ok(annotation)
}

fn parse_exon(
    fields: &[&str],
    line: usize,
    config: &Config,
) -> Result<(ExonInterval, String), EvalError> {
    let parse_error = |message: String| EvalError::Parse { line, message };

    let start: u64 = fields[3]
        .parse()
        .map_err(|_| parse_error(format!("invalid start '{}'", fields[3])))?;
    let end: u64 = fields[4]
        .parse()
        .map_err(|_| parse_error(format!("invalid end '{}'", fields[4])))?;
    if start > end {
        return Err(parse_error(format!("start {} after end {}", start, end)));
    }
    let strand = Strand::from_str(fields[6])
        .ok_or_else(|| parse_error(format!("invalid strand '{}'", fields[6])))?;

    let attributes = fields[8];
    let missing = |tag: &str| EvalError::MissingAnnotationFields {
        line,
        field: tag.to_string(),
    };
    let gene_id = extract_attribute(attributes, &config.gene_id_tag)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(&config.gene_id_tag))?;
    let transcript_id = extract_attribute(attributes, &config.transcript_id_tag)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(&config.transcript_id_tag))?;
    let gene_name = extract_attribute(attributes, &config.gene_name_tag).unwrap_or(gene_id);

    Ok((
        ExonInterval {
            chrom: fields[0].to_string(),
            start,
            end,
            strand,
            gene_id: gene_id.to_string(),
            transcript_id: transcript_id.to_string(),
        },
        gene_name.to_string(),
    ))
}
