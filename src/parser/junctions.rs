//! Junction list parser with gzip support.
//!
//! One junction per line, canonical id (`chrA_posA_strandA:chrB_posB_strandB`)
//! in the first whitespace-separated column. Extra columns are ignored.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::parser::open_text;
use crate::types::JunctionSet;

/// Parse a junction list file into a de-duplicated set.
///
/// Supports both plain text and gzip-compressed files.
pub fn parse_junctions(path: &Path) -> Result<JunctionSet> {
    let reader = open_text(path)?;
    parse_junctions_reader(reader)
        .with_context(|| format!("Failed to read junctions from {}", path.display()))
}

/// Parse junction ids from a reader.
pub fn parse_junctions_reader<R: BufRead>(reader: R) -> Result<JunctionSet> {
    let mut ids = Vec::new();
    let mut first_record = true;

    for line_result in reader.lines() {
        let line = line_result.context("Failed to read junction line")?;

        // Skip empty lines and comments
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(id) = line.split_whitespace().next() else {
            continue;
        };

        // A first record without ':' in its first column is a header
        if std::mem::take(&mut first_record) && !id.contains(':') {
            continue;
        }

        ids.push(id.to_string());
    }

    Ok(JunctionSet::from_ids(ids))
}
