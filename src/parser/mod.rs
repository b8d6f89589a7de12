//! Parsers for junction lists and GTF annotations.

pub mod gtf;
pub mod junctions;

pub use gtf::parse_gtf;
pub use junctions::parse_junctions;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

/// Open a plain or gzip-compressed text file (by `.gz` suffix).
pub(crate) fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let reader: Box<dyn BufRead> = if path.to_string_lossy().ends_with(".gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}
