//! chimeval - benchmark chimeric junction predictions against a reference.
//!
//! Given a reference set of chimeric junctions known to be true, a predicted
//! set and a genome annotation, this library measures how well the
//! prediction recovers the reference:
//!
//! - exact id matches and sensitivity/precision
//! - close matches under a positional tolerance
//! - nearest reference candidates for every predicted junction
//! - gene attribution of each breakpoint and gene-pair level metrics
//! - the distribution of donor+acceptor distances over common gene pairs
//!
//! # Example
//!
//! ```ignore
//! use chimeval::config::Config;
//! use chimeval::evaluate::evaluate;
//! use chimeval::parser::{parse_gtf, parse_junctions};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let reference = parse_junctions(Path::new("reference.txt"))?;
//! let predicted = parse_junctions(Path::new("predicted.txt"))?;
//! let annotation = parse_gtf(Path::new("genes.gtf"), &config)?;
//!
//! let evaluation = evaluate(&reference, &predicted, &annotation, &config);
//! println!("sensitivity: {:?}", evaluation.summary.sensitivity);
//! ```

pub mod config;
pub mod error;
pub mod evaluate;
pub mod matcher;
pub mod metrics;
pub mod output;
pub mod parser;
pub mod types;

pub use config::Config;
pub use error::EvalError;
pub use evaluate::{evaluate, Evaluation};
pub use types::{Annotation, Breakpoint, GenePair, Junction, JunctionSet, Strand};
