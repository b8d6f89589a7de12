//! Junction matching and gene attribution.

pub mod close;
pub mod exact;
pub mod genes;
pub mod interval;
pub mod nearest;
pub mod reduce;

pub use close::close_matches;
pub use exact::common_ids;
pub use genes::{compare_gene_pairs, gene_pairs, GeneAttributor};
pub use interval::IntervalIndex;
pub use nearest::{rank_candidates, select_best};
pub use reduce::{collapse, collapse_pairs};
