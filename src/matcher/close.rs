//! Close (non-exact) junction matching under a positional tolerance.
//!
//! Each breakpoint is widened to `[position - tolerance, position + tolerance]`
//! and tagged with its junction and side. A reference junction closely
//! matches a predicted one when both its donor window overlaps the predicted
//! donor window and its acceptor window overlaps the predicted acceptor
//! window. Two windows overlap when the breakpoints are within
//! `2 * tolerance` of each other.

use ahash::AHashSet;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;

use crate::matcher::interval::{Interval, IntervalIndex};
use crate::matcher::reduce::collapse_pairs;
use crate::types::{Breakpoint, Junction};

/// Which breakpoint of a junction a window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Donor,
    Acceptor,
}

/// Owner of a tolerance window: junction index plus side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SideTag {
    pub junction: usize,
    pub side: Side,
}

/// Tolerance window around a breakpoint; the lower bound saturates at 0.
pub fn window(breakpoint: &Breakpoint, tolerance: u64) -> (u64, u64) {
    (
        breakpoint.position.saturating_sub(tolerance),
        breakpoint.position.saturating_add(tolerance),
    )
}

/// Index the donor and acceptor windows of every junction.
pub fn build_window_index(junctions: &[Junction], tolerance: u64) -> IntervalIndex<SideTag> {
    IntervalIndex::build(junctions.iter().enumerate().flat_map(|(i, j)| {
        [(&j.donor, Side::Donor), (&j.acceptor, Side::Acceptor)]
            .into_iter()
            .map(move |(bp, side)| {
                let (start, end) = window(bp, tolerance);
                (
                    bp.chrom.clone(),
                    bp.strand,
                    Interval::new(start, end, SideTag { junction: i, side }),
                )
            })
    }))
}

/// Predicted junctions whose `side` window overlaps the given breakpoint's window.
fn side_hits(
    index: &IntervalIndex<SideTag>,
    breakpoint: &Breakpoint,
    side: Side,
    tolerance: u64,
) -> Vec<usize> {
    let (start, end) = window(breakpoint, tolerance);
    index
        .overlapping(&breakpoint.chrom, breakpoint.strand, start, end)
        .filter(|iv| iv.payload.side == side)
        .map(|iv| iv.payload.junction)
        .collect()
}

/// Close matches for every reference junction that is not an exact match.
///
/// Returns reference id -> distinct predicted ids (first-seen order). Only
/// reference junctions with at least one close predicted junction whose id
/// differs from their own are present.
pub fn close_matches(
    reference: &[Junction],
    predicted: &[Junction],
    exact: &IndexSet<String>,
    tolerance: u64,
) -> IndexMap<String, Vec<String>> {
    let index = build_window_index(predicted, tolerance);

    let hits: Vec<Vec<(String, String)>> = reference
        .par_iter()
        .filter(|r| !exact.contains(r.id.as_str()))
        .map(|r| {
            let acceptors: AHashSet<usize> =
                side_hits(&index, &r.acceptor, Side::Acceptor, tolerance)
                    .into_iter()
                    .collect();

            side_hits(&index, &r.donor, Side::Donor, tolerance)
                .into_iter()
                .filter(|p| acceptors.contains(p))
                .map(|p| &predicted[p].id)
                .filter(|pred_id| **pred_id != r.id)
                .map(|pred_id| (r.id.clone(), pred_id.clone()))
                .collect::<Vec<_>>()
        })
        .collect();

    collapse_pairs(hits.into_iter().flatten())
}
