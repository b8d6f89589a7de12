//! Exact junction matching by id.

use crate::types::JunctionSet;

/// Ids present in both sets, in reference order.
///
/// Both sets are already de-duplicated, so each shared id appears once.
pub fn common_ids(reference: &JunctionSet, predicted: &JunctionSet) -> Vec<String> {
    reference
        .ids
        .iter()
        .filter(|id| predicted.ids.contains(id.as_str()))
        .cloned()
        .collect()
}
