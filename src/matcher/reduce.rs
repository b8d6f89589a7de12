//! Collapse repeated associations into one ordered list per key.
//!
//! Overlap queries emit one `(key, value)` pair per hit, so the same value
//! shows up several times per key (a junction hit by both windows of another
//! junction, a breakpoint overlapping several exons of one gene). These helpers
//! keep each value once, in the order it was first seen.

use std::hash::Hash;

use ahash::AHashSet;
use indexmap::IndexMap;

/// Group `(key, value)` pairs by key with de-duplicated, first-seen values.
pub fn collapse_pairs<K, V, I>(pairs: I) -> IndexMap<K, Vec<V>>
where
    K: Hash + Eq,
    V: Hash + Eq + Clone,
    I: IntoIterator<Item = (K, V)>,
{
    let mut grouped: IndexMap<K, Vec<V>> = IndexMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }
    collapse(grouped)
}

/// De-duplicate every value list of an existing multimap.
pub fn collapse<K, V>(map: IndexMap<K, Vec<V>>) -> IndexMap<K, Vec<V>>
where
    K: Hash + Eq,
    V: Hash + Eq + Clone,
{
    map.into_iter()
        .map(|(key, values)| (key, unique(values)))
        .collect()
}

/// De-duplicate a sequence, keeping first occurrences in order.
pub fn unique<V>(values: impl IntoIterator<Item = V>) -> Vec<V>
where
    V: Hash + Eq + Clone,
{
    let mut seen = AHashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
