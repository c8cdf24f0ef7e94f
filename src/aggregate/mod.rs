pub mod geo;
pub mod orgs;
pub mod series;
pub mod yearly;

use crate::ingest::Record;
use std::collections::BTreeMap;

/// How many entries the "top" passes keep.
pub const TOP_N: usize = 20;

/// Count records by an optional string key; records without the key are
/// skipped. `BTreeMap` keeps group iteration deterministic.
pub(crate) fn count_by<F>(records: &[Record], key: F) -> BTreeMap<String, u64>
where
    F: Fn(&Record) -> Option<&str>,
{
    let mut counts = BTreeMap::new();
    for r in records {
        if let Some(k) = key(r) {
            *counts.entry(k.to_string()).or_default() += 1;
        }
    }
    counts
}

/// Keep the `n` largest counts, returned ascending. Ties at the cut are
/// broken by key (lexicographic), so the selection is stable across runs.
pub(crate) fn top_n_ascending(counts: BTreeMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    if rows.len() > n {
        rows.drain(..rows.len() - n);
    }
    rows
}
