//! Process-wide telemetry counters.
//!
//! The pipeline records one histogram, `cfgbuilder.blockArguments`: for
//! every finished block, the bucket for its argument-list length is
//! incremented. Counters are process-wide and shared by all workers, so
//! increments must be thread-safe; the store is a sharded [`DashMap`]
//! behind a [`OnceLock`].

use std::sync::OnceLock;

use dashmap::DashMap;

type Buckets = DashMap<usize, u64>;

static HISTOGRAMS: OnceLock<DashMap<&'static str, Buckets>> = OnceLock::new();

fn histograms() -> &'static DashMap<&'static str, Buckets> {
    HISTOGRAMS.get_or_init(DashMap::new)
}

/// Adds one observation of `value` to the named histogram.
///
/// Thread-safe; may be called concurrently from independent workers.
pub fn histogram_inc(name: &'static str, value: usize) {
    let histograms = histograms();
    let buckets = histograms.entry(name).or_default();
    *buckets.entry(value).or_insert(0) += 1;
}

/// Returns the `(value, count)` buckets of the named histogram, sorted by
/// value. Empty if the histogram has never been touched.
#[must_use]
pub fn histogram_buckets(name: &str) -> Vec<(usize, u64)> {
    let Some(histograms) = HISTOGRAMS.get() else {
        return Vec::new();
    };
    let Some(buckets) = histograms.get(name) else {
        return Vec::new();
    };
    let mut out: Vec<(usize, u64)> = buckets.iter().map(|e| (*e.key(), *e.value())).collect();
    out.sort_unstable();
    out
}
