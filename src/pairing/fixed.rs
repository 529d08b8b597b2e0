//! Fixed-count policy: each anchor pairs with its next `pair_count` images,
//! keeping only partners within `max_baseline_days`.

use chrono::NaiveDate;

use crate::domain::Pair;
use crate::pairing::baseline_days;

/// Number of anchors the fixed-count policy iterates.
///
/// Anchors run over `0..=len - pair_count - 1`, so every anchor has a full
/// window of `pair_count` forward partners. `len <= pair_count` gives zero.
pub fn fixed_anchor_count(len: usize, pair_count: usize) -> usize {
    len.saturating_sub(pair_count)
}

/// Partners of anchor `r` under the fixed-count policy, in offset order.
///
/// Callers guarantee `r + pair_count < dates.len()` and that `dates` is sorted.
pub fn fixed_count_partners(
    dates: &[NaiveDate],
    r: usize,
    pair_count: usize,
    max_baseline_days: u32,
) -> Vec<Pair> {
    let anchor = dates[r];
    let mut out = Vec::with_capacity(pair_count);
    for s in 1..=pair_count {
        let partner = dates[r + s];
        if baseline_days(anchor, partner) > i64::from(max_baseline_days) {
            // Sorted input: later offsets are at least as far away.
            break;
        }
        out.push(Pair::new(anchor, partner));
    }
    out
}
