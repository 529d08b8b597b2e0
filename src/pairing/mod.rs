//! Pair enumeration.
//!
//! Responsibilities:
//!
//! - check the sortedness precondition once, before any pair is emitted
//! - dispatch to the selected baseline policy (`fixed`, `window`)
//! - evaluate anchors independently (parallel) and reassemble them in anchor order
//!
//! Output order is part of the contract: anchor index ascending, then partner
//! index ascending. Both policies are pure functions of `(dates, policy)`.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::domain::{BaselinePolicy, Pair, PairSet};
use crate::error::AppError;

pub mod fixed;
pub mod window;

pub use fixed::*;
pub use window::*;

/// Enumerate all pairs allowed by `policy` over a non-decreasing date sequence.
///
/// Fails (without emitting anything) if the policy parameters are invalid or
/// `dates` is not sorted. Too few dates is not a failure: it yields an empty set.
pub fn enumerate(dates: &[NaiveDate], policy: &BaselinePolicy) -> Result<PairSet, AppError> {
    policy.validate()?;
    ensure_sorted(dates)?;

    let pairs = match *policy {
        BaselinePolicy::FixedCountMaxBaseline {
            pair_count,
            max_baseline_days,
        } => collect_anchors(fixed_anchor_count(dates.len(), pair_count), |r| {
            fixed_count_partners(dates, r, pair_count, max_baseline_days)
        }),
        BaselinePolicy::MinMaxBaselineWindow {
            min_baseline_days,
            max_baseline_days,
        } => collect_anchors(dates.len().saturating_sub(1), |i| {
            window_partners(dates, i, min_baseline_days, max_baseline_days)
        }),
    };

    log::debug!(
        "pairing: {} date(s), policy {:?} -> {} pair(s)",
        dates.len(),
        policy,
        pairs.len()
    );
    Ok(PairSet::new(pairs))
}

/// Verify `dates` is non-decreasing.
///
/// The window policy stops scanning an anchor at the first partner past the
/// maximum baseline, which is only correct on sorted input.
pub fn ensure_sorted(dates: &[NaiveDate]) -> Result<(), AppError> {
    if let Some(idx) = dates.windows(2).position(|w| w[1] < w[0]) {
        return Err(AppError::invalid(format!(
            "Acquisition dates must be sorted ascending: {} (position {}) comes after {} (position {}).",
            dates[idx + 1],
            idx + 1,
            dates[idx],
            idx
        )));
    }
    Ok(())
}

fn collect_anchors<F>(anchor_count: usize, partners: F) -> Vec<Pair>
where
    F: Fn(usize) -> Vec<Pair> + Sync + Send,
{
    // Indexed collect keeps per-anchor results in anchor order.
    let per_anchor: Vec<Vec<Pair>> = (0..anchor_count).into_par_iter().map(partners).collect();
    per_anchor.into_iter().flatten().collect()
}

pub(crate) fn baseline_days(anchor: NaiveDate, partner: NaiveDate) -> i64 {
    (partner - anchor).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn labels(set: &PairSet) -> Vec<String> {
        set.iter().map(|p| p.label.clone()).collect()
    }

    #[test]
    fn rejects_unsorted_input() {
        let dates = vec![d("2023-06-13"), d("2023-06-01")];
        let policy = BaselinePolicy::window(0, 100).unwrap();
        let err = enumerate(&dates, &policy).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("sorted"));
    }

    #[test]
    fn rejects_invalid_policy_before_pairing() {
        let dates = vec![d("2023-06-01"), d("2023-06-13")];
        let policy = BaselinePolicy::MinMaxBaselineWindow {
            min_baseline_days: 10,
            max_baseline_days: 5,
        };
        assert!(enumerate(&dates, &policy).is_err());

        let policy = BaselinePolicy::FixedCountMaxBaseline {
            pair_count: 0,
            max_baseline_days: 5,
        };
        assert!(enumerate(&dates, &policy).is_err());
    }

    #[test]
    fn fewer_than_two_dates_yield_nothing() {
        let fixed = BaselinePolicy::fixed_count(1, 100).unwrap();
        let window = BaselinePolicy::window(0, 100).unwrap();
        for dates in [vec![], vec![d("2023-06-01")]] {
            assert!(enumerate(&dates, &fixed).unwrap().is_empty());
            assert!(enumerate(&dates, &window).unwrap().is_empty());
        }
    }

    #[test]
    fn output_is_ordered_by_anchor_then_partner() {
        // Enough anchors that the parallel split actually happens.
        let start = d("2020-01-01");
        let dates: Vec<NaiveDate> = (0..400)
            .map(|i| start + chrono::Duration::days(i * 6))
            .collect();
        let policy = BaselinePolicy::window(6, 24).unwrap();
        let set = enumerate(&dates, &policy).unwrap();

        let positions: Vec<(usize, usize)> = set
            .iter()
            .map(|p| {
                let a = dates.iter().position(|x| *x == p.anchor_date).unwrap();
                let b = dates.iter().position(|x| *x == p.partner_date).unwrap();
                (a, b)
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        // 4 partners per anchor except near the end.
        assert_eq!(set.len(), 396 * 4 + 3 + 2 + 1);
    }

    #[test]
    fn rerun_is_identical() {
        let dates = vec![
            d("2023-05-03"),
            d("2023-05-15"),
            d("2023-05-15"),
            d("2023-06-20"),
            d("2023-08-01"),
        ];
        for policy in [
            BaselinePolicy::fixed_count(2, 40).unwrap(),
            BaselinePolicy::window(0, 50).unwrap(),
        ] {
            let first = enumerate(&dates, &policy).unwrap();
            let second = enumerate(&dates, &policy).unwrap();
            assert_eq!(labels(&first), labels(&second));
            assert_eq!(first, second);
        }
    }
}
