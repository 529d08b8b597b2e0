//! Min/max window policy: each anchor pairs with every later image whose
//! baseline falls in `[min_baseline_days, max_baseline_days]`.

use chrono::NaiveDate;

use crate::domain::Pair;
use crate::pairing::baseline_days;

/// Partners of anchor `i` under the window policy, in partner order.
///
/// Partners below the minimum are skipped (duplicate or close dates), and the
/// scan stops at the first partner above the maximum. The stop relies on
/// `dates` being sorted, which `enumerate` checks.
pub fn window_partners(
    dates: &[NaiveDate],
    i: usize,
    min_baseline_days: u32,
    max_baseline_days: u32,
) -> Vec<Pair> {
    let anchor = dates[i];
    let min = i64::from(min_baseline_days);
    let max = i64::from(max_baseline_days);

    let mut out = Vec::new();
    for &partner in &dates[i + 1..] {
        let days = baseline_days(anchor, partner);
        if days < min {
            continue;
        }
        if days > max {
            break;
        }
        out.push(Pair::new(anchor, partner));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::BaselinePolicy;
    use crate::pairing::enumerate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn window(min: u32, max: u32) -> BaselinePolicy {
        BaselinePolicy::window(min, max).unwrap()
    }

    #[test]
    fn only_in_window_pairs_are_emitted() {
        let dates = vec![d("2023-06-01"), d("2023-06-20"), d("2023-09-15")];
        let set = enumerate(&dates, &window(10, 30)).unwrap();
        assert_eq!(set.len(), 1);
        let pair = &set.as_slice()[0];
        assert_eq!(pair.label, "2023-06-01_2023-06-20");
        assert_eq!(pair.baseline_days, 19);
    }

    #[test]
    fn anchor_can_have_many_partners() {
        let dates = vec![
            d("2023-07-01"),
            d("2023-07-06"),
            d("2023-07-11"),
            d("2023-07-16"),
            d("2023-07-21"),
        ];
        let set = enumerate(&dates, &window(5, 15)).unwrap();
        let from_first: Vec<&str> = set
            .iter()
            .filter(|p| p.anchor_date == dates[0])
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(
            from_first,
            vec![
                "2023-07-01_2023-07-06",
                "2023-07-01_2023-07-11",
                "2023-07-01_2023-07-16",
            ]
        );
        assert_eq!(set.len(), 3 + 3 + 2 + 1);
    }

    #[test]
    fn duplicate_dates_are_skipped_not_stopped() {
        let dates = vec![
            d("2023-07-01"),
            d("2023-07-01"),
            d("2023-07-13"),
            d("2023-09-01"),
        ];
        let set = enumerate(&dates, &window(1, 30)).unwrap();
        let labels: Vec<&str> = set.iter().map(|p| p.label.as_str()).collect();
        // Both copies of 07-01 act as anchors and reach 07-13 past the zero-day partner.
        assert_eq!(labels, vec!["2023-07-01_2023-07-13", "2023-07-01_2023-07-13"]);
    }

    #[test]
    fn zero_minimum_pairs_same_day_duplicates() {
        let dates = vec![d("2023-07-01"), d("2023-07-01")];
        let set = enumerate(&dates, &window(0, 0)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].baseline_days, 0);
    }

    #[test]
    fn every_pair_respects_bounds() {
        let dates: Vec<NaiveDate> = [
            "2021-05-02", "2021-05-07", "2021-05-22", "2021-06-11", "2021-06-16", "2021-07-31",
            "2021-08-05", "2021-08-30", "2021-09-24",
        ]
        .iter()
        .map(|s| d(s))
        .collect();
        for (min, max) in [(0, 10), (5, 25), (20, 60), (40, 40), (0, 365)] {
            let set = enumerate(&dates, &window(min, max)).unwrap();
            for p in &set {
                assert!(p.baseline_days >= i64::from(min) && p.baseline_days <= i64::from(max));
            }
            // Exhaustive count agrees with the early-stopping scan.
            let expected = (0..dates.len())
                .flat_map(|i| (i + 1..dates.len()).map(move |j| (i, j)))
                .filter(|&(i, j)| {
                    let days = (dates[j] - dates[i]).num_days();
                    days >= i64::from(min) && days <= i64::from(max)
                })
                .count();
            assert_eq!(set.len(), expected, "min={min} max={max}");
        }
    }
}
