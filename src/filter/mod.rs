//! Acquisition filtering: valid-pixel threshold + seasonal month range.
//!
//! The filter never reorders and never fails. An empty result is a normal
//! outcome (e.g. a cloudy season where nothing meets the threshold).

use chrono::NaiveDate;

use crate::domain::{Acquisition, FilterConfig};

/// Apply the quality and seasonal filters, returning surviving dates in input order.
pub fn filter_acquisitions(acquisitions: &[Acquisition], config: &FilterConfig) -> Vec<NaiveDate> {
    let dates: Vec<NaiveDate> = acquisitions
        .iter()
        .filter(|acq| passes(acq, config))
        .map(|acq| acq.date)
        .collect();

    log::debug!(
        "filter: kept {} of {} acquisitions (min_valid={}, months={:?})",
        dates.len(),
        acquisitions.len(),
        config.min_valid_fraction,
        config.month_filter
    );
    dates
}

fn passes(acq: &Acquisition, config: &FilterConfig) -> bool {
    // NaN fractions never pass.
    acq.valid_fraction >= config.min_valid_fraction && config.month_filter.accepts(acq.date)
}
