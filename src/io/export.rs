//! Export enumerated pairs to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;

use crate::domain::{PairSet, iso_date};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct PairRow<'a> {
    anchor_date: String,
    partner_date: String,
    baseline_days: i64,
    name: &'a str,
}

/// Write one row per pair, in pair-set order.
pub fn write_pairs_csv(path: &Path, pairs: &PairSet) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    if pairs.is_empty() {
        // serde-driven headers are only emitted with the first record.
        writer
            .write_record(["anchor_date", "partner_date", "baseline_days", "name"])
            .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;
    }

    for p in pairs {
        writer
            .serialize(PairRow {
                anchor_date: iso_date(p.anchor_date),
                partner_date: iso_date(p.partner_date),
                baseline_days: p.baseline_days,
                name: &p.label,
            })
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
