//! Formatted terminal output.
//!
//! We keep formatting code in one place so the filtering/pairing code stays
//! free of presentation concerns.

use chrono::NaiveDate;

use crate::domain::{MatrixEntry, PairSet, RunConfig, iso_date};
use crate::io::ingest::IngestedData;

/// Newline-joined ISO dates (the `IMAGE_DATES` value).
pub fn format_image_dates(dates: &[NaiveDate]) -> String {
    dates.iter().map(|d| iso_date(*d)).collect::<Vec<_>>().join("\n")
}

/// Format the run summary (ingest stats, filters, policy, pair count).
pub fn format_run_summary(ingest: &IngestedData, dates: &[NaiveDate], pairs: &PairSet, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== pairs - acquisition pair matrix ===\n");
    out.push_str(&format!("Input: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: read={} | usable={} | prefiltered={} | invalid={}\n",
        ingest.rows_read,
        ingest.rows_used(),
        ingest.rows_prefiltered,
        ingest.row_errors.len()
    ));
    for err in ingest.row_errors.iter().take(MAX_ROW_ERRORS) {
        out.push_str(&format!("  line {}: {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > MAX_ROW_ERRORS {
        out.push_str(&format!(
            "  ... {} more\n",
            ingest.row_errors.len() - MAX_ROW_ERRORS
        ));
    }

    out.push_str(&format!(
        "Filter: valid >= {:.2} | months: {}\n",
        config.filter.min_valid_fraction,
        describe_months(config)
    ));
    out.push_str(&format!("Policy: {}\n", config.policy.describe()));

    out.push_str(&format!("\nAcquisitions kept: {}\n", dates.len()));
    let listing = format_image_dates(dates);
    if !listing.is_empty() {
        out.push_str(&listing);
        out.push('\n');
    }

    out.push_str(&format!("\nnumber of image pairs: {}\n", pairs.len()));
    out
}

/// Format the enumerated pairs as a table.
pub fn format_pair_table(pairs: &PairSet) -> String {
    let mut out = table_header();
    for p in pairs {
        out.push_str(
            format!(
                "{:<12} {:<12} {:>8} {}\n",
                iso_date(p.anchor_date),
                iso_date(p.partner_date),
                p.baseline_days,
                p.label
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format matrix entries read back from a file.
///
/// The baseline column is recomputed from the dates; entries whose dates do
/// not parse show `-`.
pub fn format_matrix_entries(entries: &[MatrixEntry]) -> String {
    let mut out = format!("Matrix entries: {}\n", entries.len());
    out.push_str(&table_header());
    for e in entries {
        let baseline = match (parse_iso(&e.img1_date), parse_iso(&e.img2_date)) {
            (Some(a), Some(b)) => (b - a).num_days().to_string(),
            _ => "-".to_string(),
        };
        out.push_str(
            format!(
                "{:<12} {:<12} {:>8} {}\n",
                truncate(&e.img1_date, 12),
                truncate(&e.img2_date, 12),
                baseline,
                e.name
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

const MAX_ROW_ERRORS: usize = 10;

fn table_header() -> String {
    let mut out = String::new();
    out.push_str(format!("{:<12} {:<12} {:>8} {}\n", "img1_date", "img2_date", "days", "name").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:->8} {:-<21}\n", "", "", "", "").trim_end());
    out.push('\n');
    out
}

fn describe_months(config: &RunConfig) -> String {
    match config.filter.month_filter {
        crate::domain::MonthFilter::None => "all".to_string(),
        crate::domain::MonthFilter::Range(range) => {
            let wrap = if range.wraps() { " (wraps year end)" } else { "" };
            format!("{}..{}{wrap}", range.start(), range.stop())
        }
    }
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, crate::domain::ISO_DATE).ok()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
