//! Acquisition table ingest.
//!
//! The catalog search and raster statistics happen upstream; what reaches
//! this crate is a CSV with one row per acquisition:
//!
//! ```text
//! date,valid_fraction,cloud_cover
//! 2023-06-01,0.97,12.5
//! 2023-06-13T18:55:09Z,0.88,3.0
//! ```
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **File order preserved**: sortedness is checked later, at the pairing boundary

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{Acquisition, IngestFilter};
use crate::error::AppError;

const DATE_COLUMNS: [&str; 3] = ["date", "time", "datetime"];
const VALID_COLUMNS: [&str; 2] = ["valid_fraction", "valid"];
const CLOUD_COLUMN: &str = "cloud_cover";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: acquisitions in file order + bookkeeping for the report.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub acquisitions: Vec<Acquisition>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows dropped by the upstream prefilters (cloud cover, year range).
    pub rows_prefiltered: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.acquisitions.len()
    }
}

/// Load acquisitions from a CSV file.
pub fn load_acquisitions(path: &Path, filter: &IngestFilter) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid(format!("Failed to open CSV '{}': {e}", path.display())))?;
    log::info!("Reading acquisitions from {}", path.display());
    read_acquisitions(file, filter)
}

/// Parse acquisitions from any CSV reader.
pub fn read_acquisitions<R: Read>(reader: R, filter: &IngestFilter) -> Result<IngestedData, AppError> {
    filter.validate()?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let columns = resolve_columns(&header_map, filter)?;

    let mut out = IngestedData::default();

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        out.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns, filter) {
            Ok(Some(acq)) => out.acquisitions.push(acq),
            Ok(None) => out.rows_prefiltered += 1,
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }

    for err in &out.row_errors {
        log::warn!("skipping line {}: {}", err.line, err.message);
    }
    log::info!(
        "Read {} row(s): {} usable, {} prefiltered, {} invalid",
        out.rows_read,
        out.rows_used(),
        out.rows_prefiltered,
        out.row_errors.len()
    );

    Ok(out)
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    valid: usize,
    cloud: Option<usize>,
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>, filter: &IngestFilter) -> Result<Columns, AppError> {
    let date = first_present(header_map, &DATE_COLUMNS)
        .ok_or_else(|| AppError::invalid("Missing required column: `date` (or `time` / `datetime`)."))?;
    let valid = first_present(header_map, &VALID_COLUMNS)
        .ok_or_else(|| AppError::invalid("Missing required column: `valid_fraction`."))?;
    let cloud = header_map.get(CLOUD_COLUMN).copied();

    if filter.max_cloud_cover.is_some() && cloud.is_none() {
        return Err(AppError::invalid(
            "`--cloud-cover` requires a `cloud_cover` column in the CSV.",
        ));
    }

    Ok(Columns { date, valid, cloud })
}

fn first_present(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| header_map.get(*name).copied())
}

/// Parse one row. `Ok(None)` means the row was valid but removed by a prefilter.
fn parse_row(record: &StringRecord, columns: &Columns, filter: &IngestFilter) -> Result<Option<Acquisition>, String> {
    let date = parse_date(get_required(record, columns.date, "date")?)?;

    let raw_valid = get_required(record, columns.valid, "valid_fraction")?;
    let valid_fraction = raw_valid
        .parse::<f64>()
        .map_err(|_| format!("Invalid `valid_fraction` '{raw_valid}'."))?;
    if !(valid_fraction.is_finite() && (0.0..=1.0).contains(&valid_fraction)) {
        return Err(format!("`valid_fraction` {valid_fraction} is outside [0, 1]."));
    }

    let cloud_cover = match columns.cloud.and_then(|idx| get_optional(record, idx)) {
        Some(raw) => Some(
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("Invalid `cloud_cover` '{raw}'."))?,
        ),
        None => None,
    };

    if let (Some(max), Some(cc)) = (filter.max_cloud_cover, cloud_cover) {
        if cc >= max {
            return Ok(None);
        }
    }
    if !filter.accepts_year(date) {
        return Ok(None);
    }

    Ok(Some(Acquisition::new(date, valid_fraction)))
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    get_optional(record, idx).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a calendar date, keeping only the date part of timestamps.
///
/// Catalog exports carry full acquisition timestamps; pairing works on days.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc().date());
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected YYYY-MM-DD, YYYY/MM/DD, or an RFC 3339 timestamp."
    ))
}
