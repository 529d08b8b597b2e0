//! Shared domain types.
//!
//! These types are small immutable values built once per run:
//!
//! - acquisitions as supplied by the upstream catalog step
//! - filter and baseline-policy configuration
//! - enumerated pairs and the serializable job-matrix payload

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// ISO calendar-date format used for every date that leaves the crate.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// A single image capture with its usable-pixel fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acquisition {
    pub date: NaiveDate,
    /// Fraction of pixels that are valid (non-missing), in `[0, 1]`.
    pub valid_fraction: f64,
}

impl Acquisition {
    pub fn new(date: NaiveDate, valid_fraction: f64) -> Self {
        Self {
            date,
            valid_fraction,
        }
    }
}

/// Inclusive calendar-month range, interpreted cyclically.
///
/// `start <= stop` is an ordinary range (May–September); `start > stop`
/// wraps across the year end (December–February).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: u32,
    stop: u32,
}

impl MonthRange {
    pub fn new(start: u32, stop: u32) -> Result<Self, AppError> {
        for (name, month) in [("start", start), ("stop", stop)] {
            if !(1..=12).contains(&month) {
                return Err(AppError::invalid(format!(
                    "Invalid {name} month {month} (must be 1..=12)."
                )));
            }
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn stop(&self) -> u32 {
        self.stop
    }

    pub fn wraps(&self) -> bool {
        self.start > self.stop
    }

    /// Whether a calendar month (1..=12) falls inside the range.
    pub fn contains(&self, month: u32) -> bool {
        if self.wraps() {
            month >= self.start || month <= self.stop
        } else {
            self.start <= month && month <= self.stop
        }
    }
}

/// Seasonal filter applied to acquisition dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    None,
    Range(MonthRange),
}

impl MonthFilter {
    pub fn accepts(&self, date: NaiveDate) -> bool {
        match self {
            MonthFilter::None => true,
            MonthFilter::Range(range) => range.contains(date.month()),
        }
    }
}

/// Data-quality and seasonal filter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Minimum valid-pixel fraction; equality passes.
    pub min_valid_fraction: f64,
    pub month_filter: MonthFilter,
}

impl FilterConfig {
    pub fn new(min_valid_fraction: f64, month_filter: MonthFilter) -> Result<Self, AppError> {
        if !(min_valid_fraction.is_finite() && (0.0..=1.0).contains(&min_valid_fraction)) {
            return Err(AppError::invalid(format!(
                "Invalid minimum valid fraction {min_valid_fraction} (must be within [0, 1])."
            )));
        }
        Ok(Self {
            min_valid_fraction,
            month_filter,
        })
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_valid_fraction: 0.9,
            month_filter: MonthFilter::None,
        }
    }
}

/// Which pairing policy the CLI selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Fixed number of forward partners per image, capped by a maximum baseline.
    Fixed,
    /// Every forward partner whose baseline falls inside `[min, max]` days.
    Window,
}

/// Temporal-baseline pairing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselinePolicy {
    FixedCountMaxBaseline {
        pair_count: usize,
        max_baseline_days: u32,
    },
    MinMaxBaselineWindow {
        min_baseline_days: u32,
        max_baseline_days: u32,
    },
}

impl BaselinePolicy {
    pub fn fixed_count(pair_count: usize, max_baseline_days: u32) -> Result<Self, AppError> {
        let policy = BaselinePolicy::FixedCountMaxBaseline {
            pair_count,
            max_baseline_days,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn window(min_baseline_days: u32, max_baseline_days: u32) -> Result<Self, AppError> {
        let policy = BaselinePolicy::MinMaxBaselineWindow {
            min_baseline_days,
            max_baseline_days,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Reject parameter combinations that would silently produce a misleading result.
    pub fn validate(&self) -> Result<(), AppError> {
        match *self {
            BaselinePolicy::FixedCountMaxBaseline { pair_count, .. } => {
                if pair_count == 0 {
                    return Err(AppError::invalid("Pairs per image must be > 0."));
                }
            }
            BaselinePolicy::MinMaxBaselineWindow {
                min_baseline_days,
                max_baseline_days,
            } => {
                if min_baseline_days > max_baseline_days {
                    return Err(AppError::invalid(format!(
                        "Invalid baseline window: min={min_baseline_days} days > max={max_baseline_days} days."
                    )));
                }
            }
        }
        Ok(())
    }

    /// Human-readable label for terminal output.
    pub fn describe(&self) -> String {
        match self {
            BaselinePolicy::FixedCountMaxBaseline {
                pair_count,
                max_baseline_days,
            } => format!("fixed: {pair_count} partner(s) per image, baseline <= {max_baseline_days}d"),
            BaselinePolicy::MinMaxBaselineWindow {
                min_baseline_days,
                max_baseline_days,
            } => format!("window: {min_baseline_days}d <= baseline <= {max_baseline_days}d"),
        }
    }
}

/// One enumerated date pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub anchor_date: NaiveDate,
    pub partner_date: NaiveDate,
    /// Elapsed days from anchor to partner.
    pub baseline_days: i64,
    /// `<anchor>_<partner>` with ISO dates.
    pub label: String,
}

impl Pair {
    pub fn new(anchor_date: NaiveDate, partner_date: NaiveDate) -> Self {
        Self {
            anchor_date,
            partner_date,
            baseline_days: (partner_date - anchor_date).num_days(),
            label: format!("{}_{}", iso_date(anchor_date), iso_date(partner_date)),
        }
    }
}

/// Pairs in generation order: anchor index ascending, then partner index ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairSet {
    pairs: Vec<Pair>,
}

impl PairSet {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }
}

impl<'a> IntoIterator for &'a PairSet {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// One job in the matrix payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub img1_date: String,
    pub img2_date: String,
    pub name: String,
}

/// The job-matrix document: `{"include": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatrixPayload {
    pub include: Vec<MatrixEntry>,
}

/// Upstream prefilters applied while reading the acquisition table.
///
/// These stand in for the catalog query (cloud cover, search years) and are
/// not part of the pairing core.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IngestFilter {
    /// Keep rows whose `cloud_cover` is strictly below this percentage.
    pub max_cloud_cover: Option<f64>,
    pub start_year: Option<i32>,
    pub stop_year: Option<i32>,
}

impl IngestFilter {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(cc) = self.max_cloud_cover {
            if !(cc.is_finite() && (0.0..=100.0).contains(&cc)) {
                return Err(AppError::invalid(format!(
                    "Invalid cloud cover threshold {cc} (must be within [0, 100])."
                )));
            }
        }
        if let (Some(start), Some(stop)) = (self.start_year, self.stop_year) {
            if start > stop {
                return Err(AppError::invalid(format!(
                    "Invalid year range: start year {start} is after stop year {stop}."
                )));
            }
        }
        Ok(())
    }

    pub fn accepts_year(&self, date: NaiveDate) -> bool {
        let year = date.year();
        self.start_year.is_none_or(|start| year >= start)
            && self.stop_year.is_none_or(|stop| year <= stop)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub csv_path: PathBuf,
    pub ingest: IngestFilter,
    pub filter: FilterConfig,
    pub policy: BaselinePolicy,

    /// Explicit key/value sink path; falls back to `GITHUB_OUTPUT`.
    pub github_output: Option<PathBuf>,
    /// Skip the key/value sink entirely.
    pub no_sink: bool,
    pub table: bool,

    pub export_matrix: Option<PathBuf>,
    pub export_pairs: Option<PathBuf>,
}
