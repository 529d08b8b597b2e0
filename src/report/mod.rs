//! Reporting: terminal summaries and the key/value outputs consumed by CI.

use chrono::NaiveDate;

use crate::error::AppError;
use crate::io::sink::{KEY_IMAGE_DATES, KEY_MATRIX, KEY_PAIR_COUNT, ReportSink};
use crate::matrix::JobMatrix;

pub mod format;

pub use format::*;

/// Write the filtered dates, the matrix payload, and the pair count to `sink`.
pub fn publish_outputs(sink: &mut dyn ReportSink, dates: &[NaiveDate], matrix: &JobMatrix) -> Result<(), AppError> {
    sink.write_value(KEY_IMAGE_DATES, &format_image_dates(dates))?;
    sink.write_value(KEY_MATRIX, &matrix.to_json()?)?;
    sink.write_value(KEY_PAIR_COUNT, &matrix.pair_count.to_string())?;
    Ok(())
}
