//! Job-matrix formatting.
//!
//! Turns a `PairSet` into the `{"include": [...]}` document consumed by a CI
//! matrix. One entry per pair, same order, no dedup. An empty pair set is a
//! valid matrix with zero entries.

use crate::domain::{MatrixEntry, MatrixPayload, PairSet, iso_date};
use crate::error::AppError;

/// Formatter output: pair count plus the structured payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobMatrix {
    pub pair_count: usize,
    pub payload: MatrixPayload,
}

impl JobMatrix {
    /// Compact single-line JSON, suitable for a key/value sink.
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(&self.payload)
            .map_err(|e| AppError::output(format!("Failed to serialize job matrix: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(&self.payload)
            .map_err(|e| AppError::output(format!("Failed to serialize job matrix: {e}")))
    }
}

/// Build the job matrix for a pair set.
pub fn format_matrix(pairs: &PairSet) -> JobMatrix {
    let include: Vec<MatrixEntry> = pairs
        .iter()
        .map(|p| MatrixEntry {
            img1_date: iso_date(p.anchor_date),
            img2_date: iso_date(p.partner_date),
            name: p.label.clone(),
        })
        .collect();

    JobMatrix {
        pair_count: include.len(),
        payload: MatrixPayload { include },
    }
}
