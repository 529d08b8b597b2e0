//! Read/write job-matrix JSON files.
//!
//! The file holds exactly the `{"include": [...]}` document that goes to the
//! CI matrix, pretty-printed, so it can be reviewed or replayed with
//! `pairs inspect`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::MatrixPayload;
use crate::error::AppError;
use crate::matrix::JobMatrix;

/// Write a matrix JSON file.
pub fn write_matrix_json(path: &Path, matrix: &JobMatrix) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create matrix JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(&mut file, &matrix.payload)
        .map_err(|e| AppError::output(format!("Failed to write matrix JSON: {e}")))?;
    writeln!(file).map_err(|e| AppError::output(format!("Failed to write matrix JSON: {e}")))?;

    log::info!("Wrote {} matrix entries to {}", matrix.pair_count, path.display());
    Ok(())
}

/// Read a matrix JSON file.
pub fn read_matrix_json(path: &Path) -> Result<MatrixPayload, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid(format!("Failed to open matrix JSON '{}': {e}", path.display())))?;
    let payload: MatrixPayload =
        serde_json::from_reader(file).map_err(|e| AppError::invalid(format!("Invalid matrix JSON: {e}")))?;
    Ok(payload)
}
