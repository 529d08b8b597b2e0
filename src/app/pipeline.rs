//! Shared pipeline logic used by the `matrix` and `dates` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! acquisitions -> quality/season filter -> pair enumeration -> job matrix
//!
//! Nothing here touches stdout, the environment, or the sink; the command
//! handlers in `app` do the presentation and output.

use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{Acquisition, BaselinePolicy, FilterConfig, IngestFilter, PairSet, RunConfig};
use crate::error::AppError;
use crate::filter::filter_acquisitions;
use crate::io::ingest::{IngestedData, load_acquisitions};
use crate::matrix::{JobMatrix, format_matrix};
use crate::pairing::enumerate;

/// Pure outputs of filtering + pairing for one acquisition sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRun {
    pub dates: Vec<NaiveDate>,
    pub pairs: PairSet,
    pub matrix: JobMatrix,
}

/// All computed outputs of a single `pairs matrix` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub run: PairRun,
}

/// Filter, enumerate, and format. No I/O.
pub fn build_pair_run(
    acquisitions: &[Acquisition],
    filter: &FilterConfig,
    policy: &BaselinePolicy,
) -> Result<PairRun, AppError> {
    let dates = filter_acquisitions(acquisitions, filter);
    let pairs = enumerate(&dates, policy)?;
    let matrix = format_matrix(&pairs);
    Ok(PairRun {
        dates,
        pairs,
        matrix,
    })
}

/// Execute the full pipeline from the configured CSV.
pub fn run_matrix(config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_acquisitions(&config.csv_path, &config.ingest)?;
    let run = build_pair_run(&ingest.acquisitions, &config.filter, &config.policy)?;

    log::info!(
        "Kept {} of {} acquisitions; {} pair(s) under {}",
        run.dates.len(),
        ingest.rows_used(),
        run.pairs.len(),
        config.policy.describe()
    );
    if run.pairs.is_empty() {
        log::warn!("No pairs found; the job matrix is empty.");
    }

    Ok(RunOutput { ingest, run })
}

/// Ingest + filter only (no pairing).
pub fn run_dates(
    csv_path: &Path,
    ingest_filter: &IngestFilter,
    filter: &FilterConfig,
) -> Result<(IngestedData, Vec<NaiveDate>), AppError> {
    let ingest = load_acquisitions(csv_path, ingest_filter)?;
    let dates = filter_acquisitions(&ingest.acquisitions, filter);
    log::info!("Kept {} of {} acquisitions", dates.len(), ingest.rows_used());
    Ok((ingest, dates))
}
