//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - upstream acquisitions (`Acquisition`) and ingest prefilters (`IngestFilter`)
//! - filter and policy configuration (`FilterConfig`, `MonthRange`, `BaselinePolicy`)
//! - pairing outputs (`Pair`, `PairSet`) and the job-matrix document (`MatrixPayload`)

pub mod types;

pub use types::*;
