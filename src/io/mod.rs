//! Input/output helpers.
//!
//! - acquisition CSV ingest + validation (`ingest`)
//! - key/value report sink (`sink`)
//! - pair exports (CSV) (`export`)
//! - matrix JSON read/write (`matrix`)

pub mod export;
pub mod ingest;
pub mod matrix;
pub mod sink;

pub use export::*;
pub use ingest::*;
pub use matrix::*;
pub use sink::*;
