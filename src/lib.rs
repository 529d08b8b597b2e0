//! `pair-matrix` library crate.
//!
//! The binary (`pairs`) is a thin wrapper around this library so that:
//!
//! - the filtering/pairing core is testable without spawning processes
//! - the core stays free of environment and file I/O (those live in `io` and `app`)
//! - other front-ends can drive `pipeline::build_pair_run` directly

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod matrix;
pub mod pairing;
pub mod report;
