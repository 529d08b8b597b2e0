//! Command-line parsing for the acquisition pair-matrix tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! filtering/pairing code. Values are range-checked here where clap can do it;
//! cross-field rules are checked when building `RunConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PolicyKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pairs", version, about = "Acquisition date filtering and pair job-matrix generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter acquisitions, enumerate pairs, print a summary, and write CI outputs.
    Matrix(MatrixArgs),
    /// Print the filtered acquisition dates only (no pairing).
    Dates(FilterArgs),
    /// Print the pairs in a previously exported matrix JSON.
    Inspect(InspectArgs),
}

/// Input and filtering options shared by `matrix` and `dates`.
#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    /// Acquisition CSV (`date`, `valid_fraction`, optional `cloud_cover`).
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Minimum valid-pixel fraction an acquisition needs (inclusive).
    #[arg(long, default_value_t = 0.9)]
    pub min_valid: f64,

    /// First month of the season (1-12). Requires `--stop-month`.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12), requires = "stop_month")]
    pub start_month: Option<u32>,

    /// Last month of the season (1-12). May be earlier than the start month to wrap the year end.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12), requires = "start_month")]
    pub stop_month: Option<u32>,

    /// Keep only acquisitions with `cloud_cover` strictly below this percentage.
    #[arg(long, value_name = "PCT")]
    pub cloud_cover: Option<f64>,

    /// First calendar year to keep.
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last calendar year to keep.
    #[arg(long)]
    pub stop_year: Option<i32>,
}

/// Options for a full pairing run.
#[derive(Debug, Args, Clone)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Pairing policy.
    #[arg(long, value_enum, default_value_t = PolicyKind::Fixed)]
    pub policy: PolicyKind,

    /// Forward partners per image (`--policy fixed`).
    #[arg(short = 'n', long, default_value_t = 1)]
    pub pairs_per_image: usize,

    /// Minimum temporal baseline in days (`--policy window`).
    #[arg(long, default_value_t = 0)]
    pub min_days: u32,

    /// Maximum temporal baseline in days.
    #[arg(long, default_value_t = 100)]
    pub max_days: u32,

    /// Key/value output file (defaults to `$GITHUB_OUTPUT`).
    #[arg(long, value_name = "PATH")]
    pub github_output: Option<PathBuf>,

    /// Do not write key/value outputs even if `$GITHUB_OUTPUT` is set.
    #[arg(long)]
    pub no_sink: bool,

    /// Print the pair table after the summary.
    #[arg(long)]
    pub table: bool,

    /// Export the job matrix as pretty-printed JSON.
    #[arg(long = "export-matrix", value_name = "JSON")]
    pub export_matrix: Option<PathBuf>,

    /// Export pairs with baselines to CSV.
    #[arg(long = "export-pairs", value_name = "CSV")]
    pub export_pairs: Option<PathBuf>,
}

/// Options for inspecting a saved matrix.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Matrix JSON file produced by `pairs matrix --export-matrix`.
    #[arg(long, value_name = "JSON")]
    pub matrix: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn matrix_defaults() {
        let cli = parse(&["pairs", "matrix", "-i", "acq.csv"]).unwrap();
        let Command::Matrix(args) = cli.command else {
            panic!("expected matrix command");
        };
        assert_eq!(args.policy, PolicyKind::Fixed);
        assert_eq!(args.pairs_per_image, 1);
        assert_eq!(args.max_days, 100);
        assert!((args.filter.min_valid - 0.9).abs() < 1e-12);
        assert!(args.filter.start_month.is_none());
    }

    #[test]
    fn month_flags_come_together() {
        assert!(parse(&["pairs", "dates", "-i", "a.csv", "--start-month", "12"]).is_err());
        assert!(parse(&["pairs", "dates", "-i", "a.csv", "--start-month", "12", "--stop-month", "2"]).is_ok());
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(parse(&["pairs", "dates", "-i", "a.csv", "--start-month", "0", "--stop-month", "2"]).is_err());
        assert!(parse(&["pairs", "dates", "-i", "a.csv", "--start-month", "1", "--stop-month", "13"]).is_err());
    }

    #[test]
    fn window_policy_flags() {
        let cli = parse(&[
            "pairs", "matrix", "-i", "a.csv", "--policy", "window", "--min-days", "5", "--max-days", "60",
        ])
        .unwrap();
        let Command::Matrix(args) = cli.command else {
            panic!("expected matrix command");
        };
        assert_eq!(args.policy, PolicyKind::Window);
        assert_eq!((args.min_days, args.max_days), (5, 60));
    }
}
