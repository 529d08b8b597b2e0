//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and builds a validated `RunConfig`
//! - reads and filters acquisitions
//! - enumerates pairs and formats the job matrix
//! - prints reports and writes the key/value outputs and optional exports

use clap::Parser;

use crate::cli::{Command, FilterArgs, InspectArgs, MatrixArgs};
use crate::domain::{BaselinePolicy, FilterConfig, IngestFilter, MonthFilter, MonthRange, PolicyKind, RunConfig};
use crate::error::AppError;
use crate::io::sink::{KeyValueSink, resolve_output_path};

pub mod pipeline;

/// Entry point for the `pairs` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    // `pairs -i acq.csv ...` behaves like `pairs matrix -i acq.csv ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Matrix(args) => handle_matrix(args),
        Command::Dates(args) => handle_dates(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn init_logging() {
    // Logs go to stderr so stdout stays a clean report.
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init()
        .ok();
}

fn handle_matrix(args: MatrixArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let output = pipeline::run_matrix(&config)?;
    let run = &output.run;

    print!(
        "{}",
        crate::report::format_run_summary(&output.ingest, &run.dates, &run.pairs, &config)
    );
    if config.table && !run.pairs.is_empty() {
        println!();
        print!("{}", crate::report::format_pair_table(&run.pairs));
    }

    // Key/value outputs for the CI matrix.
    if config.no_sink {
        log::debug!("Key/value outputs disabled (--no-sink).");
    } else if let Some(path) = resolve_output_path(config.github_output.as_deref()) {
        let mut sink = KeyValueSink::append_to(&path)?;
        crate::report::publish_outputs(&mut sink, &run.dates, &run.matrix)?;
        log::info!("Wrote outputs to {}", path.display());
    } else {
        log::warn!(
            "No output file: pass --github-output or set {}; skipping key/value outputs.",
            crate::io::sink::GITHUB_OUTPUT_ENV
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_matrix {
        crate::io::matrix::write_matrix_json(path, &run.matrix)?;
    }
    if let Some(path) = &config.export_pairs {
        crate::io::export::write_pairs_csv(path, &run.pairs)?;
    }

    Ok(())
}

fn handle_dates(args: FilterArgs) -> Result<(), AppError> {
    let ingest = ingest_filter_from_args(&args)?;
    let filter = filter_config_from_args(&args)?;
    let (_, dates) = pipeline::run_dates(&args.input, &ingest, &filter)?;

    let listing = crate::report::format_image_dates(&dates);
    if !listing.is_empty() {
        println!("{listing}");
    }
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let payload = crate::io::matrix::read_matrix_json(&args.matrix)?;
    print!("{}", crate::report::format_matrix_entries(&payload.include));
    Ok(())
}

/// Build and validate the run configuration for `pairs matrix`.
pub fn run_config_from_args(args: &MatrixArgs) -> Result<RunConfig, AppError> {
    let policy = match args.policy {
        PolicyKind::Fixed => BaselinePolicy::fixed_count(args.pairs_per_image, args.max_days)?,
        PolicyKind::Window => BaselinePolicy::window(args.min_days, args.max_days)?,
    };

    Ok(RunConfig {
        csv_path: args.filter.input.clone(),
        ingest: ingest_filter_from_args(&args.filter)?,
        filter: filter_config_from_args(&args.filter)?,
        policy,
        github_output: args.github_output.clone(),
        no_sink: args.no_sink,
        table: args.table,
        export_matrix: args.export_matrix.clone(),
        export_pairs: args.export_pairs.clone(),
    })
}

pub fn filter_config_from_args(args: &FilterArgs) -> Result<FilterConfig, AppError> {
    let month_filter = match (args.start_month, args.stop_month) {
        (Some(start), Some(stop)) => MonthFilter::Range(MonthRange::new(start, stop)?),
        (None, None) => MonthFilter::None,
        _ => {
            return Err(AppError::invalid(
                "`--start-month` and `--stop-month` must be given together.",
            ));
        }
    };
    FilterConfig::new(args.min_valid, month_filter)
}

fn ingest_filter_from_args(args: &FilterArgs) -> Result<IngestFilter, AppError> {
    let filter = IngestFilter {
        max_cloud_cover: args.cloud_cover,
        start_year: args.start_year,
        stop_year: args.stop_year,
    };
    filter.validate()?;
    Ok(filter)
}

/// Rewrite argv so a bare flag list defaults to `pairs matrix`.
///
/// Rules:
/// - `pairs -i acq.csv ...`        -> `pairs matrix -i acq.csv ...`
/// - `pairs --help/--version/-h`   -> unchanged (show top-level help/version)
/// - `pairs` / `pairs <subcommand>` -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "matrix" | "dates" | "inspect");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "matrix flags".
    if arg1.starts_with('-') {
        argv.insert(1, "matrix".to_string());
    }
    argv
}
