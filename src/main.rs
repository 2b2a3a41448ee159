//! lloydforge: cluster comma-separated points with Lloyd's k-means
//!
//! Standard output carries only the result contract: the centroid lines on
//! success, or a single diagnostic line on failure. Logging goes to stderr.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use lloydforge::{
    cli::literal_double_dash, fit_kmeans, load_points, load_points_from_path, write_report, Args,
    Error, GENERIC_DIAGNOSTIC,
};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let args = match Args::try_parse_from(literal_double_dash(std::env::args_os())) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return fail(&Error::Arguments(e.to_string()).into()),
    };

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

/// Setup logging based on verbosity; `RUST_LOG` applies when no flag is given
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // A subscriber may already be installed when embedded; keep going without ours.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Validate arguments, load points, fit and print the centroids
fn run(args: &Args) -> Result<()> {
    let config = args.config()?;

    let load_start = Instant::now();
    let points = match &args.input {
        Some(path) => load_points_from_path(path)?,
        None => load_points(io::stdin().lock())?,
    };
    info!(
        count = points.count(),
        dimension = points.dimension(),
        elapsed_ms = load_start.elapsed().as_secs_f64() * 1000.0,
        "input loaded"
    );

    let fit_start = Instant::now();
    let model = fit_kmeans(&points, &config)?;
    info!(
        k = config.k,
        iterations = model.iterations,
        stop_reason = ?model.stop_reason,
        max_shift = model.max_shift,
        inertia = model.inertia,
        cluster_sizes = ?model.cluster_sizes(),
        elapsed_ms = fit_start.elapsed().as_secs_f64() * 1000.0,
        "model fitted"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &model).context("failed to write centroids")?;

    Ok(())
}

/// Print the one diagnostic line for `err` and return a failing status
fn fail(err: &anyhow::Error) -> ExitCode {
    let message = err
        .downcast_ref::<Error>()
        .map(|e| e.diagnostic().message())
        .unwrap_or(GENERIC_DIAGNOSTIC);

    tracing::error!("{err:#}");
    // Nothing more can be reported once stdout is gone.
    let _ = writeln!(io::stdout().lock(), "{message}");
    ExitCode::FAILURE
}
