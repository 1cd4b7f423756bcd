//! Delivery time aggregator: binary entrypoint.
//! Reads a `translation_delivered` event log, buckets it per time unit and
//! writes the moving average of delivery time, one line per unit.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use delivery_time_aggregator::{run_with_config, AggregatorConfig};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line overrides. Anything left unset falls back to the config
/// file, then `AGGREGATOR_*` env vars, then built-in defaults.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Path to the input file containing events, one JSON object per line
    /// (default events.json, `-` for stdin)
    #[clap(long = "input_file")]
    input_file: Option<PathBuf>,
    /// Path to the aggregated output file
    /// (default aggregated_events.out.json, `-` for stdout)
    #[clap(long = "output_file")]
    output_file: Option<PathBuf>,
    /// Number of buckets in the moving-average window (default 10)
    #[clap(long = "window_size")]
    window_size: Option<usize>,
    /// Bucket width in seconds (default 60)
    #[clap(long = "unit_secs")]
    unit_secs: Option<u64>,
    /// TOML or JSON config file
    #[clap(long)]
    config: Option<PathBuf>,
}

/// Logs go to stderr so `--output_file -` stays clean.
/// RUST_LOG overrides the filter; AGGREGATOR_LOG_FORMAT=json switches format.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("delivery_time_aggregator=info,warn"));

    let json = std::env::var("AGGREGATOR_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Install a Prometheus recorder when AGGREGATOR_METRICS=1.
fn init_metrics() -> Result<Option<PrometheusHandle>> {
    let enabled = std::env::var("AGGREGATOR_METRICS")
        .ok()
        .is_some_and(|v| v == "1");
    if !enabled {
        return Ok(None);
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(Some(handle))
}

fn resolve_config(args: &Args) -> Result<AggregatorConfig> {
    let mut cfg = match &args.config {
        Some(path) => AggregatorConfig::load_from_file(path)?,
        None => AggregatorConfig::load_default()?,
    };
    cfg.apply_env()?;

    if let Some(p) = &args.input_file {
        cfg.input_file = p.clone();
    }
    if let Some(p) = &args.output_file {
        cfg.output_file = p.clone();
    }
    if let Some(w) = args.window_size {
        cfg.window_size = w;
    }
    if let Some(u) = args.unit_secs {
        cfg.unit_secs = u;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: Args) -> Result<()> {
    let metrics = init_metrics()?;
    let cfg = resolve_config(&args)?;
    debug!(?cfg, "resolved configuration");

    run_with_config(&cfg)?;

    if let Some(handle) = metrics {
        tracing::info!(metrics = %handle.render(), "run metrics");
    }
    Ok(())
}

/// Print the full error chain once. Written directly rather than logged so
/// it shows even when RUST_LOG filters errors out.
fn report<W: Write>(err: &anyhow::Error, mut out: W) {
    let _ = writeln!(out, "{err:#}");
}

fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, std::io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}
