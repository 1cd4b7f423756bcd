// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod bucket;
pub mod config;
pub mod error;
pub mod events;
pub mod io;
pub mod output;
pub mod pipeline;
pub mod rolling;

// ---- Re-exports for stable public API ----
pub use crate::bucket::{dense_sequence, window_bounds, Bucket, DenseSequence, TimeUnit, WindowBounds};
pub use crate::config::AggregatorConfig;
pub use crate::error::AggregateError;
pub use crate::events::Event;
pub use crate::pipeline::{PipelineOptions, PipelineOutput};
pub use crate::rolling::{moving_average, SlidingWindow};

use anyhow::Context;
use tracing::info;

/// Read the configured event log, aggregate it and write the result.
///
/// Example usage from a binary:
/// ```ignore
/// let cfg = delivery_time_aggregator::AggregatorConfig::load_default()?;
/// delivery_time_aggregator::run_with_config(&cfg)?;
/// ```
pub fn run_with_config(cfg: &AggregatorConfig) -> anyhow::Result<PipelineOutput> {
    let opts = cfg.pipeline_options()?;

    let events = io::read_events_file(&cfg.input_file)?;
    info!(
        path = %cfg.input_file.display(),
        events = events.len(),
        "event log loaded"
    );

    let out = pipeline::run(&events, &opts)
        .with_context(|| format!("aggregating {}", cfg.input_file.display()))?;

    io::write_output(&cfg.output_file, &out.rendered)?;
    info!(path = %cfg.output_file.display(), lines = out.averages.len(), "output written");

    Ok(out)
}
