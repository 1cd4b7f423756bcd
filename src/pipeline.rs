//! # Pipeline
//! Events → dense buckets → moving average → rendered output, in one call.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::bucket::{dense_sequence, Bucket, DenseSequence, TimeUnit, WindowBounds};
use crate::error::Result;
use crate::events::Event;
use crate::output;
use crate::rolling::moving_average;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("aggregator_events_total", "Events folded into buckets.");
        describe_counter!(
            "aggregator_buckets_total",
            "Dense buckets produced, empty ones included."
        );
        describe_counter!(
            "aggregator_empty_buckets_total",
            "Buckets with no events (gap fill)."
        );
        describe_gauge!(
            "aggregator_window_size",
            "Moving-average window size of the last run."
        );
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub unit: TimeUnit,
    pub window_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            unit: TimeUnit::minute(),
            window_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub sequence: DenseSequence,
    pub averages: Vec<f64>,
    pub rendered: String,
}

impl PipelineOutput {
    pub fn bounds(&self) -> WindowBounds {
        WindowBounds {
            start: self.sequence.start(),
            end: self.sequence.end(),
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        self.sequence.buckets()
    }
}

/// Run the whole aggregation over a sorted event log.
pub fn run(events: &[Event], opts: &PipelineOptions) -> Result<PipelineOutput> {
    ensure_metrics_described();

    let sequence = dense_sequence(events, opts.unit)?;
    let averages = moving_average(sequence.buckets(), opts.window_size)?;
    let rendered = output::render(&sequence, &averages);

    let empty = sequence.empty_buckets();
    counter!("aggregator_events_total").increment(events.len() as u64);
    counter!("aggregator_buckets_total").increment(sequence.len() as u64);
    counter!("aggregator_empty_buckets_total").increment(empty as u64);
    gauge!("aggregator_window_size").set(opts.window_size as f64);

    info!(
        events = events.len(),
        buckets = sequence.len(),
        empty_buckets = empty,
        window_size = opts.window_size,
        start = %sequence.start(),
        end = %sequence.end(),
        "aggregation finished"
    );

    Ok(PipelineOutput {
        sequence,
        averages,
        rendered,
    })
}
