//! # Bucketing
//! Turns a sorted, sparse event log into a dense per-unit sequence of
//! `(total, count)` aggregates.
//!
//! Events are attributed to the unit *following* their occurrence: an event
//! at `18:11:08` counts towards the `18:12:00` bucket. The first bucket of a
//! sequence is the unit containing the first event, so it is always empty;
//! the last bucket is the one the last event was attributed to.
//!
//! Truncation is done on the naive timeline relative to the Unix epoch, which
//! matches calendar truncation for any unit that divides a day.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{AggregateError, Result};
use crate::events::Event;

const MICROS_PER_SEC: i64 = 1_000_000;

/// Bucket granularity. Always strictly positive, microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeUnit {
    micros: i64,
}

impl TimeUnit {
    pub fn minute() -> Self {
        Self {
            micros: 60 * MICROS_PER_SEC,
        }
    }

    pub fn from_secs(secs: u64) -> Result<Self> {
        let micros = i64::try_from(secs)
            .ok()
            .and_then(|s| s.checked_mul(MICROS_PER_SEC))
            .ok_or(AggregateError::InvalidTimeUnit)?;
        Self::from_micros(micros)
    }

    pub fn from_delta(delta: TimeDelta) -> Result<Self> {
        let micros = delta
            .num_microseconds()
            .ok_or(AggregateError::InvalidTimeUnit)?;
        Self::from_micros(micros)
    }

    fn from_micros(micros: i64) -> Result<Self> {
        if micros <= 0 {
            return Err(AggregateError::InvalidTimeUnit);
        }
        Ok(Self { micros })
    }

    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::microseconds(self.micros)
    }

    pub fn as_micros(&self) -> i64 {
        self.micros
    }

    /// Round `ts` down to the start of its containing unit.
    pub fn truncate(&self, ts: NaiveDateTime) -> Result<NaiveDateTime> {
        let rem = ts.and_utc().timestamp_micros().rem_euclid(self.micros);
        ts.checked_sub_signed(TimeDelta::microseconds(rem))
            .ok_or_else(|| out_of_range(ts))
    }

    /// The bucket an event at `ts` is attributed to: one unit later, truncated.
    pub fn bucket_of(&self, ts: NaiveDateTime) -> Result<NaiveDateTime> {
        let shifted = ts
            .checked_add_signed(self.as_delta())
            .ok_or_else(|| out_of_range(ts))?;
        self.truncate(shifted)
    }

    /// Whole units from `start` to `ts`; negative when `ts < start`.
    fn units_between(&self, start: NaiveDateTime, ts: NaiveDateTime) -> Result<i64> {
        let micros = (ts - start)
            .num_microseconds()
            .ok_or_else(|| out_of_range(ts))?;
        Ok(micros.div_euclid(self.micros))
    }
}

impl Default for TimeUnit {
    fn default() -> Self {
        Self::minute()
    }
}

fn out_of_range(ts: NaiveDateTime) -> AggregateError {
    AggregateError::TimestampOutOfRange {
        timestamp: ts.to_string(),
    }
}

/// Accumulated durations for one time unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    pub total: f64,
    pub count: u64,
}

impl Bucket {
    pub fn new(total: f64, count: u64) -> Self {
        Self { total, count }
    }

    /// Fold one event value into the bucket.
    pub fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean value, or 0 for an empty bucket.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Unit-aligned `[start, end]` span covered by an event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Compute the window spanned by a sorted event log.
///
/// Only the first and last events are parsed: `start` is the first event
/// truncated to its unit, `end` is the bucket the last event is attributed
/// to. A malformed timestamp anywhere else goes unnoticed here and is
/// reported by [`dense_sequence`].
pub fn window_bounds(events: &[Event], unit: TimeUnit) -> Result<WindowBounds> {
    let (first, last) = match (events.first(), events.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(AggregateError::EmptyInput),
    };

    let start = unit.truncate(first.parsed_timestamp()?)?;
    let end = unit.bucket_of(last.parsed_timestamp()?)?;

    Ok(WindowBounds { start, end })
}

/// Gap-free run of buckets, index `i` covering `start + i * unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSequence {
    start: NaiveDateTime,
    unit: TimeUnit,
    buckets: Vec<Bucket>,
}

impl DenseSequence {
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Timestamp of the last bucket.
    pub fn end(&self) -> NaiveDateTime {
        self.time_at(self.buckets.len().saturating_sub(1))
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Always false for a sequence built by [`dense_sequence`].
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Start of the unit covered by bucket `index`.
    pub fn time_at(&self, index: usize) -> NaiveDateTime {
        self.start + TimeDelta::microseconds(self.unit.micros * index as i64)
    }

    /// Number of events folded into the sequence.
    pub fn event_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Sum of all event values folded into the sequence.
    pub fn value_total(&self) -> f64 {
        self.buckets.iter().map(|b| b.total).sum()
    }

    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| b.is_empty()).count()
    }
}

/// Bucket a sorted event log into a dense per-unit sequence.
///
/// Fails on the first unparseable timestamp; nothing is returned on error.
pub fn dense_sequence(events: &[Event], unit: TimeUnit) -> Result<DenseSequence> {
    let bounds = window_bounds(events, unit)?;

    let span = unit.units_between(bounds.start, bounds.end)?;
    let len = usize::try_from(span)
        .ok()
        .and_then(|s| s.checked_add(1))
        .ok_or_else(|| out_of_range(bounds.end))?;

    let mut buckets = vec![Bucket::default(); len];

    for ev in events {
        let ts = unit.bucket_of(ev.parsed_timestamp()?)?;
        let index = unit.units_between(bounds.start, ts)?;
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| buckets.get_mut(i))
            .ok_or_else(|| AggregateError::OutOfOrder {
                timestamp: ev.timestamp.clone(),
            })?;
        slot.add(ev.value());
    }

    tracing::debug!(
        events = events.len(),
        buckets = len,
        start = %bounds.start,
        end = %bounds.end,
        "bucketed events"
    );

    Ok(DenseSequence {
        start: bounds.start,
        unit,
        buckets,
    })
}
