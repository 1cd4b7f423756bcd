//! # Events
//! Delivery events as they appear in the input log, plus the fixed
//! timestamp formats used on the way in and out.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AggregateError, Result};

/// Input format, e.g. `2018-12-26 18:11:08.509654`.
pub const INPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%6f";

/// Output format, second precision, e.g. `2018-12-26 18:11:00`.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One `translation_delivered` event.
///
/// Only `timestamp` and `duration` take part in aggregation; the remaining
/// fields are carried so a full log line round-trips through the reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Naive local time in [`INPUT_TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Delivery duration, the aggregated attribute.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nr_words: Option<u64>,
}

impl Event {
    /// Bare event with only the aggregated fields set.
    pub fn new(timestamp: impl Into<String>, duration: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            duration,
            ..Self::default()
        }
    }

    /// Parse this event's timestamp.
    pub fn parsed_timestamp(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// Duration as the floating point value summed into buckets.
    pub fn value(&self) -> f64 {
        self.duration as f64
    }
}

/// Parse a timestamp in [`INPUT_TIMESTAMP_FORMAT`].
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, INPUT_TIMESTAMP_FORMAT).map_err(|_| {
        AggregateError::MalformedTimestamp {
            timestamp: raw.to_string(),
            expected_format: INPUT_TIMESTAMP_FORMAT,
        }
    })
}

/// Render a timestamp in [`OUTPUT_TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(OUTPUT_TIMESTAMP_FORMAT).to_string()
}
