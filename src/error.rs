//! Error taxonomy for the aggregation core.
//!
//! Every variant is terminal for the operation that raised it: nothing is
//! retried internally and no partial result is ever returned alongside it.

/// Errors raised by bucketing and averaging.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// No events were supplied to bucketing.
    #[error("no events found, please provide a non-empty list of events")]
    EmptyInput,
    /// No buckets were supplied to averaging.
    #[error("dataset was empty, please provide a non-empty dataset")]
    EmptyDataset,
    /// Moving-average window below one bucket.
    #[error("window size must be at least 1, got {window_size}")]
    InvalidWindowSize { window_size: usize },
    /// Bucket granularity that is zero or finer than a microsecond.
    #[error("time unit must be at least one microsecond")]
    InvalidTimeUnit,
    /// A timestamp that does not match the fixed input format.
    #[error("invalid timestamp {timestamp:?}, expected format {expected_format}")]
    MalformedTimestamp {
        timestamp: String,
        expected_format: &'static str,
    },
    /// An event that falls outside the window spanned by the first and last
    /// events, i.e. the input was not sorted ascending.
    #[error("event at {timestamp} lies outside the event window; input must be sorted by timestamp")]
    OutOfOrder { timestamp: String },
    /// A timestamp too close to the end of the representable range to shift
    /// into its bucket.
    #[error("timestamp {timestamp} is out of the supported range")]
    TimestampOutOfRange { timestamp: String },
}

pub type Result<T> = std::result::Result<T, AggregateError>;
