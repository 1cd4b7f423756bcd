//! # Rolling Window
//! Trailing moving average over a dense bucket sequence.
//!
//! Keeps the last `window_size` buckets in a FIFO together with their running
//! `(total, count)`, so every step is O(1): add the incoming bucket, subtract
//! the one that fell out. The window grows during warm-up until it holds
//! `window_size` buckets, then slides.

use std::collections::VecDeque;

use crate::bucket::Bucket;
use crate::error::{AggregateError, Result};

/// Bounded sliding window over buckets.
///
/// Also usable incrementally: memory stays at `window_size` buckets no
/// matter how many are pushed.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    buf: VecDeque<Bucket>,
    window_size: usize,
    running_total: f64,
    running_count: u64,
}

impl SlidingWindow {
    /// Create an empty window holding at most `window_size` buckets.
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(AggregateError::InvalidWindowSize { window_size });
        }
        Ok(Self {
            buf: VecDeque::with_capacity(window_size),
            window_size,
            running_total: 0.0,
            running_count: 0,
        })
    }

    /// Admit `bucket`, evicting the oldest one once the window is full, and
    /// return the average over what the window now holds.
    pub fn push(&mut self, bucket: Bucket) -> f64 {
        self.buf.push_back(bucket);
        if self.buf.len() > self.window_size {
            if let Some(oldest) = self.buf.pop_front() {
                self.running_total -= oldest.total;
                self.running_count -= oldest.count;
            }
        }
        self.running_total += bucket.total;
        self.running_count += bucket.count;

        self.average()
    }

    /// Average over the current window, 0 when it holds no events.
    pub fn average(&self) -> f64 {
        if self.running_count == 0 {
            0.0
        } else {
            self.running_total / self.running_count as f64
        }
    }

    /// Buckets currently in the window (≤ `window_size`).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Events currently covered by the window.
    pub fn event_count(&self) -> u64 {
        self.running_count
    }
}

/// Moving average over `buckets`, one value per bucket in the same order.
pub fn moving_average(buckets: &[Bucket], window_size: usize) -> Result<Vec<f64>> {
    if buckets.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }
    let mut window = SlidingWindow::new(window_size)?;

    Ok(buckets.iter().map(|b| window.push(*b)).collect())
}
