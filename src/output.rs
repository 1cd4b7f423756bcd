//! Legacy output format: one JSON-ish object per line,
//! `{"date": "2018-12-26 18:11:00", "average_delivery_time": 25.5}`.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::bucket::{DenseSequence, TimeUnit};
use crate::events::format_timestamp;

/// One line of output.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageRecord {
    pub date: String,
    pub average_delivery_time: f64,
}

impl AverageRecord {
    pub fn to_line(&self) -> String {
        format!(
            "{{\"date\": \"{}\", \"average_delivery_time\": {}}}",
            self.date,
            format_average(self.average_delivery_time)
        )
    }
}

/// Integral values without a decimal point, everything else to one place.
pub fn format_average(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Pair each average with the start of its unit, beginning at `start`.
pub fn records(start: NaiveDateTime, unit: TimeUnit, averages: &[f64]) -> Vec<AverageRecord> {
    let step = unit.as_delta();
    let mut ts = start;
    averages
        .iter()
        .map(|&avg| {
            let rec = AverageRecord {
                date: format_timestamp(ts),
                average_delivery_time: avg,
            };
            ts += step;
            rec
        })
        .collect()
}

/// Render `averages` against the units of `seq`, newline terminated.
pub fn render(seq: &DenseSequence, averages: &[f64]) -> String {
    render_from(seq.start(), seq.unit(), averages)
}

pub fn render_from(start: NaiveDateTime, unit: TimeUnit, averages: &[f64]) -> String {
    let mut out = String::with_capacity(averages.len() * 64);
    for rec in records(start, unit, averages) {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}", rec.to_line());
    }
    out
}
