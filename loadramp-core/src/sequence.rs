//! Log-spaced sequences driving the ramp.
//!
//! Both sequences step by one decibel (`10^(1/10) ≈ 1.2589`) and are recomputed identically on
//! every call.
use crate::{Rate, BUCKET_BASE_NANOS, BUCKET_STEPS, RATE_STEPS};
use std::iter;
use std::time::Duration;

/// Rates to ramp through, from 1/sec to 100k/sec.
pub fn rates() -> Vec<Rate> {
    RATE_STEPS.map(|i| Rate::new(decibels(i))).collect()
}

/// Histogram boundaries handed to the report: zero followed by 1µs to 10s.
pub fn buckets() -> Vec<Duration> {
    iter::once(Duration::ZERO)
        .chain((0..BUCKET_STEPS).map(|i| {
            Duration::from_nanos((BUCKET_BASE_NANOS * decibels(i)) as u64)
        }))
        .collect()
}

fn decibels(step: u32) -> f64 {
    10f64.powf(step as f64 / 10.)
}
