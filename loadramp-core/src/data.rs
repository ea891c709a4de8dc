use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Offered load of a single ramp step, in requests per second.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
    pub fn new(per_second: f64) -> Self {
        Self(per_second)
    }

    pub fn per_second(&self) -> f64 {
        self.0
    }

    /// Integer encoding of the rate (`trunc(1000 * rate)`), used to name artifacts and as the
    /// numerator of the tool's `-rate` argument.
    pub fn millirate(&self) -> u64 {
        (self.0 * 1000.) as u64
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured summary of one artifact, as emitted by the tool's JSON report.
///
/// Only `success` and `buckets` are required. Bucket keys are the tool's native latency unit
/// (nanoseconds) and are kept as raw strings until normalization.
#[derive(Clone, Debug, Deserialize)]
pub struct Report {
    pub success: f64,
    pub buckets: BTreeMap<String, u64>,
    #[serde(default)]
    pub requests: Option<u64>,
    #[serde(default)]
    pub throughput: Option<f64>,
    #[serde(default)]
    pub status_codes: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl Report {
    pub fn from_json(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }

    pub fn total_count(&self) -> u64 {
        self.buckets.values().sum()
    }
}

/// (rate, latency, fraction of all responses): one line of the latency dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencyRow {
    pub rate: Rate,
    pub latency: Duration,
    pub fraction: f64,
}

impl fmt::Display for LatencyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rate, self.latency.as_nanos(), self.fraction)
    }
}

/// (rate, success ratio): one line of the success dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct SuccessRow {
    pub rate: Rate,
    pub success: f64,
}

impl fmt::Display for SuccessRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rate, self.success)
    }
}
