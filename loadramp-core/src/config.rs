use crate::{
    buckets, rates, Rate, ATTACK_DURATION, DEFAULT_TOOL, DIR_ENV, LATENCY_FILE, RATE_WINDOW,
    SETTLE_INTERVAL, SUCCESS_FILE, TOOL_ENV,
};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, info};

/// Timing and naming policy for a ramp.
///
/// Defaults reproduce the fixed policy of the `load-ramp` binary. Every field can be replaced with
/// the builder-style setters, which is mostly useful for running small ramps in tests.
#[derive(Clone, Debug)]
pub struct RampConfig {
    pub tool: PathBuf,
    pub work_dir: PathBuf,
    pub attack_duration: Duration,
    pub settle_interval: Duration,
    pub rate_window: Duration,
    pub latency_file: PathBuf,
    pub success_file: PathBuf,
    pub rates: Vec<Rate>,
    pub buckets: Vec<Duration>,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
            work_dir: PathBuf::from("."),
            attack_duration: ATTACK_DURATION,
            settle_interval: SETTLE_INTERVAL,
            rate_window: RATE_WINDOW,
            latency_file: PathBuf::from(LATENCY_FILE),
            success_file: PathBuf::from(SUCCESS_FILE),
            rates: rates(),
            buckets: buckets(),
        }
    }
}

impl RampConfig {
    /// Defaults, overridden by `LOADRAMP_TOOL` and `LOADRAMP_DIR` when set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var_os(key))
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(tool) = lookup(TOOL_ENV) {
            debug!("{TOOL_ENV} overrides tool with {tool:?}");
            self.tool = tool.into();
        }
        if let Some(dir) = lookup(DIR_ENV) {
            debug!("{DIR_ENV} overrides working directory with {dir:?}");
            self.work_dir = dir.into();
        }
        self
    }

    pub fn tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn attack_duration(mut self, duration: Duration) -> Self {
        self.attack_duration = duration;
        self
    }

    pub fn settle_interval(mut self, interval: Duration) -> Self {
        self.settle_interval = interval;
        self
    }

    /// Denominator of the tool's `-rate=N/window` argument.
    pub fn rate_window(mut self, window: Duration) -> Self {
        self.rate_window = window;
        self
    }

    pub fn rates(mut self, rates: Vec<Rate>) -> Self {
        self.rates = rates;
        self
    }

    pub fn buckets(mut self, buckets: Vec<Duration>) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn latency_path(&self) -> PathBuf {
        self.resolve(&self.latency_file)
    }

    pub fn success_path(&self) -> PathBuf {
        self.resolve(&self.success_file)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        self.work_dir.join(file)
    }

    /// Logs the effective policy once at startup.
    pub fn log(&self) {
        info!(
            tool = %self.tool.display(),
            work_dir = %self.work_dir.display(),
            rates = self.rates.len(),
            buckets = self.buckets.len(),
            "Ramping with {} attacks, {} settle interval",
            humantime::format_duration(self.attack_duration),
            humantime::format_duration(self.settle_interval),
        );
    }
}
