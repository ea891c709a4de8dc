use std::ops::RangeInclusive;
use std::time::Duration;

/// How long each ramp step attacks the target.
pub const ATTACK_DURATION: Duration = Duration::from_secs(5);

/// Pause after each attack so in-flight requests drain before the next rate starts.
pub const SETTLE_INTERVAL: Duration = Duration::from_secs(5);

/// Window the per-step rate is expressed over (`<millirate>/1000s`).
pub const RATE_WINDOW: Duration = Duration::from_secs(1000);

/// Decibel steps of the rate sequence, `10^(i/10)` requests per second.
pub const RATE_STEPS: RangeInclusive<u32> = 0..=50;

/// Number of log-spaced histogram boundaries following the zero boundary.
pub const BUCKET_STEPS: u32 = 71;

/// First non-zero histogram boundary, in nanoseconds.
pub const BUCKET_BASE_NANOS: f64 = 1e3;

pub const DEFAULT_TOOL: &str = "vegeta";
pub const LATENCY_FILE: &str = "results_latency.txt";
pub const SUCCESS_FILE: &str = "results_success.txt";

/// Environment variable overriding the external tool program.
pub const TOOL_ENV: &str = "LOADRAMP_TOOL";

/// Environment variable overriding the working directory for artifacts and datasets.
pub const DIR_ENV: &str = "LOADRAMP_DIR";
