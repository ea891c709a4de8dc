//! Default `load-ramp` runtime
//!
//! Runs the two phases back to back: attack every rate that has no artifact yet, then report on
//! every artifact and write the latency and success datasets.
use crate::error::RuntimeError;
use loadramp::tool::Vegeta;
use loadramp::{ArtifactStore, DatasetWriter, RampController, ReportAggregator, TargetStreamCursor};
use loadramp_core::{RampConfig, RunStatistics};
use std::fs::File;
#[allow(unused)]
use tracing::{debug, error, info, instrument, Instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// # Example
///
/// ```no_run
/// use loadramp_runtime::RampRuntime;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     RampRuntime::new().with_env().run().await.unwrap();
/// }
/// ```
pub struct RampRuntime {
    config: RampConfig,
}

impl Default for RampRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RampRuntime {
    pub fn new() -> Self {
        RampRuntime {
            config: RampConfig::default(),
        }
    }

    /// Apply `LOADRAMP_TOOL` and `LOADRAMP_DIR` overrides on top of the current config.
    pub fn with_env(mut self) -> Self {
        self.config = self.config.with_overrides(|key| std::env::var_os(key));
        self
    }

    pub fn config(mut self, config: RampConfig) -> Self {
        self.config = config;
        self
    }

    /// Ramp using this process's standard input as the target stream.
    pub async fn run(self) -> Result<RunStatistics, RuntimeError> {
        let targets = TargetStreamCursor::stdin().map_err(RuntimeError::Targets)?;
        self.run_with(targets).await
    }

    #[instrument(name = "load-ramp", skip_all)]
    pub async fn run_with(
        self,
        mut targets: TargetStreamCursor<File>,
    ) -> Result<RunStatistics, RuntimeError> {
        let config = self.config;
        config.log();

        let vegeta = Vegeta::new(&config.tool);
        let store = ArtifactStore::new(&config.work_dir);

        let controller = RampController::new(vegeta.clone(), store.clone(), &config);
        let ramp = controller.run(&config.rates, &mut targets).await?;

        let latency_path = config.latency_path();
        let success_path = config.success_path();
        let mut writer =
            DatasetWriter::create(&latency_path, &success_path).map_err(RuntimeError::Datasets)?;

        let aggregator = ReportAggregator::new(vegeta, store, config.buckets.clone());
        let aggregate = aggregator.run(&config.rates, &mut writer).await?;
        writer.finish().map_err(RuntimeError::Datasets)?;

        eprintln!(
            "# wrote {} and {}",
            latency_path.display(),
            success_path.display()
        );

        let stats = RunStatistics { ramp, aggregate };
        debug!("Run complete: {stats:?}");
        Ok(stats)
    }
}
