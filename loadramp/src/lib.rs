//! Ramp an external load generator across log-spaced request rates, then fold each rate's latency
//! histogram into plot-ready datasets.
//!
//! The run phase ([`RampController`]) makes sure every rate has a result artifact, sharing a single
//! [`TargetStreamCursor`] between the sequential attacks. The aggregate phase
//! ([`ReportAggregator`]) reports on every artifact and writes the rows through a
//! [`DatasetWriter`].
mod aggregator;
mod artifact;
mod controller;
mod cursor;
mod error;
pub mod tool;
mod writer;

pub use aggregator::{normalize, RateRows, ReportAggregator};
pub use artifact::{ArtifactStatus, ArtifactStore};
pub use controller::{RampController, StepOutcome, StepState};
pub use cursor::TargetStreamCursor;
pub use error::RampError;
pub use writer::DatasetWriter;
