//! Seams to the external load-generation tool.
//!
//! The tool is a black box with two operations: attack a target stream at a rate, producing an
//! artifact, and summarize an artifact into a JSON report.
mod vegeta;

pub use vegeta::Vegeta;

use crate::{RampError, TargetStreamCursor};
use loadramp_core::Rate;
use std::path::Path;
use std::time::Duration;

/// One attack of the ramp.
#[derive(Clone, Debug)]
pub struct Attack<'a> {
    pub rate: Rate,
    pub duration: Duration,
    /// Window the rate is expressed over, e.g. `1258/1000s`.
    pub window: Duration,
    pub output: &'a Path,
}

#[allow(async_fn_in_trait)]
pub trait Attacker<R> {
    /// Run the attack to completion, reading targets lazily from `targets`.
    ///
    /// An unsuccessful attack is not an error here; the artifact (or its absence) is the only
    /// outcome the ramp observes.
    async fn attack(
        &self,
        attack: &Attack<'_>,
        targets: &mut TargetStreamCursor<R>,
    ) -> Result<(), RampError>;
}

#[allow(async_fn_in_trait)]
pub trait Reporter {
    /// Summarize `artifact` into the tool's JSON report, bucketing latencies by `buckets`.
    async fn report(&self, artifact: &Path, buckets: &[Duration]) -> Result<Vec<u8>, RampError>;
}
