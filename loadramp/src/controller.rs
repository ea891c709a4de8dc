//! Run phase of the ramp.
//!
//! Each rate steps through `Pending -> Running -> Settling -> Done` strictly in order. A rate whose
//! artifact already exists goes straight from `Pending` to `Done`, which is what makes an
//! interrupted ramp resumable.
use crate::tool::{Attack, Attacker};
use crate::{ArtifactStatus, ArtifactStore, RampError, TargetStreamCursor};
use loadramp_core::{RampConfig, RampStatistics, Rate};
use std::io::{Read, Seek};
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Running,
    Settling,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Skipped,
    Attacked,
}

pub struct RampController<A> {
    attacker: A,
    store: ArtifactStore,
    attack_duration: Duration,
    rate_window: Duration,
    settle_interval: Duration,
}

impl<A> RampController<A> {
    pub fn new(attacker: A, store: ArtifactStore, config: &RampConfig) -> Self {
        Self {
            attacker,
            store,
            attack_duration: config.attack_duration,
            rate_window: config.rate_window,
            settle_interval: config.settle_interval,
        }
    }

    /// Make sure every rate has an artifact, attacking the ones that don't.
    ///
    /// A failed attack is not detected; only a tool that can't be launched at all stops the ramp.
    #[instrument(name = "ramp", skip_all, fields(rates = rates.len()))]
    pub async fn run<R>(
        &self,
        rates: &[Rate],
        targets: &mut TargetStreamCursor<R>,
    ) -> Result<RampStatistics, RampError>
    where
        A: Attacker<R>,
        R: Read + Seek,
    {
        let mut stats = RampStatistics::default();
        for &rate in rates {
            match self.step(rate, targets).await? {
                StepOutcome::Skipped => stats.skipped += 1,
                StepOutcome::Attacked => stats.attacked += 1,
            }
        }
        info!(
            "Ramp complete: {} attacked, {} already done",
            stats.attacked, stats.skipped
        );
        Ok(stats)
    }

    pub async fn step<R>(
        &self,
        rate: Rate,
        targets: &mut TargetStreamCursor<R>,
    ) -> Result<StepOutcome, RampError>
    where
        A: Attacker<R>,
        R: Read + Seek,
    {
        let output = self.store.path(rate);
        let mut outcome = StepOutcome::Skipped;
        let mut state = StepState::Pending;

        loop {
            trace!(%rate, ?state);
            state = match state {
                StepState::Pending => match self.store.status(rate).await? {
                    ArtifactStatus::Present => {
                        debug!("Skipping rate {rate}; {} exists", output.display());
                        StepState::Done
                    }
                    ArtifactStatus::Absent => StepState::Running,
                },
                StepState::Running => {
                    let attack = Attack {
                        rate,
                        duration: self.attack_duration,
                        window: self.rate_window,
                        output: &output,
                    };
                    self.attacker.attack(&attack, targets).await?;
                    outcome = StepOutcome::Attacked;
                    StepState::Settling
                }
                StepState::Settling => {
                    debug!(
                        "Settling for {}",
                        humantime::format_duration(self.settle_interval)
                    );
                    tokio::time::sleep(self.settle_interval).await;

                    let discarded = targets.realign()?;
                    if discarded > 0 {
                        debug!("Discarded {discarded} bytes of a partially read target");
                    }
                    StepState::Done
                }
                StepState::Done => return Ok(outcome),
            };
        }
    }
}
