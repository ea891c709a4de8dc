use loadramp::RampError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Unable to open the target stream: {0}")]
    Targets(#[source] io::Error),

    #[error("Unable to create the output datasets: {0}")]
    Datasets(#[source] io::Error),

    #[error(transparent)]
    Ramp(#[from] RampError),
}
