use loadramp_core::Rate;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RampError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to launch `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("`{command}` exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Malformed report for rate {rate}: {source}")]
    Report {
        rate: Rate,
        source: serde_json::Error,
    },

    #[error("Histogram bucket `{key}` is not a latency in nanoseconds")]
    InvalidBucket { key: String },
}
