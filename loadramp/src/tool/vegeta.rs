use super::{Attack, Attacker, Reporter};
use crate::{RampError, TargetStreamCursor};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// `vegeta` (or anything accepting its `attack`/`report` command lines).
///
/// Every command line is echoed to stderr before it runs.
#[derive(Clone, Debug)]
pub struct Vegeta {
    program: PathBuf,
}

impl Vegeta {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, args: &[OsString]) -> Command {
        eprintln!("{}", self.command_line(args));
        let mut command = Command::new(&self.program);
        command.args(args);
        command
    }

    fn command_line(&self, args: &[OsString]) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn spawn_error(&self, source: std::io::Error) -> RampError {
        RampError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl Attacker<File> for Vegeta {
    #[instrument(skip_all, fields(rate = %attack.rate))]
    async fn attack(
        &self,
        attack: &Attack<'_>,
        targets: &mut TargetStreamCursor<File>,
    ) -> Result<(), RampError> {
        let args = attack_args(attack);
        let status = self
            .command(&args)
            .stdin(targets.stdio()?)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            warn!("Attack exited with {status}");
        }
        Ok(())
    }
}

impl Reporter for Vegeta {
    #[instrument(skip_all, fields(artifact = %artifact.display()))]
    async fn report(&self, artifact: &Path, buckets: &[Duration]) -> Result<Vec<u8>, RampError> {
        let args = report_args(artifact, buckets);
        let output = self
            .command(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(RampError::ToolFailed {
                command: self.command_line(&args),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        trace!("Report is {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}

pub(crate) fn attack_args(attack: &Attack<'_>) -> Vec<OsString> {
    let mut output = OsString::from("-output=");
    output.push(attack.output);
    vec![
        "attack".into(),
        format!("-duration={}", go_duration(attack.duration)).into(),
        "-format=json".into(),
        "-lazy".into(),
        format!(
            "-rate={}/{}",
            attack.rate.millirate(),
            go_duration(attack.window)
        )
        .into(),
        output,
    ]
}

pub(crate) fn report_args(artifact: &Path, buckets: &[Duration]) -> Vec<OsString> {
    let buckets: Vec<String> = buckets
        .iter()
        .map(|bucket| format!("{}ns", bucket.as_nanos()))
        .collect();
    vec![
        "report".into(),
        "-type=json".into(),
        format!("-buckets=[{}]", buckets.join(",")).into(),
        artifact.into(),
    ]
}

/// Seconds in the notation Go's `time.ParseDuration` accepts.
fn go_duration(duration: Duration) -> String {
    format!("{}s", duration.as_secs_f64())
}
