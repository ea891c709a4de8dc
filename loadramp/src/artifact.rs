use crate::RampError;
use loadramp_core::Rate;
use std::path::{Path, PathBuf};

/// Whether a rate's artifact is on disk.
///
/// Presence is the only completion marker. An artifact left half-written by an interrupted run is
/// indistinguishable from a complete one and will be reported on as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactStatus {
    Absent,
    Present,
}

/// Directory of per-rate result artifacts, named `results_<millirate>.bin`.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, rate: Rate) -> PathBuf {
        self.dir.join(format!("results_{}.bin", rate.millirate()))
    }

    pub async fn status(&self, rate: Rate) -> Result<ArtifactStatus, RampError> {
        if tokio::fs::try_exists(self.path(rate)).await? {
            Ok(ArtifactStatus::Present)
        } else {
            Ok(ArtifactStatus::Absent)
        }
    }
}
