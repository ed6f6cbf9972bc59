use std::io;
use std::path::PathBuf;

use btrfs_rollback_core::SnapshotMetadataError;
use thiserror::Error;

use crate::RollbackStep;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("failed launching `{command}`")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed ({status}): {stderr}")]
    Exit {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("{action}")]
    Io {
        action: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed reading snapshot directory {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed probing snapshot entry '{entry}' at {}", .path.display())]
    Probe {
        entry: String,
        path: PathBuf,
        #[source]
        source: OpsError,
    },
    #[error("could not read snapshot info for '{entry}' at {}", .path.display())]
    ReadMetadata {
        entry: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse snapshot info for '{entry}' at {}", .path.display())]
    DecodeMetadata {
        entry: String,
        path: PathBuf,
        #[source]
        source: SnapshotMetadataError,
    },
}

#[derive(Debug, Error)]
pub enum MountError {
    #[error("failed checking whether {} is mounted", .mountpoint.display())]
    Probe {
        mountpoint: PathBuf,
        #[source]
        source: OpsError,
    },
    #[error("device not specified, unable to mount {}", .mountpoint.display())]
    DeviceNotSpecified { mountpoint: PathBuf },
    #[error("failed to mount {} at {}", .device.display(), .mountpoint.display())]
    MountFailed {
        device: PathBuf,
        mountpoint: PathBuf,
        #[source]
        source: OpsError,
    },
}

#[derive(Debug, Error)]
pub enum RollbackError {
    #[error("invalid rollback target '{id}': {reason}")]
    InvalidTarget { id: String, reason: &'static str },
    #[error("rollback step {step} failed ({action})")]
    Step {
        step: RollbackStep,
        action: String,
        #[source]
        source: OpsError,
    },
}

impl RollbackError {
    pub fn step(&self) -> Option<RollbackStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn recovery_hint(&self, main: &str) -> Option<String> {
        match self.step()? {
            RollbackStep::CreateSnapshot => Some(format!(
                "no main subvolume exists; the previous root is still available as '{main}.old' and can be renamed back to '{main}'"
            )),
            RollbackStep::SetDefault => Some(format!(
                "the new '{main}' is in place but is not the default subvolume; run `btrfs subvolume set-default` on it or boot with subvol={main}"
            )),
            RollbackStep::DeleteOld | RollbackStep::MoveCurrent => None,
        }
    }
}
