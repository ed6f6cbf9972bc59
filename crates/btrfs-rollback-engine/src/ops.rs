use std::fmt;
use std::path::{Path, PathBuf};

use crate::OpsError;

pub trait BtrfsOps {
    fn path_exists(&self, path: &Path) -> bool;

    fn is_subvolume(&self, path: &Path) -> Result<bool, OpsError>;

    fn is_mounted(&self, mountpoint: &Path) -> Result<bool, OpsError>;

    fn mount_top_level(&self, device: &Path, mountpoint: &Path) -> Result<(), OpsError>;

    fn delete_subvolume(&self, path: &Path) -> Result<(), OpsError>;

    fn rename(&self, from: &Path, to: &Path) -> Result<(), OpsError>;

    fn snapshot(&self, source: &Path, destination: &Path) -> Result<(), OpsError>;

    fn set_default(&self, path: &Path) -> Result<(), OpsError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    MountTopLevel { device: PathBuf, mountpoint: PathBuf },
    DeleteSubvolume { path: PathBuf },
    Move { from: PathBuf, to: PathBuf },
    Snapshot { source: PathBuf, destination: PathBuf },
    SetDefault { path: PathBuf },
}

impl PlannedAction {
    pub fn apply(&self, ops: &dyn BtrfsOps) -> Result<(), OpsError> {
        match self {
            Self::MountTopLevel { device, mountpoint } => ops.mount_top_level(device, mountpoint),
            Self::DeleteSubvolume { path } => ops.delete_subvolume(path),
            Self::Move { from, to } => ops.rename(from, to),
            Self::Snapshot {
                source,
                destination,
            } => ops.snapshot(source, destination),
            Self::SetDefault { path } => ops.set_default(path),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::MountTopLevel { device, mountpoint } => format!(
                "mount {} at {} (subvolid=5)",
                device.display(),
                mountpoint.display()
            ),
            Self::DeleteSubvolume { path } => {
                format!("delete old subvolume: {}", path.display())
            }
            Self::Move { from, to } => format!("move {} to {}", from.display(), to.display()),
            Self::Snapshot {
                source,
                destination,
            } => format!(
                "create snapshot from {} to {}",
                source.display(),
                destination.display()
            ),
            Self::SetDefault { path } => {
                format!("set default subvolume to: {}", path.display())
            }
        }
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MountTopLevel { device, mountpoint } => write!(
                f,
                "mount -o subvolid=5 {} {}",
                device.display(),
                mountpoint.display()
            ),
            Self::DeleteSubvolume { path } => {
                write!(f, "btrfs subvolume delete {}", path.display())
            }
            Self::Move { from, to } => write!(f, "mv {} {}", from.display(), to.display()),
            Self::Snapshot {
                source,
                destination,
            } => write!(
                f,
                "btrfs subvolume snapshot {} {}",
                source.display(),
                destination.display()
            ),
            Self::SetDefault { path } => {
                write!(f, "btrfs subvolume set-default {}", path.display())
            }
        }
    }
}
