use btrfs_rollback_core::RollbackConfig;
use tracing::{debug, info};

use crate::{BtrfsOps, MountError, PlannedAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    AlreadyMounted,
    Mounted(PlannedAction),
    WouldMount(PlannedAction),
}

pub fn ensure_mounted(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    simulate: bool,
) -> Result<MountOutcome, MountError> {
    let mountpoint = config.mountpoint.as_path();
    let mounted = ops
        .is_mounted(mountpoint)
        .map_err(|source| MountError::Probe {
            mountpoint: mountpoint.to_path_buf(),
            source,
        })?;
    if mounted {
        debug!(mountpoint = %mountpoint.display(), "mountpoint already mounted");
        return Ok(MountOutcome::AlreadyMounted);
    }

    let Some(device) = config.mount_device() else {
        return Err(MountError::DeviceNotSpecified {
            mountpoint: mountpoint.to_path_buf(),
        });
    };

    let action = PlannedAction::MountTopLevel {
        device: device.to_path_buf(),
        mountpoint: mountpoint.to_path_buf(),
    };
    if simulate {
        return Ok(MountOutcome::WouldMount(action));
    }

    info!(command = %action, "mounting top-level volume");
    action.apply(ops).map_err(|source| MountError::MountFailed {
        device: device.to_path_buf(),
        mountpoint: mountpoint.to_path_buf(),
        source,
    })?;
    Ok(MountOutcome::Mounted(action))
}
