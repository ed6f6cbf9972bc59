use std::fs;

use btrfs_rollback_core::{sort_snapshots, RollbackConfig, SnapshotDescriptor, SubvolumeLayout};
use tracing::debug;

use crate::{BtrfsOps, DiscoveryError};

pub fn build_catalog(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
) -> Result<Vec<SnapshotDescriptor>, DiscoveryError> {
    let layout = SubvolumeLayout::new(config);
    let snapshots_dir = layout.snapshots_dir();
    let read_dir_error = |source| DiscoveryError::ReadDir {
        path: snapshots_dir.clone(),
        source,
    };

    let mut entry_names = Vec::new();
    for entry in fs::read_dir(&snapshots_dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        if entry.file_type().map_err(read_dir_error)?.is_dir() {
            entry_names.push(entry.file_name());
        }
    }
    // discovery order is by entry name
    entry_names.sort();

    let mut snapshots = Vec::with_capacity(entry_names.len());
    for name in entry_names {
        let entry = name.to_string_lossy().into_owned();
        let subvolume = layout.snapshot_subvolume(&name);
        let is_subvolume = ops
            .is_subvolume(&subvolume)
            .map_err(|source| DiscoveryError::Probe {
                entry: entry.clone(),
                path: subvolume.clone(),
                source,
            })?;
        if !is_subvolume {
            debug!(entry = %entry, "skipping snapshot entry without a snapshot subvolume");
            continue;
        }

        let info_path = layout.snapshot_info_path(&name);
        let content =
            fs::read_to_string(&info_path).map_err(|source| DiscoveryError::ReadMetadata {
                entry: entry.clone(),
                path: info_path.clone(),
                source,
            })?;
        let descriptor = SnapshotDescriptor::from_info_xml(&content).map_err(|source| {
            DiscoveryError::DecodeMetadata {
                entry: entry.clone(),
                path: info_path.clone(),
                source,
            }
        })?;
        snapshots.push(descriptor);
    }

    sort_snapshots(&mut snapshots);
    debug!(count = snapshots.len(), dir = %snapshots_dir.display(), "built snapshot catalog");
    Ok(snapshots)
}
