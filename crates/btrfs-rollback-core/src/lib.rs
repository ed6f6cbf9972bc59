mod config;
mod layout;
mod snapshot;

pub use config::{RollbackConfig, DEFAULT_CONFIG_PATH};
pub use layout::SubvolumeLayout;
pub use snapshot::{sort_snapshots, SnapshotDescriptor, SnapshotMetadataError};
