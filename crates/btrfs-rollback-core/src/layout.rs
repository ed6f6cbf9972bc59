use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::RollbackConfig;

const BACKUP_SUFFIX: &str = ".old";
const SNAPSHOT_DATA_DIR: &str = "snapshot";
const SNAPSHOT_INFO_FILE: &str = "info.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubvolumeLayout {
    mountpoint: PathBuf,
    main_subvolume: String,
    snapshots_subvolume: String,
}

impl SubvolumeLayout {
    pub fn new(config: &RollbackConfig) -> Self {
        Self {
            mountpoint: config.mountpoint.clone(),
            main_subvolume: config.main_subvolume.clone(),
            snapshots_subvolume: config.snapshots_subvolume.clone(),
        }
    }

    pub fn main_subvolume(&self) -> PathBuf {
        self.mountpoint.join(&self.main_subvolume)
    }

    pub fn backup_subvolume(&self) -> PathBuf {
        let mut name = OsString::from(&self.main_subvolume);
        name.push(BACKUP_SUFFIX);
        self.mountpoint.join(name)
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.mountpoint.join(&self.snapshots_subvolume)
    }

    pub fn snapshot_entry_dir(&self, entry: impl AsRef<Path>) -> PathBuf {
        self.snapshots_dir().join(entry)
    }

    pub fn snapshot_subvolume(&self, entry: impl AsRef<Path>) -> PathBuf {
        self.snapshot_entry_dir(entry).join(SNAPSHOT_DATA_DIR)
    }

    pub fn snapshot_info_path(&self, entry: impl AsRef<Path>) -> PathBuf {
        self.snapshot_entry_dir(entry).join(SNAPSHOT_INFO_FILE)
    }
}
