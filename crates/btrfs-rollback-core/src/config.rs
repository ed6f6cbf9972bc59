use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/btrfs-rollback.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RollbackConfig {
    #[serde(rename = "subvol_main")]
    pub main_subvolume: String,
    #[serde(rename = "subvol_snapshots")]
    pub snapshots_subvolume: String,
    pub mountpoint: PathBuf,
    #[serde(default)]
    pub dev: Option<PathBuf>,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        Self {
            main_subvolume: "@".to_string(),
            snapshots_subvolume: "@snapshots".to_string(),
            mountpoint: PathBuf::from("/btrfs"),
            dev: None,
        }
    }
}

impl RollbackConfig {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(input).context("failed to parse btrfs-rollback config")?;
        if config.main_subvolume.trim().is_empty() {
            return Err(anyhow!("subvol_main must not be empty"));
        }
        if config.snapshots_subvolume.trim().is_empty() {
            return Err(anyhow!("subvol_snapshots must not be empty"));
        }
        if config.mountpoint.as_os_str().is_empty() {
            return Err(anyhow!("mountpoint must not be empty"));
        }
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                return Self::default();
            }
            Err(err) => {
                warn!("failed reading config {}, using defaults: {err}", path.display());
                return Self::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => {
                debug!(path = %path.display(), ?config, "loaded config");
                config
            }
            Err(err) => {
                warn!("invalid config {}, using defaults: {err:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn mount_device(&self) -> Option<&Path> {
        self.dev
            .as_deref()
            .filter(|device| !device.as_os_str().is_empty())
    }
}
