use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::{BtrfsOps, OpsError};

const DEFAULT_MOUNT_TABLE: &str = "/proc/self/mounts";

#[derive(Debug, Clone)]
pub struct SystemBtrfs {
    mount_table: PathBuf,
}

impl Default for SystemBtrfs {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemBtrfs {
    pub fn new() -> Self {
        Self::with_mount_table(DEFAULT_MOUNT_TABLE)
    }

    pub fn with_mount_table(mount_table: impl Into<PathBuf>) -> Self {
        Self {
            mount_table: mount_table.into(),
        }
    }
}

impl BtrfsOps for SystemBtrfs {
    fn path_exists(&self, path: &Path) -> bool {
        // dangling symlinks count as present
        fs::symlink_metadata(path).is_ok()
    }

    fn is_subvolume(&self, path: &Path) -> Result<bool, OpsError> {
        let mut command = btrfs_command();
        command.arg("subvolume").arg("show").arg(path);
        let output = launch(&mut command)?;
        Ok(output.status.success())
    }

    fn is_mounted(&self, mountpoint: &Path) -> Result<bool, OpsError> {
        let table = fs::read_to_string(&self.mount_table).map_err(|source| OpsError::Io {
            action: format!("failed reading mount table {}", self.mount_table.display()),
            source,
        })?;
        Ok(mount_table_contains(&table, mountpoint))
    }

    fn mount_top_level(&self, device: &Path, mountpoint: &Path) -> Result<(), OpsError> {
        let mut command = Command::new("mount");
        command
            .arg("-o")
            .arg("subvolid=5")
            .arg(device)
            .arg(mountpoint);
        run_checked(&mut command)
    }

    fn delete_subvolume(&self, path: &Path) -> Result<(), OpsError> {
        let mut command = btrfs_command();
        command.arg("subvolume").arg("delete").arg(path);
        run_checked(&mut command)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), OpsError> {
        debug!("rename {} -> {}", from.display(), to.display());
        fs::rename(from, to).map_err(|source| OpsError::Io {
            action: format!("failed to move {} to {}", from.display(), to.display()),
            source,
        })
    }

    fn snapshot(&self, source: &Path, destination: &Path) -> Result<(), OpsError> {
        let mut command = btrfs_command();
        command
            .arg("subvolume")
            .arg("snapshot")
            .arg(source)
            .arg(destination);
        run_checked(&mut command)
    }

    fn set_default(&self, path: &Path) -> Result<(), OpsError> {
        let mut command = btrfs_command();
        command.arg("subvolume").arg("set-default").arg(path);
        run_checked(&mut command)
    }
}

fn btrfs_command() -> Command {
    Command::new("btrfs")
}

fn launch(command: &mut Command) -> Result<Output, OpsError> {
    let rendered = render_command_line(command);
    debug!(command = %rendered, "running");
    command.output().map_err(|source| OpsError::Launch {
        command: rendered,
        source,
    })
}

fn run_checked(command: &mut Command) -> Result<(), OpsError> {
    let output = launch(command)?;
    if !output.status.success() {
        return Err(OpsError::Exit {
            command: render_command_line(command),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

pub(crate) fn render_command_line(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn mount_table_contains(table: &str, mountpoint: &Path) -> bool {
    table
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .any(|target| Path::new(&unescape_mount_field(target)) == mountpoint)
}

pub(crate) fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        let escape = bytes
            .get(index + 1..index + 4)
            .filter(|digits| bytes[index] == b'\\' && is_octal_escape(digits));
        match escape {
            Some(digits) => {
                decoded.push((digits[0] - b'0') * 64 + (digits[1] - b'0') * 8 + (digits[2] - b'0'));
                index += 4;
            }
            None => {
                decoded.push(bytes[index]);
                index += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits[0] <= b'3' && digits.iter().all(|digit| (b'0'..=b'7').contains(digit))
}
