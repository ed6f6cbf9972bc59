use std::fs;
use std::os::unix::fs::MetadataExt;

use anyhow::{Context, Result};

pub(crate) fn ensure_root() -> Result<()> {
    if effective_uid()? != 0 {
        anyhow::bail!("This program must be run with sudo or as root.");
    }
    Ok(())
}

// /proc/self is owned by the effective uid of the reading process
fn effective_uid() -> Result<u32> {
    fs::metadata("/proc/self")
        .map(|metadata| metadata.uid())
        .context("failed to determine effective user id")
}
