use std::io;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BTRFS_ROLLBACK_LOG";

pub(crate) fn init_tracing(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

pub(crate) fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}
