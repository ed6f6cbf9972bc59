use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use btrfs_rollback_core::{RollbackConfig, SnapshotDescriptor, SubvolumeLayout};
use btrfs_rollback_engine::{
    build_catalog, ensure_mounted, execute_rollback_with, BtrfsOps, MountOutcome, RollbackReport,
    SystemBtrfs,
};
use tracing::debug;

use crate::completion::write_completions_script;
use crate::privilege::ensure_root;
use crate::prompt::{Interaction, TerminalInteraction};
use crate::render::{
    current_output_style, format_snapshot_table, render_mount_outcome, render_rollback_summary,
    render_status_line, render_step_line, OutputStyle,
};
use crate::{Cli, Commands};

#[derive(Debug, Clone)]
pub(crate) struct RollbackOptions {
    pub(crate) dry_run: bool,
    pub(crate) snapshot: Option<String>,
    pub(crate) assume_yes: bool,
    pub(crate) style: OutputStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RollbackFlowOutcome {
    NoSnapshots,
    Cancelled,
    Declined,
    Completed(RollbackReport),
}

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            write_completions_script(shell, &mut io::stdout().lock())
        }
        Some(Commands::List { json }) => {
            let config = load_privileged_config(&cli.config, cli.dry_run)?;
            run_list(
                &SystemBtrfs::new(),
                &config,
                cli.dry_run,
                json,
                current_output_style(),
            )
        }
        None => {
            let config = load_privileged_config(&cli.config, cli.dry_run)?;
            let options = RollbackOptions {
                dry_run: cli.dry_run,
                snapshot: cli.snapshot,
                assume_yes: cli.yes,
                style: current_output_style(),
            };
            run_rollback(
                &SystemBtrfs::new(),
                &config,
                &options,
                &mut TerminalInteraction,
            )
            .map(|_| ())
        }
    }
}

fn load_privileged_config(path: &Path, dry_run: bool) -> Result<RollbackConfig> {
    let config = RollbackConfig::load_or_default(path);
    debug!(?config, dry_run, "loaded configuration");
    ensure_root()?;
    Ok(config)
}

pub(crate) fn run_list(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    dry_run: bool,
    json: bool,
    style: OutputStyle,
) -> Result<()> {
    let mount = ensure_mounted(ops, config, dry_run)?;
    let snapshots = discover_snapshots(ops, config, &mount)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&snapshots).context("failed serializing snapshots")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{}", render_mount_outcome(style, &mount));
    if snapshots.is_empty() {
        println!("{}", render_status_line(style, "warn", "No snapshots found"));
        return Ok(());
    }
    for line in format_snapshot_table(style, &snapshots) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_rollback(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    options: &RollbackOptions,
    interaction: &mut dyn Interaction,
) -> Result<RollbackFlowOutcome> {
    let style = options.style;

    let mount = ensure_mounted(ops, config, options.dry_run)?;
    println!("{}", render_mount_outcome(style, &mount));

    let snapshots = discover_snapshots(ops, config, &mount)?;
    if snapshots.is_empty() {
        println!("{}", render_status_line(style, "warn", "No snapshots found"));
        return Ok(RollbackFlowOutcome::NoSnapshots);
    }

    let target_id = match options.snapshot.as_deref() {
        Some(requested) => resolve_requested_snapshot(config, &snapshots, requested)?,
        None => match interaction.select_snapshot(&snapshots)? {
            Some(id) => id,
            None => {
                println!("{}", render_status_line(style, "warn", "Rollback cancelled"));
                return Ok(RollbackFlowOutcome::Cancelled);
            }
        },
    };

    if !options.dry_run && !options.assume_yes {
        let prompt = format!("Are you sure you want to rollback to snapshot {target_id}?");
        if !interaction.confirm(&prompt)? {
            println!("{}", render_status_line(style, "warn", "Rollback aborted"));
            return Ok(RollbackFlowOutcome::Declined);
        }
    }

    let report = execute_rollback_with(ops, config, &target_id, options.dry_run, |planned| {
        println!("{}", render_step_line(style, planned, options.dry_run));
    })
    .map_err(|err| {
        if let Some(hint) = err.recovery_hint(&config.main_subvolume) {
            eprintln!("{}", render_status_line(style, "warn", &hint));
        }
        anyhow::Error::new(err)
    })?;

    println!("{}", render_rollback_summary(style, &report));
    Ok(RollbackFlowOutcome::Completed(report))
}

fn discover_snapshots(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    mount: &MountOutcome,
) -> Result<Vec<SnapshotDescriptor>> {
    let catalog = build_catalog(ops, config);
    match mount {
        MountOutcome::WouldMount(_) => catalog.with_context(|| {
            format!(
                "{} is not mounted in dry-run mode; mount it or run without --dry-run to list snapshots",
                config.mountpoint.display()
            )
        }),
        MountOutcome::AlreadyMounted | MountOutcome::Mounted(_) => Ok(catalog?),
    }
}

pub(crate) fn resolve_requested_snapshot(
    config: &RollbackConfig,
    snapshots: &[SnapshotDescriptor],
    requested: &str,
) -> Result<String> {
    let requested = requested.trim();
    snapshots
        .iter()
        .find(|snapshot| snapshot.id == requested)
        .map(|snapshot| snapshot.id.clone())
        .ok_or_else(|| {
            anyhow!(
                "snapshot '{}' not found in {}",
                requested,
                SubvolumeLayout::new(config).snapshots_dir().display()
            )
        })
}
