use std::path::PathBuf;

use anyhow::Result;
use btrfs_rollback_core::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

mod completion;
mod dispatch;
mod logging;
mod privilege;
mod prompt;
mod render;

#[derive(Parser, Debug)]
#[command(name = "btrfs-rollback")]
#[command(about = "Replace the btrfs root subvolume with a snapshot", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        global = true,
        env = "BTRFS_ROLLBACK_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Path to config file"
    )]
    config: PathBuf,
    #[arg(long, global = true, help = "Simulate the operations without making changes")]
    dry_run: bool,
    #[arg(long, value_name = "ID", help = "Roll back to this snapshot without prompting")]
    snapshot: Option<String>,
    #[arg(short, long, help = "Skip the confirmation prompt")]
    yes: bool,
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List snapshots, newest first")]
    List {
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Print a shell completion script")]
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;
    dispatch::run_cli(cli)
}
