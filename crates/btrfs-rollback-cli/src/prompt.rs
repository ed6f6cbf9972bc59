use std::fmt;

use anyhow::{anyhow, Result};
use btrfs_rollback_core::SnapshotDescriptor;
use inquire::ui::{RenderConfig, Styled};
use inquire::{Confirm, InquireError, Select};

use crate::render::{format_snapshot_rows, SNAPSHOT_LIST_TITLE};

pub(crate) trait Interaction {
    fn select_snapshot(&mut self, snapshots: &[SnapshotDescriptor]) -> Result<Option<String>>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

pub(crate) struct TerminalInteraction;

#[derive(Debug, Clone)]
struct SnapshotChoice {
    id: String,
    label: String,
}

impl fmt::Display for SnapshotChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl TerminalInteraction {
    fn render_config() -> RenderConfig<'static> {
        RenderConfig::default().with_highlighted_option_prefix(Styled::new(">"))
    }
}

impl Interaction for TerminalInteraction {
    fn select_snapshot(&mut self, snapshots: &[SnapshotDescriptor]) -> Result<Option<String>> {
        let choices: Vec<SnapshotChoice> = snapshots
            .iter()
            .zip(format_snapshot_rows(snapshots))
            .map(|(snapshot, label)| SnapshotChoice {
                id: snapshot.id.clone(),
                label,
            })
            .collect();

        let selected = Select::new(SNAPSHOT_LIST_TITLE, choices)
            .with_render_config(Self::render_config())
            .with_help_message("Use arrow keys to navigate, Enter to select, Esc to cancel")
            .with_page_size(15)
            .prompt();
        match selected {
            Ok(choice) => Ok(Some(choice.id)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(err) => Err(anyhow!("snapshot selection failed: {err}")),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = Confirm::new(prompt)
            .with_default(false)
            .with_render_config(Self::render_config())
            .prompt();
        match answer {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(err) => Err(anyhow!("confirmation failed: {err}")),
        }
    }
}
