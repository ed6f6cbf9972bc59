use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use btrfs_rollback_core::SnapshotDescriptor;
use btrfs_rollback_engine::{MountOutcome, PlannedStep, RollbackReport, RollbackStep};

pub(crate) const SNAPSHOT_LIST_TITLE: &str = "BTRFS Snapshots";

const DESCRIPTION_MAX_WIDTH: usize = 48;
const ELLIPSIS: &str = "...";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("[{}] {message}", status.to_ascii_uppercase()),
    }
}

pub(crate) fn render_section_header(style: OutputStyle, title: &str) -> String {
    match style {
        OutputStyle::Plain => title.to_string(),
        OutputStyle::Rich => colorize(section_style(), &format!("== {title} ==")),
    }
}

pub(crate) fn render_mount_outcome(style: OutputStyle, outcome: &MountOutcome) -> String {
    match outcome {
        MountOutcome::AlreadyMounted => {
            render_status_line(style, "ok", "Mountpoint is already mounted.")
        }
        MountOutcome::Mounted(action) => {
            render_status_line(style, "ok", &format!("Mounted: {}", action.summary()))
        }
        MountOutcome::WouldMount(action) => format!("[dry-run] Would execute: {action}"),
    }
}

pub(crate) fn render_step_line(style: OutputStyle, planned: &PlannedStep, simulate: bool) -> String {
    if simulate {
        return format!("[dry-run] Would {}", planned.action.summary());
    }

    let verb = match planned.step {
        RollbackStep::DeleteOld => "Removing",
        RollbackStep::MoveCurrent => "Moving",
        RollbackStep::CreateSnapshot => "Creating",
        RollbackStep::SetDefault => "Activating",
    };
    render_status_line(style, "step", &format!("{verb}: {}", planned.action))
}

pub(crate) fn render_rollback_summary(style: OutputStyle, report: &RollbackReport) -> String {
    if report.simulated {
        return format!(
            "[dry-run] Rollback to snapshot {} simulated ({} steps)",
            report.target_id,
            report.steps.len()
        );
    }
    render_status_line(
        style,
        "ok",
        &format!("Rollback completed using snapshot {}", report.target_id),
    )
}

pub(crate) fn format_snapshot_rows(snapshots: &[SnapshotDescriptor]) -> Vec<String> {
    let descriptions: Vec<String> = snapshots
        .iter()
        .map(|snapshot| truncate(snapshot.description_or_placeholder(), DESCRIPTION_MAX_WIDTH))
        .collect();

    let id_width = column_width(snapshots.iter().map(|snapshot| snapshot.id.as_str()));
    let description_width = column_width(descriptions.iter().map(String::as_str));
    let method_width = column_width(snapshots.iter().map(|snapshot| snapshot.method.as_str()));

    snapshots
        .iter()
        .zip(&descriptions)
        .map(|(snapshot, description)| {
            let row = format!(
                "{:<id_width$}  {:<description_width$}  {:<method_width$}  {}",
                snapshot.id, description, snapshot.method, snapshot.date
            );
            row.trim_end().to_string()
        })
        .collect()
}

pub(crate) fn format_snapshot_table(style: OutputStyle, snapshots: &[SnapshotDescriptor]) -> Vec<String> {
    let mut lines = vec![render_section_header(style, SNAPSHOT_LIST_TITLE)];
    lines.extend(format_snapshot_rows(snapshots));
    lines
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|value| value.chars().count()).max().unwrap_or(0)
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = value.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightMagenta.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
