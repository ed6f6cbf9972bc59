use std::fmt;
use std::path::{Component, Path};

use btrfs_rollback_core::{RollbackConfig, SubvolumeLayout};
use tracing::{debug, info};

use crate::{BtrfsOps, PlannedAction, RollbackError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackStep {
    DeleteOld,
    MoveCurrent,
    CreateSnapshot,
    SetDefault,
}

impl RollbackStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeleteOld => "delete-old",
            Self::MoveCurrent => "move-current",
            Self::CreateSnapshot => "create-snapshot",
            Self::SetDefault => "set-default",
        }
    }
}

impl fmt::Display for RollbackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: RollbackStep,
    pub action: PlannedAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RollbackPlan {
    pub(crate) target_id: String,
    pub(crate) steps: Vec<PlannedStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    pub target_id: String,
    pub simulated: bool,
    pub steps: Vec<PlannedStep>,
}

pub(crate) fn plan_rollback(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    target_id: &str,
) -> RollbackPlan {
    let layout = SubvolumeLayout::new(config);
    let main = layout.main_subvolume();
    let backup = layout.backup_subvolume();

    let mut steps = Vec::with_capacity(4);
    if ops.path_exists(&backup) {
        steps.push(PlannedStep {
            step: RollbackStep::DeleteOld,
            action: PlannedAction::DeleteSubvolume {
                path: backup.clone(),
            },
        });
    } else {
        debug!(path = %backup.display(), "no stale backup subvolume");
    }
    steps.push(PlannedStep {
        step: RollbackStep::MoveCurrent,
        action: PlannedAction::Move {
            from: main.clone(),
            to: backup,
        },
    });
    steps.push(PlannedStep {
        step: RollbackStep::CreateSnapshot,
        action: PlannedAction::Snapshot {
            source: layout.snapshot_subvolume(target_id),
            destination: main.clone(),
        },
    });
    steps.push(PlannedStep {
        step: RollbackStep::SetDefault,
        action: PlannedAction::SetDefault { path: main },
    });

    RollbackPlan {
        target_id: target_id.to_string(),
        steps,
    }
}

pub fn execute_rollback(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    target_id: &str,
    simulate: bool,
) -> Result<RollbackReport, RollbackError> {
    execute_rollback_with(ops, config, target_id, simulate, |_| {})
}

pub fn execute_rollback_with<OnStep>(
    ops: &dyn BtrfsOps,
    config: &RollbackConfig,
    target_id: &str,
    simulate: bool,
    mut on_step: OnStep,
) -> Result<RollbackReport, RollbackError>
where
    OnStep: FnMut(&PlannedStep),
{
    if !simulate {
        validate_target_id(target_id)?;
    }
    let plan = plan_rollback(ops, config, target_id);

    for planned in &plan.steps {
        on_step(planned);
        if simulate {
            continue;
        }

        info!(step = %planned.step, command = %planned.action, "executing rollback step");
        planned
            .action
            .apply(ops)
            .map_err(|source| RollbackError::Step {
                step: planned.step,
                action: planned.action.to_string(),
                source,
            })?;
    }

    Ok(RollbackReport {
        target_id: plan.target_id,
        simulated: simulate,
        steps: plan.steps,
    })
}

fn validate_target_id(target_id: &str) -> Result<(), RollbackError> {
    let invalid = |reason| RollbackError::InvalidTarget {
        id: target_id.to_string(),
        reason,
    };
    if target_id.is_empty() {
        return Err(invalid("snapshot id must not be empty"));
    }

    let mut components = Path::new(target_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("snapshot id must be a single path component")),
    }
}
