mod catalog;
mod error;
mod mount;
mod ops;
mod rollback;
mod system;

pub use catalog::build_catalog;
pub use error::{DiscoveryError, MountError, OpsError, RollbackError};
pub use mount::{ensure_mounted, MountOutcome};
pub use ops::{BtrfsOps, PlannedAction};
pub use rollback::{
    execute_rollback, execute_rollback_with, PlannedStep, RollbackReport, RollbackStep,
};
pub use system::SystemBtrfs;
