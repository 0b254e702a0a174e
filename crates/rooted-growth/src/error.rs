//! Growth and scoring error types.

use crate::root_tree::RootId;

/// Errors raised by the root tree and the stat system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrowthError {
    /// The id does not belong to this tree.
    #[error("unknown root {0:?}")]
    UnknownRoot(RootId),

    /// The branch has no points to operate on.
    #[error("root {0:?} has no points")]
    EmptyBranch(RootId),

    /// The operation needs a day in progress.
    #[error("no day in progress")]
    DayNotStarted,

    /// The modifier value is not finite, or divides by zero.
    #[error("invalid stat modifier: {0}")]
    InvalidModifier(String),
}
