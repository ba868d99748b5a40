//! Task dependency gate.
//!
//! The only constrained transition is *into* IN_PROGRESS: a task may not
//! start while any declared dependency is incomplete. Every other transition
//! (including COMPLETED back to NOT_STARTED) is open; this is a narrow gate,
//! not a workflow state machine.
//!
//! Dependency graphs are not checked for cycles. A cycle leaves every task in
//! it permanently unable to enter IN_PROGRESS.

use crate::models::WorkStatus;

/// Whether a task may enter `target` given the current statuses of its
/// declared dependencies.
pub fn may_enter(target: WorkStatus, dependency_statuses: &[WorkStatus]) -> bool {
    if target != WorkStatus::InProgress {
        return true;
    }
    dependency_statuses
        .iter()
        .all(|status| *status == WorkStatus::Completed)
}
