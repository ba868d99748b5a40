//! Authorization rules.
//!
//! Three small, pure decision modules sit behind every mutation:
//! the role policy (this module), the tenant scope guard ([`scope`]) and the
//! task dependency gate ([`dependency`]). Keeping them here means every
//! service enforces the same rules instead of re-deriving them per entity.

pub mod dependency;
pub mod scope;

use crate::models::Role;

/// Actions guarded by the fixed role table.
///
/// Task status updates are deliberately absent: they are gated on being a
/// current assignee, not on a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProject,
    UpdateProject,
    AssignUserToProject,
    AddWorkflow,
    CreateTask,
    AssignTask,
    PromoteToProjectManager,
}

/// Fixed lookup table: which role may perform which action.
pub fn role_permits(role: Role, action: Action) -> bool {
    match action {
        Action::CreateProject
        | Action::UpdateProject
        | Action::AssignUserToProject
        | Action::AddWorkflow
        | Action::CreateTask
        | Action::AssignTask => role == Role::ProjectManager,
        Action::PromoteToProjectManager => role == Role::OrgAdmin,
    }
}
