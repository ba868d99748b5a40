pub mod auth;
pub mod organizations;
pub mod projects;
pub mod tasks;
pub mod users;

use crate::auth::models::CurrentUser;
use crate::state::AppState;
use planhub_core::policy::{self, Action};
use planhub_core::AppError;

/// Double gate for project-manager-only operations: the session role must
/// permit the action, and the PROJECTMANAGER role must still hold in the
/// database (a promotion or demotion since login wins over the session).
/// Both failures surface as the same Forbidden message.
pub(crate) async fn ensure_project_manager(
    state: &AppState,
    user: &CurrentUser,
    action: Action,
    denial: &str,
) -> Result<(), AppError> {
    if !policy::role_permits(user.0.role, action) {
        return Err(AppError::Forbidden(denial.to_string()));
    }

    let is_pm = state
        .users
        .validate_project_manager(user.0.id, user.0.organization_id)
        .await?;
    if !is_pm {
        return Err(AppError::Forbidden(denial.to_string()));
    }

    Ok(())
}
