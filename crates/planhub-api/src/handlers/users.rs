use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::auth::models::CurrentUser;
use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use planhub_core::models::{AssignRoleRequest, AuthUser, PromoteRequest, Role, User};
use planhub_core::policy::{self, scope, Action};
use planhub_core::AppError;

/// Return the authenticated user's own identity.
#[utoipa::path(
    get,
    path = "/users/info",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_token" = [])),
    tag = "users"
)]
pub async fn get_user_info(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<AuthUser>>, HttpAppError> {
    Ok(Json(ApiResponse::ok("User info", user)))
}

/// List every user across all organizations. Development utility; not part
/// of the tenant-scoped surface.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [User])),
    tag = "dev"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<User>>>, HttpAppError> {
    let users = state.users.list_users().await?;
    Ok(Json(ApiResponse::ok("Users fetched successfully", users)))
}

/// Overwrite any user's role. Development utility with no authorization
/// check; the production path is the admin promotion endpoint.
#[utoipa::path(
    post,
    path = "/users/assign-role",
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role assigned", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "dev"
)]
#[tracing::instrument(skip(state))]
pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<Json<ApiResponse<User>>, HttpAppError> {
    let user = state.users.assign_role(request.user_id, request.role).await?;
    Ok(Json(ApiResponse::ok("Role assigned successfully", user)))
}

/// Promote a user in the admin's own organization to PROJECTMANAGER.
/// Only an ORGADMIN may do this, and the target must belong to the same
/// organization; a cross-tenant target reads as not found.
#[utoipa::path(
    post,
    path = "/admin/assign-project-manager",
    request_body = PromoteRequest,
    responses(
        (status = 200, description = "User promoted", body = User),
        (status = 403, description = "Caller is not an organization admin"),
        (status = 404, description = "Target user not found in this organization")
    ),
    security(("bearer_token" = [])),
    tag = "admin"
)]
#[tracing::instrument(skip(state, user), fields(admin_id = %user.0.id))]
pub async fn promote_to_project_manager(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<PromoteRequest>,
) -> Result<Json<ApiResponse<User>>, HttpAppError> {
    if !policy::role_permits(user.0.role, Action::PromoteToProjectManager) {
        return Err(AppError::Forbidden(
            "Only organization admins can promote users".to_string(),
        )
        .into());
    }

    let target = state
        .users
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    scope::ensure_same_tenant(user.0.organization_id, target.organization_id, "User")?;

    let promoted = state
        .users
        .assign_role(target.id, Role::ProjectManager)
        .await?;

    Ok(Json(ApiResponse::ok(
        "User promoted to project manager",
        promoted,
    )))
}
