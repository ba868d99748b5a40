use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::CurrentUser;
use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use planhub_core::models::{
    AssignUserRequest, CreateProjectRequest, CreateWorkflowRequest, Project, UpdateProjectRequest,
    Workflow,
};
use planhub_core::policy::Action;
use planhub_core::AppError;

/// Create a project in the acting user's organization. Project-manager only;
/// the creator is attached as an initial member and status is forced to
/// NOT_STARTED whatever the request says.
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = Project),
        (status = 403, description = "Caller is not a project manager")
    ),
    security(("bearer_token" = [])),
    tag = "projects"
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    super::ensure_project_manager(
        &state,
        &user,
        Action::CreateProject,
        "Only project managers can create projects",
    )
    .await?;

    let project = state
        .projects
        .create_project(&request, user.0.organization_id, &[user.0.id])
        .await?;

    Ok(Json(ApiResponse::ok("Project created successfully", project)))
}

/// Add an employee to a project's membership set. Additive: existing
/// members are kept.
#[utoipa::path(
    post,
    path = "/projects/assign-user",
    request_body = AssignUserRequest,
    responses(
        (status = 200, description = "User assigned", body = Project),
        (status = 400, description = "Target is not an employee of this organization"),
        (status = 403, description = "Caller is not a project manager"),
        (status = 404, description = "Project not found in this organization")
    ),
    security(("bearer_token" = [])),
    tag = "projects"
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn assign_user_to_project(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<AssignUserRequest>,
) -> Result<Json<ApiResponse<Project>>, HttpAppError> {
    super::ensure_project_manager(
        &state,
        &user,
        Action::AssignUserToProject,
        "Only project managers can assign users to projects",
    )
    .await?;

    let project = state
        .projects
        .assign_user(request.project_id, request.user_id, user.0.organization_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        "User assigned to project successfully",
        project,
    )))
}

/// Partially update a project. Absent fields are left untouched.
#[utoipa::path(
    put,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 403, description = "Caller is not a project manager"),
        (status = 404, description = "Project not found in this organization")
    ),
    security(("bearer_token" = [])),
    tag = "projects"
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    super::ensure_project_manager(
        &state,
        &user,
        Action::UpdateProject,
        "Only project managers can update projects",
    )
    .await?;

    let project = state
        .projects
        .update_project(id, user.0.organization_id, &request)
        .await?;

    Ok(Json(ApiResponse::ok("Project updated successfully", project)))
}

/// Create a workflow under a project in the acting user's organization.
#[utoipa::path(
    post,
    path = "/projects/{project_id}/workflows",
    params(("project_id" = Uuid, Path, description = "Project id")),
    request_body = CreateWorkflowRequest,
    responses(
        (status = 200, description = "Workflow added", body = Workflow),
        (status = 403, description = "Caller is not a project manager"),
        (status = 404, description = "Project not found in this organization")
    ),
    security(("bearer_token" = [])),
    tag = "workflows"
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn add_workflow(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<CreateWorkflowRequest>,
) -> Result<Json<ApiResponse<Workflow>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    super::ensure_project_manager(
        &state,
        &user,
        Action::AddWorkflow,
        "Only project managers can add workflows",
    )
    .await?;

    let workflow = state
        .workflows
        .add_workflow(project_id, user.0.organization_id, &request)
        .await?;

    Ok(Json(ApiResponse::ok("Workflow added successfully", workflow)))
}
