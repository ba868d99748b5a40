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
    AssignTaskRequest, CreateTaskRequest, Task, UpdateTaskStatusRequest,
};
use planhub_core::policy::Action;
use planhub_core::AppError;

/// Create a task under a project and workflow, optionally declaring
/// dependencies on existing tasks in the same project.
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Task created", body = Task),
        (status = 400, description = "Dependency set incomplete"),
        (status = 403, description = "Caller is not a project manager"),
        (status = 404, description = "Project or workflow not found")
    ),
    security(("bearer_token" = [])),
    tag = "tasks"
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    super::ensure_project_manager(
        &state,
        &user,
        Action::CreateTask,
        "Only project managers can create tasks",
    )
    .await?;

    let task = state
        .tasks
        .create_task(&request, user.0.organization_id)
        .await?;

    Ok(Json(ApiResponse::ok("Task created successfully", task)))
}

/// Replace a task's assignee set with the given employees.
#[utoipa::path(
    post,
    path = "/tasks/assign",
    request_body = AssignTaskRequest,
    responses(
        (status = 200, description = "Task assigned", body = Task),
        (status = 400, description = "Assignee set incomplete"),
        (status = 403, description = "Caller is not a project manager"),
        (status = 404, description = "Task not found in this organization")
    ),
    security(("bearer_token" = [])),
    tag = "tasks"
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn assign_task(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<AssignTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, HttpAppError> {
    super::ensure_project_manager(
        &state,
        &user,
        Action::AssignTask,
        "Only project managers can assign tasks",
    )
    .await?;

    let task = state
        .tasks
        .assign_task(&request, user.0.organization_id)
        .await?;

    Ok(Json(ApiResponse::ok("Task assigned successfully", task)))
}

/// Move a task to a new status. Any authenticated user may call this, but
/// the store only accepts the change from a current assignee, and entering
/// IN_PROGRESS requires every dependency to be COMPLETED.
#[utoipa::path(
    put,
    path = "/tasks/{task_id}/status",
    params(("task_id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Task),
        (status = 400, description = "Dependencies not completed"),
        (status = 403, description = "Caller is not an assignee"),
        (status = 404, description = "Task not found in this organization")
    ),
    security(("bearer_token" = [])),
    tag = "tasks"
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<ApiResponse<Task>>, HttpAppError> {
    let task = state
        .tasks
        .update_status(task_id, request.status, user.0.id, user.0.organization_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Task status updated successfully",
        task,
    )))
}
