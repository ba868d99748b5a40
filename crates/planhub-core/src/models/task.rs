use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::project::WorkStatus;
use super::user::UserSummary;

/// Task entity.
///
/// `assignees` and `dependencies` are loaded by separate queries. Dependencies
/// are directed task-to-task edges restricted to the same project; there is no
/// cycle detection (a cycle would make IN_PROGRESS permanently unreachable for
/// every task in it).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: WorkStatus,
    pub project_id: Uuid,
    pub workflow_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub assignees: Vec<UserSummary>,
    #[sqlx(skip)]
    pub dependencies: Vec<TaskDependency>,
}

/// The task shape embedded in dependency lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TaskDependency {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: WorkStatus,
    pub project_id: Uuid,
    pub workflow_id: Uuid,
}

/// Request to create a task.
///
/// Status is always forced to NOT_STARTED; declared dependencies must all
/// exist within the same project.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    pub project_id: Uuid,
    pub workflow_id: Uuid,
    pub dependencies: Option<Vec<Uuid>>,
}

/// Request to set a task's assignees. Replaces the whole set, unlike project
/// membership which is additive.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignTaskRequest {
    pub task_id: Uuid,
    pub assignee_ids: Vec<Uuid>,
}

/// Request to move a task to a new status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    pub status: WorkStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_dependencies_optional() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{
                "name": "Design schema",
                "description": "ERD for the new module",
                "project_id": "6f2f3a1e-27b9-4a6e-b3a8-19c5f22d1a01",
                "workflow_id": "8f0b0a8e-5b54-4a2e-9f3e-c1d9e1b2a345"
            }"#,
        )
        .unwrap();
        assert!(req.dependencies.is_none());
    }

    #[test]
    fn test_status_update_request_parses_enum() {
        let req: UpdateTaskStatusRequest =
            serde_json::from_str(r#"{"status": "IN_PROGRESS"}"#).unwrap();
        assert_eq!(req.status, WorkStatus::InProgress);

        let bad = serde_json::from_str::<UpdateTaskStatusRequest>(r#"{"status": "STARTED"}"#);
        assert!(bad.is_err());
    }
}
