use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

/// Lifecycle status shared by projects and tasks.
///
/// Stored as the Postgres enum `work_status` with SCREAMING_SNAKE spellings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "work_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    NotStarted,
    InProgress,
    Pending,
    Completed,
    Overdue,
}

impl Display for WorkStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            WorkStatus::NotStarted => write!(f, "NOT_STARTED"),
            WorkStatus::InProgress => write!(f, "IN_PROGRESS"),
            WorkStatus::Pending => write!(f, "PENDING"),
            WorkStatus::Completed => write!(f, "COMPLETED"),
            WorkStatus::Overdue => write!(f, "OVERDUE"),
        }
    }
}

/// Project entity, scoped to exactly one organization.
///
/// `users` is the project membership set (staffing), distinct from per-task
/// assignment. It is loaded by a separate query, not by the row mapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: WorkStatus,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub users: Vec<UserSummary>,
}

/// Request to create a project.
///
/// Any `status` supplied by the client is ignored; new projects always start
/// as NOT_STARTED.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: Option<WorkStatus>,
}

/// Partial project update; only the provided fields are written
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<WorkStatus>,
}

/// Request to add a user to a project's membership set
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignUserRequest {
    pub project_id: Uuid,
    pub user_id: Uuid,
}
