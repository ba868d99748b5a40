use planhub_core::models::{
    AssignTaskRequest, CreateTaskRequest, Task, TaskDependency, UserSummary, WorkStatus,
};
use planhub_core::policy::dependency;
use planhub_core::validation::ensure_complete_set;
use planhub_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, name, description, status, project_id, workflow_id, created_at";

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a task under a project and workflow.
    ///
    /// Preconditions, checked in order and failing fast: the project belongs
    /// to the organization; the workflow belongs to that project; every
    /// declared dependency exists within that project (all-or-nothing).
    /// Status is always NOT_STARTED regardless of the request.
    #[tracing::instrument(skip(self, request), fields(db.table = "tasks", db.operation = "insert"))]
    pub async fn create_task(
        &self,
        request: &CreateTaskRequest,
        organization_id: Uuid,
    ) -> Result<Task, AppError> {
        let project_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM projects
                WHERE id = $1 AND organization_id = $2
            )
            "#,
        )
        .bind(request.project_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check project for task: {}", e);
            AppError::Internal("Failed to create task".to_string())
        })?;

        if !project_exists {
            return Err(AppError::NotFound(
                "Project not found or does not belong to this organization".to_string(),
            ));
        }

        let workflow_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM workflows
                WHERE id = $1 AND project_id = $2
            )
            "#,
        )
        .bind(request.workflow_id)
        .bind(request.project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check workflow for task: {}", e);
            AppError::Internal("Failed to create task".to_string())
        })?;

        if !workflow_exists {
            return Err(AppError::NotFound(
                "Workflow not found or does not belong to this project".to_string(),
            ));
        }

        let dependency_ids = request.dependencies.as_deref().unwrap_or_default();
        if !dependency_ids.is_empty() {
            let found = sqlx::query_scalar::<_, Uuid>(
                r#"
                SELECT id FROM tasks
                WHERE id = ANY($1) AND project_id = $2
                "#,
            )
            .bind(dependency_ids)
            .bind(request.project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check task dependencies: {}", e);
                AppError::Internal("Failed to create task".to_string())
            })?;

            ensure_complete_set(
                dependency_ids.len(),
                found.len(),
                "One or more dependencies do not exist or do not belong to this project",
            )?;
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {}", e);
            AppError::Database(e)
        })?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (name, description, status, project_id, workflow_id)
            VALUES ($1, $2, 'NOT_STARTED', $3, $4)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.project_id)
        .bind(request.workflow_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create task: {}", e);
            AppError::Internal("Failed to create task".to_string())
        })?;

        for dependency_id in dependency_ids {
            sqlx::query(
                r#"
                INSERT INTO task_dependencies (task_id, depends_on_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(task.id)
            .bind(dependency_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record task dependency: {}", e);
                AppError::Internal("Failed to create task".to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {}", e);
            AppError::Database(e)
        })?;

        tracing::info!(task_id = %task.id, project_id = %request.project_id, "Created task");
        self.with_includes(task).await
    }

    /// Replace the task's assignee set. Unlike project membership this is not
    /// additive: assigning [A] then [B] leaves only B. Every assignee must be
    /// a same-organization EMPLOYEE (all-or-nothing).
    #[tracing::instrument(skip(self, request), fields(db.table = "task_assignees", db.operation = "update"))]
    pub async fn assign_task(
        &self,
        request: &AssignTaskRequest,
        organization_id: Uuid,
    ) -> Result<Task, AppError> {
        let task = self
            .find_in_organization(request.task_id, organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Task not found or does not belong to this organization".to_string(),
                )
            })?;

        let found = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM users
            WHERE id = ANY($1) AND organization_id = $2 AND role = 'EMPLOYEE'
            "#,
        )
        .bind(&request.assignee_ids)
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check task assignees: {}", e);
            AppError::Internal("Failed to assign task".to_string())
        })?;

        ensure_complete_set(
            request.assignee_ids.len(),
            found.len(),
            "One or more assignees not found or not employees of this organization",
        )?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {}", e);
            AppError::Database(e)
        })?;

        sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
            .bind(request.task_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear task assignees: {}", e);
                AppError::Internal("Failed to assign task".to_string())
            })?;

        for assignee_id in &request.assignee_ids {
            sqlx::query(
                r#"
                INSERT INTO task_assignees (task_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(request.task_id)
            .bind(assignee_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record task assignee: {}", e);
                AppError::Internal("Failed to assign task".to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {}", e);
            AppError::Database(e)
        })?;

        tracing::info!(task_id = %request.task_id, assignees = request.assignee_ids.len(), "Assigned task");
        self.with_includes(task).await
    }

    /// Move a task to a new status.
    ///
    /// Only a current assignee may do this; entering IN_PROGRESS additionally
    /// requires every declared dependency to be COMPLETED.
    #[tracing::instrument(skip(self), fields(db.table = "tasks", db.operation = "update"))]
    pub async fn update_status(
        &self,
        task_id: Uuid,
        status: WorkStatus,
        acting_user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Task, AppError> {
        self.find_in_organization(task_id, organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Task not found or does not belong to this organization".to_string(),
                )
            })?;

        let assignee_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM task_assignees WHERE task_id = $1",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load task assignees: {}", e);
            AppError::Internal("Failed to update task status".to_string())
        })?;

        if !assignee_ids.contains(&acting_user_id) {
            return Err(AppError::Forbidden(
                "Only an assignee can update the task status".to_string(),
            ));
        }

        let dependency_statuses = sqlx::query_scalar::<_, WorkStatus>(
            r#"
            SELECT t.status
            FROM task_dependencies d
            JOIN tasks t ON t.id = d.depends_on_id
            WHERE d.task_id = $1
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load dependency statuses: {}", e);
            AppError::Internal("Failed to update task status".to_string())
        })?;

        if !dependency::may_enter(status, &dependency_statuses) {
            return Err(AppError::Validation(
                "Cannot start task: some dependencies are not completed".to_string(),
            ));
        }

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update task status: {}", e);
            AppError::Internal("Failed to update task status".to_string())
        })?;

        tracing::info!(task_id = %task_id, status = %status, "Updated task status");
        self.with_includes(task).await
    }

    /// Fetch a task scoped to an organization through its project.
    /// Cross-tenant ids read as absent.
    pub async fn find_in_organization(
        &self,
        task_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.name, t.description, t.status, t.project_id, t.workflow_id, t.created_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1 AND p.organization_id = $2
            "#,
        )
        .bind(task_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch task: {}", e);
            AppError::Internal("Failed to fetch task".to_string())
        })?;

        Ok(task)
    }

    /// Load the assignee and dependency sets for a task row.
    async fn with_includes(&self, mut task: Task) -> Result<Task, AppError> {
        task.assignees = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.email, u.name, u.role
            FROM users u
            JOIN task_assignees ta ON ta.user_id = u.id
            WHERE ta.task_id = $1
            ORDER BY u.created_at
            "#,
        )
        .bind(task.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load task assignees: {}", e);
            AppError::Internal("Failed to load task assignees".to_string())
        })?;

        task.dependencies = sqlx::query_as::<_, TaskDependency>(
            r#"
            SELECT t.id, t.name, t.description, t.status, t.project_id, t.workflow_id
            FROM task_dependencies d
            JOIN tasks t ON t.id = d.depends_on_id
            WHERE d.task_id = $1
            "#,
        )
        .bind(task.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load task dependencies: {}", e);
            AppError::Internal("Failed to load task dependencies".to_string())
        })?;

        Ok(task)
    }
}
