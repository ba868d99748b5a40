use planhub_core::models::{CreateWorkflowRequest, Workflow};
use planhub_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct WorkflowRepository {
    pool: PgPool,
}

impl WorkflowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a workflow under a project. The project must belong to the
    /// acting user's organization; the workflow inherits that scope.
    #[tracing::instrument(skip(self, request), fields(db.table = "workflows", db.operation = "insert"))]
    pub async fn add_workflow(
        &self,
        project_id: Uuid,
        organization_id: Uuid,
        request: &CreateWorkflowRequest,
    ) -> Result<Workflow, AppError> {
        let project_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM projects
                WHERE id = $1 AND organization_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check project for workflow: {}", e);
            AppError::Internal("Failed to add workflow".to_string())
        })?;

        if !project_exists {
            return Err(AppError::NotFound(
                "Project not found or does not belong to this organization".to_string(),
            ));
        }

        let workflow = sqlx::query_as::<_, Workflow>(
            r#"
            INSERT INTO workflows (name, description, organization_id, project_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, organization_id, project_id, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(organization_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add workflow: {}", e);
            AppError::Internal("Failed to add workflow".to_string())
        })?;

        tracing::info!(workflow_id = %workflow.id, project_id = %project_id, "Added workflow");
        Ok(workflow)
    }
}
