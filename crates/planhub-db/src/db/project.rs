use planhub_core::models::{CreateProjectRequest, Project, UpdateProjectRequest, UserSummary};
use planhub_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a project in an organization, optionally attaching initial
    /// members. Status is always NOT_STARTED regardless of the request.
    #[tracing::instrument(skip(self, request), fields(db.table = "projects", db.operation = "insert"))]
    pub async fn create_project(
        &self,
        request: &CreateProjectRequest,
        organization_id: Uuid,
        initial_user_ids: &[Uuid],
    ) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {}", e);
            AppError::Database(e)
        })?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, start_date, end_date, status, organization_id)
            VALUES ($1, $2, $3, $4, 'NOT_STARTED', $5)
            RETURNING id, name, description, start_date, end_date, status, organization_id, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(organization_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create project: {}", e);
            AppError::Internal("Failed to create project".to_string())
        })?;

        for user_id in initial_user_ids {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(project.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to attach initial project member: {}", e);
                AppError::Internal("Failed to create project".to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {}", e);
            AppError::Database(e)
        })?;

        tracing::info!(project_id = %project.id, organization_id = %organization_id, "Created project");
        self.with_members(project).await
    }

    /// Fetch a project scoped to an organization. Cross-tenant ids read as absent.
    pub async fn find_in_organization(
        &self,
        project_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, start_date, end_date, status, organization_id, created_at
            FROM projects
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(project_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch project: {}", e);
            AppError::Internal("Failed to fetch project".to_string())
        })?;

        Ok(project)
    }

    /// Add a user to a project's membership set (additive, not a replace).
    /// The target must exist, belong to the organization and hold the
    /// EMPLOYEE role.
    #[tracing::instrument(skip(self), fields(db.table = "project_members", db.operation = "insert"))]
    pub async fn assign_user(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Project, AppError> {
        let employee_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE id = $1 AND organization_id = $2 AND role = 'EMPLOYEE'
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check assignment target: {}", e);
            AppError::Internal("Failed to assign user to project".to_string())
        })?;

        if !employee_exists {
            return Err(AppError::Validation(
                "User not found or not an employee of this organization".to_string(),
            ));
        }

        let project = self
            .find_in_organization(project_id, organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Project not found or does not belong to this organization".to_string(),
                )
            })?;

        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign user to project: {}", e);
            AppError::Internal("Failed to assign user to project".to_string())
        })?;

        tracing::info!(project_id = %project_id, user_id = %user_id, "Assigned user to project");
        self.with_members(project).await
    }

    /// Partial update: only the fields present in the request are written.
    #[tracing::instrument(skip(self, request), fields(db.table = "projects", db.operation = "update"))]
    pub async fn update_project(
        &self,
        project_id: Uuid,
        organization_id: Uuid,
        request: &UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        // Scoped existence check first so a cross-tenant id reads as not found
        self.find_in_organization(project_id, organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Project not found or does not belong to this organization".to_string(),
                )
            })?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                status = COALESCE($6, status)
            WHERE id = $1
            RETURNING id, name, description, start_date, end_date, status, organization_id, created_at
            "#,
        )
        .bind(project_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update project: {}", e);
            AppError::Internal("Failed to update project".to_string())
        })?;

        tracing::info!(project_id = %project_id, "Updated project");
        self.with_members(project).await
    }

    /// Load the membership set for a project row.
    async fn with_members(&self, mut project: Project) -> Result<Project, AppError> {
        let members = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.email, u.name, u.role
            FROM users u
            JOIN project_members pm ON pm.user_id = u.id
            WHERE pm.project_id = $1
            ORDER BY u.created_at
            "#,
        )
        .bind(project.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load project members: {}", e);
            AppError::Internal("Failed to load project members".to_string())
        })?;

        project.users = members;
        Ok(project)
    }
}
