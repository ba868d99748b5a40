use planhub_core::models::Organization;
use planhub_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new organization. This is the open bootstrap operation;
    /// everything else hangs off the tenant created here.
    #[tracing::instrument(skip(self), fields(db.table = "organizations", db.operation = "insert"))]
    pub async fn create_organization(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Organization, AppError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create organization: {}", e);
            AppError::Internal("Failed to create organization".to_string())
        })?;

        tracing::info!(
            "Created new organization: {} ({})",
            organization.name,
            organization.id
        );
        Ok(organization)
    }

    /// Get organization by ID
    pub async fn get_organization_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, description, created_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch organization by ID: {}", e);
            AppError::Internal("Failed to fetch organization".to_string())
        })?;

        Ok(organization)
    }
}
