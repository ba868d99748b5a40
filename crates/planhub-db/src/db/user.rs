use planhub_core::models::{Role, User};
use planhub_core::AppError;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, role, organization_id, created_at";

/// Internal row for credential lookup; the password hash never leaves this module.
#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    email: String,
    name: String,
    role: Role,
    organization_id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    password_hash: String,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user in an organization. New users always start as EMPLOYEE;
    /// roles are only mutated through the explicit admin/dev paths.
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        organization_id: Uuid,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, organization_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                AppError::Validation("A user with this email already exists".to_string())
            } else {
                tracing::error!("Failed to create user: {}", e);
                AppError::Internal("Failed to create user".to_string())
            }
        })?;

        tracing::info!(user_id = %user.id, organization_id = %organization_id, "Registered new user");
        Ok(user)
    }

    /// Look up a user and their password hash by email, for login.
    pub async fn find_credentials(&self, email: &str) -> Result<Option<(User, String)>, AppError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, email, name, role, organization_id, created_at, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch credentials: {}", e);
            AppError::Internal("Failed to fetch user".to_string())
        })?;

        Ok(row.map(|r| {
            (
                User {
                    id: r.id,
                    email: r.email,
                    name: r.name,
                    role: r.role,
                    organization_id: r.organization_id,
                    created_at: r.created_at,
                },
                r.password_hash,
            )
        }))
    }

    /// List all users (dev utility; deliberately unscoped)
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {}", e);
            AppError::Internal("Failed to list users".to_string())
        })?;

        Ok(users)
    }

    /// Unconditional role overwrite. The organization-scoped promotion path
    /// performs its role and tenant checks before delegating here.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update"))]
    pub async fn assign_role(&self, user_id: Uuid, role: Role) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::RowNotFound = e {
                AppError::NotFound("User not found".to_string())
            } else {
                tracing::error!("Failed to assign role: {}", e);
                AppError::Internal("Failed to assign role".to_string())
            }
        })?;

        tracing::info!(user_id = %user_id, role = %role, "Assigned role to user");
        Ok(user)
    }

    /// Fetch a user by id, unscoped. Callers that act on the result must apply
    /// their own tenant check.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::Internal("Failed to fetch user".to_string())
        })?;

        Ok(user)
    }

    /// Fetch a user scoped to an organization. Cross-tenant ids read as absent.
    pub async fn find_in_organization(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 AND organization_id = $2
            "#
        ))
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::Internal("Failed to fetch user".to_string())
        })?;

        Ok(user)
    }

    /// The single predicate behind every "only a PM can..." check: does this
    /// user, in this organization, currently hold the PROJECTMANAGER role?
    /// Reads fresh state rather than trusting the role captured at login.
    pub async fn validate_project_manager(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, AppError> {
        let is_pm = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE id = $1 AND organization_id = $2 AND role = 'PROJECTMANAGER'
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check project manager role: {}", e);
            AppError::Internal("Failed to check role".to_string())
        })?;

        Ok(is_pm)
    }
}
