use chrono::{Duration, Utc};
use planhub_core::models::AuthUser;
use planhub_core::AppError;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Session store backing the opaque bearer tokens issued at login/register.
///
/// Only a SHA-256 digest of the token is persisted; the raw token exists
/// nowhere but in the client's hands.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn digest(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Persist a new session for a freshly issued token.
    #[tracing::instrument(skip(self, token), fields(db.table = "sessions", db.operation = "insert"))]
    pub async fn create_session(
        &self,
        user_id: Uuid,
        token: &str,
        ttl_hours: i64,
    ) -> Result<(), AppError> {
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(Self::digest(token))
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create session: {}", e);
            AppError::Internal("Failed to create session".to_string())
        })?;

        Ok(())
    }

    /// Resolve a bearer token to its user.
    ///
    /// Unknown, malformed and expired tokens all collapse to `Ok(None)` -
    /// the caller treats "absent" as unauthenticated. Store failures stay
    /// distinguishable as `Err`.
    pub async fn verify(&self, token: &str) -> Result<Option<AuthUser>, AppError> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.email, u.name, u.role, u.organization_id
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(Self::digest(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to verify session token: {}", e);
            AppError::Internal("Failed to verify session".to_string())
        })?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex_sha256() {
        let d = SessionRepository::digest("token-a");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(d, SessionRepository::digest("token-a"));
        assert_ne!(d, SessionRepository::digest("token-b"));
    }
}
