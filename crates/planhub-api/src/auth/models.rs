//! Authenticated-actor extraction.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use planhub_core::models::AuthUser;
use planhub_core::AppError;
use std::sync::Arc;

/// The actor behind a request, resolved from the bearer token.
///
/// Extraction verifies the session against the store: a missing header, a
/// malformed header, or a token the store does not recognize all reject with
/// 401. Store errors stay 500 - "unauthenticated" and "system failure" are
/// deliberately distinct outcomes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing authorization header".to_string(),
                ))
            })?;

        let token = bearer_token(header_value).ok_or_else(|| {
            HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
        })?;

        // Verification failure is silent (None), never an exception
        let user = state
            .sessions
            .verify(token)
            .await
            .map_err(HttpAppError)?
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Unauthorized".to_string())))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parses_well_formed_header() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("bearer abc123"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc123"), None);
    }
}
