use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{password, token};
use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use planhub_core::models::User;
use planhub_core::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub organization_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Token plus user, returned by both register and login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Register a new user in an existing organization.
/// New users always start with the EMPLOYEE role.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered, session issued", body = AuthPayload),
        (status = 400, description = "Invalid request or email already taken"),
        (status = 404, description = "Organization not found")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    // The organization must exist before we hang a user off it
    state
        .organizations
        .get_organization_by_id(request.organization_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    let password_hash = password::hash_password(&request.password)?;
    let user = state
        .users
        .create_user(&request.email, &request.name, &password_hash, request.organization_id)
        .await?;

    let session_token = token::generate_token();
    state
        .sessions
        .create_session(user.id, &session_token, state.session_ttl_hours)
        .await?;

    Ok(Json(ApiResponse::ok(
        "User registered successfully",
        AuthPayload {
            token: session_token,
            user,
        },
    )))
}

/// Log in with email and password, issuing a fresh session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthPayload),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    // Unknown email and wrong password are indistinguishable to the caller
    let (user, password_hash) = state
        .users
        .find_credentials(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !password::verify_password(&request.password, &password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()).into());
    }

    let session_token = token::generate_token();
    state
        .sessions
        .create_session(user.id, &session_token, state.session_ttl_hours)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Login successful",
        AuthPayload {
            token: session_token,
            user,
        },
    )))
}
