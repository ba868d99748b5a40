use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use planhub_core::models::{CreateOrganizationRequest, Organization};
use planhub_core::AppError;

/// Create a new organization. Unauthenticated: this is the bootstrap
/// operation that every other resource hangs off.
#[utoipa::path(
    post,
    path = "/orgs",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 200, description = "Organization created", body = Organization),
        (status = 400, description = "Invalid request")
    ),
    tag = "organizations"
)]
#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_organization(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<Json<ApiResponse<Organization>>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let organization = state
        .organizations
        .create_organization(&request.name, &request.description)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Organization created successfully",
        organization,
    )))
}

/// Fetch a single organization by id.
#[utoipa::path(
    get,
    path = "/orgs/{id}",
    params(("id" = Uuid, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization found", body = Organization),
        (status = 404, description = "Organization not found")
    ),
    tag = "organizations"
)]
#[tracing::instrument(skip(state))]
pub async fn get_organization(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Organization>>, HttpAppError> {
    let organization = state
        .organizations
        .get_organization_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Organization found", organization)))
}
