//! Route configuration and setup

use crate::api_doc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use planhub_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Users
        .route("/users/info", get(handlers::users::get_user_info))
        .route("/users", get(handlers::users::list_users))
        .route("/users/assign-role", post(handlers::users::assign_role))
        .route(
            "/admin/assign-project-manager",
            post(handlers::users::promote_to_project_manager),
        )
        // Organizations
        .route("/orgs", post(handlers::organizations::create_organization))
        .route("/orgs/{id}", get(handlers::organizations::get_organization))
        // Projects and workflows
        .route("/projects", post(handlers::projects::create_project))
        .route(
            "/projects/assign-user",
            post(handlers::projects::assign_user_to_project),
        )
        .route("/projects/{id}", put(handlers::projects::update_project))
        .route(
            "/projects/{project_id}/workflows",
            post(handlers::projects::add_workflow),
        )
        // Tasks
        .route("/tasks", post(handlers::tasks::create_task))
        .route("/tasks/assign", post(handlers::tasks::assign_task))
        .route(
            "/tasks/{task_id}/status",
            put(handlers::tasks::update_task_status),
        )
        .with_state(state);

    let app = api_routes
        .merge(
            RapiDoc::with_openapi("/api-docs/openapi.json", api_doc::ApiDoc::openapi())
                .path("/docs"),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.allow_any_origin() {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
