//! OpenAPI documentation, served at /api-docs/openapi.json and browsable
//! through RapiDoc at /docs.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use planhub_core::models;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token issued by register/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Planhub API",
        version = "0.1.0",
        description = "Multi-tenant project management API. Organizations own users, projects, workflows and tasks; roles (ORGADMIN, PROJECTMANAGER, EMPLOYEE) gate who may create and assign work."
    ),
    paths(
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        // Users
        handlers::users::get_user_info,
        handlers::users::list_users,
        handlers::users::assign_role,
        handlers::users::promote_to_project_manager,
        // Organizations
        handlers::organizations::create_organization,
        handlers::organizations::get_organization,
        // Projects and workflows
        handlers::projects::create_project,
        handlers::projects::assign_user_to_project,
        handlers::projects::update_project,
        handlers::projects::add_workflow,
        // Tasks
        handlers::tasks::create_task,
        handlers::tasks::assign_task,
        handlers::tasks::update_task_status,
    ),
    components(
        schemas(
            models::Role,
            models::WorkStatus,
            models::User,
            models::UserSummary,
            models::AuthUser,
            models::AssignRoleRequest,
            models::PromoteRequest,
            models::Organization,
            models::CreateOrganizationRequest,
            models::Project,
            models::CreateProjectRequest,
            models::UpdateProjectRequest,
            models::AssignUserRequest,
            models::Workflow,
            models::CreateWorkflowRequest,
            models::Task,
            models::TaskDependency,
            models::CreateTaskRequest,
            models::AssignTaskRequest,
            models::UpdateTaskStatusRequest,
            handlers::auth::RegisterRequest,
            handlers::auth::LoginRequest,
            handlers::auth::AuthPayload,
            error::ErrorEnvelope,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and session login"),
        (name = "users", description = "User identity and listing"),
        (name = "admin", description = "Organization-admin operations"),
        (name = "organizations", description = "Tenant management"),
        (name = "projects", description = "Project creation, staffing and updates"),
        (name = "workflows", description = "Workflows grouping tasks within a project"),
        (name = "tasks", description = "Task creation, assignment and status transitions"),
        (name = "dev", description = "Development utilities, not tenant-scoped")
    )
)]
pub struct ApiDoc;
