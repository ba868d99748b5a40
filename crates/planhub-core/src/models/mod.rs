//! Domain models shared across the Planhub components.

pub mod organization;
pub mod project;
pub mod task;
pub mod user;
pub mod workflow;

pub use organization::{CreateOrganizationRequest, Organization};
pub use project::{
    AssignUserRequest, CreateProjectRequest, Project, UpdateProjectRequest, WorkStatus,
};
pub use task::{AssignTaskRequest, CreateTaskRequest, Task, TaskDependency, UpdateTaskStatusRequest};
pub use user::{AssignRoleRequest, AuthUser, PromoteRequest, Role, User, UserSummary};
pub use workflow::{CreateWorkflowRequest, Workflow};
