pub mod organization;
pub mod project;
pub mod session;
pub mod task;
pub mod user;
pub mod workflow;

pub use organization::OrganizationRepository;
pub use project::ProjectRepository;
pub use session::SessionRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
pub use workflow::WorkflowRepository;
