use planhub_core::Config;
use planhub_db::{
    OrganizationRepository, ProjectRepository, SessionRepository, TaskRepository, UserRepository,
    WorkflowRepository,
};
use sqlx::PgPool;

/// Shared application state: one repository per aggregate over a single pool.
#[derive(Clone)]
pub struct AppState {
    pub organizations: OrganizationRepository,
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub projects: ProjectRepository,
    pub workflows: WorkflowRepository,
    pub tasks: TaskRepository,
    pub session_ttl_hours: i64,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            organizations: OrganizationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            workflows: WorkflowRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool),
            session_ttl_hours: config.session_ttl_hours,
        }
    }
}
