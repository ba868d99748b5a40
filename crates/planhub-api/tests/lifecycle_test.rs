//! Repository-level integration tests against a real Postgres instance.
//!
//! These run only when `TEST_DATABASE_URL` points at a throwaway database;
//! without it every test is a no-op. Each test creates its own organizations
//! and users with unique emails, so they can run concurrently on one database.

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use uuid::Uuid;

use planhub_core::models::{
    AssignTaskRequest, CreateProjectRequest, CreateTaskRequest, CreateWorkflowRequest, Project,
    Role, Task, User, WorkStatus, Workflow,
};
use planhub_core::AppError;
use planhub_db::{
    OrganizationRepository, ProjectRepository, TaskRepository, UserRepository, WorkflowRepository,
};

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to TEST_DATABASE_URL");

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .expect("failed to load migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    Some(pool)
}

struct Fixture {
    organizations: OrganizationRepository,
    users: UserRepository,
    projects: ProjectRepository,
    workflows: WorkflowRepository,
    tasks: TaskRepository,
}

impl Fixture {
    fn new(pool: PgPool) -> Self {
        Self {
            organizations: OrganizationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            workflows: WorkflowRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool),
        }
    }

    async fn organization(&self, name: &str) -> Uuid {
        self.organizations
            .create_organization(name, "integration test tenant")
            .await
            .expect("create organization")
            .id
    }

    async fn user(&self, organization_id: Uuid, role: Role) -> User {
        let email = format!("user-{}@test.local", Uuid::new_v4());
        let user = self
            .users
            .create_user(&email, "Test User", "not-a-real-hash", organization_id)
            .await
            .expect("create user");
        if role == Role::Employee {
            user
        } else {
            self.users.assign_role(user.id, role).await.expect("assign role")
        }
    }

    async fn project(&self, organization_id: Uuid, owner_id: Uuid) -> Project {
        let request = CreateProjectRequest {
            name: "Test Project".to_string(),
            description: "integration test project".to_string(),
            start_date: Utc::now(),
            end_date: Utc::now() + Duration::days(30),
            status: Some(WorkStatus::Completed), // must be ignored
        };
        self.projects
            .create_project(&request, organization_id, &[owner_id])
            .await
            .expect("create project")
    }

    async fn workflow(&self, project_id: Uuid, organization_id: Uuid) -> Workflow {
        self.workflows
            .add_workflow(
                project_id,
                organization_id,
                &CreateWorkflowRequest {
                    name: "Default".to_string(),
                    description: "integration test workflow".to_string(),
                },
            )
            .await
            .expect("add workflow")
    }

    async fn task(
        &self,
        project_id: Uuid,
        workflow_id: Uuid,
        organization_id: Uuid,
        dependencies: Vec<Uuid>,
    ) -> Task {
        let request = CreateTaskRequest {
            name: "Test Task".to_string(),
            description: "integration test task".to_string(),
            project_id,
            workflow_id,
            dependencies: Some(dependencies),
        };
        self.tasks
            .create_task(&request, organization_id)
            .await
            .expect("create task")
    }

    async fn assign(&self, task_id: Uuid, assignee_ids: Vec<Uuid>, organization_id: Uuid) -> Task {
        self.tasks
            .assign_task(&AssignTaskRequest { task_id, assignee_ids }, organization_id)
            .await
            .expect("assign task")
    }
}

#[tokio::test]
async fn test_task_lifecycle_end_to_end() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let fx = Fixture::new(pool);

    let org = fx.organization("Lifecycle Org").await;
    let manager = fx.user(org, Role::ProjectManager).await;
    let employee = fx.user(org, Role::Employee).await;

    // New projects start NOT_STARTED no matter what the request asked for
    let project = fx.project(org, manager.id).await;
    assert_eq!(project.status, WorkStatus::NotStarted);
    assert!(project.users.iter().any(|u| u.id == manager.id));

    let workflow = fx.workflow(project.id, org).await;
    let task = fx.task(project.id, workflow.id, org, vec![]).await;
    assert_eq!(task.status, WorkStatus::NotStarted);

    let task = fx.assign(task.id, vec![employee.id], org).await;
    assert_eq!(task.assignees.len(), 1);

    // Assignee may move the task forward
    let task = fx
        .tasks
        .update_status(task.id, WorkStatus::InProgress, employee.id, org)
        .await
        .expect("assignee updates status");
    assert_eq!(task.status, WorkStatus::InProgress);

    // The manager is not an assignee and cannot
    let err = fx
        .tasks
        .update_status(task.id, WorkStatus::Completed, manager.id, org)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");
}

#[tokio::test]
async fn test_cross_tenant_access_reads_as_not_found() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let fx = Fixture::new(pool);

    let org_a = fx.organization("Tenant A").await;
    let org_b = fx.organization("Tenant B").await;
    let manager_a = fx.user(org_a, Role::ProjectManager).await;
    let employee_b = fx.user(org_b, Role::Employee).await;

    let project = fx.project(org_a, manager_a.id).await;
    let workflow = fx.workflow(project.id, org_a).await;
    let task = fx.task(project.id, workflow.id, org_a, vec![]).await;

    // Lookups through the wrong tenant see nothing
    assert!(fx
        .projects
        .find_in_organization(project.id, org_b)
        .await
        .unwrap()
        .is_none());
    assert!(fx
        .tasks
        .find_in_organization(task.id, org_b)
        .await
        .unwrap()
        .is_none());

    // A workflow under a foreign project is NotFound, not Forbidden
    let err = fx
        .workflows
        .add_workflow(
            project.id,
            org_b,
            &CreateWorkflowRequest {
                name: "Intruder".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // A cross-tenant employee is rejected before the project is even consulted
    let err = fx
        .projects
        .assign_user(project.id, employee_b.id, org_a)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_project_membership_adds_while_task_assignment_replaces() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let fx = Fixture::new(pool);

    let org = fx.organization("Membership Org").await;
    let manager = fx.user(org, Role::ProjectManager).await;
    let alice = fx.user(org, Role::Employee).await;
    let bob = fx.user(org, Role::Employee).await;

    let project = fx.project(org, manager.id).await;

    // Project membership accumulates
    fx.projects
        .assign_user(project.id, alice.id, org)
        .await
        .expect("assign alice");
    let project = fx
        .projects
        .assign_user(project.id, bob.id, org)
        .await
        .expect("assign bob");
    let member_ids: Vec<Uuid> = project.users.iter().map(|u| u.id).collect();
    assert!(member_ids.contains(&alice.id));
    assert!(member_ids.contains(&bob.id));

    // Task assignment replaces the previous set
    let workflow = fx.workflow(project.id, org).await;
    let task = fx.task(project.id, workflow.id, org, vec![]).await;
    fx.assign(task.id, vec![alice.id], org).await;
    let task = fx.assign(task.id, vec![bob.id], org).await;
    assert_eq!(task.assignees.len(), 1);
    assert_eq!(task.assignees[0].id, bob.id);
}

#[tokio::test]
async fn test_dependency_gate_blocks_until_completed() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let fx = Fixture::new(pool);

    let org = fx.organization("Dependency Org").await;
    let manager = fx.user(org, Role::ProjectManager).await;
    let employee = fx.user(org, Role::Employee).await;

    let project = fx.project(org, manager.id).await;
    let workflow = fx.workflow(project.id, org).await;

    let upstream = fx.task(project.id, workflow.id, org, vec![]).await;
    let downstream = fx
        .task(project.id, workflow.id, org, vec![upstream.id])
        .await;
    assert_eq!(downstream.dependencies.len(), 1);

    fx.assign(upstream.id, vec![employee.id], org).await;
    fx.assign(downstream.id, vec![employee.id], org).await;

    // Blocked while the upstream task is incomplete
    let err = fx
        .tasks
        .update_status(downstream.id, WorkStatus::InProgress, employee.id, org)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // Other transitions are not gated
    fx.tasks
        .update_status(downstream.id, WorkStatus::Pending, employee.id, org)
        .await
        .expect("ungated transition");

    fx.tasks
        .update_status(upstream.id, WorkStatus::InProgress, employee.id, org)
        .await
        .expect("start upstream");
    fx.tasks
        .update_status(upstream.id, WorkStatus::Completed, employee.id, org)
        .await
        .expect("complete upstream");

    let downstream = fx
        .tasks
        .update_status(downstream.id, WorkStatus::InProgress, employee.id, org)
        .await
        .expect("gate opens once dependencies complete");
    assert_eq!(downstream.status, WorkStatus::InProgress);
}

#[tokio::test]
async fn test_incomplete_sets_are_rejected_whole() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let fx = Fixture::new(pool);

    let org = fx.organization("All Or Nothing Org").await;
    let manager = fx.user(org, Role::ProjectManager).await;
    let employee = fx.user(org, Role::Employee).await;

    let project = fx.project(org, manager.id).await;
    let workflow = fx.workflow(project.id, org).await;

    // One dependency id is bogus: the whole create fails
    let err = fx
        .tasks
        .create_task(
            &CreateTaskRequest {
                name: "Bad deps".to_string(),
                description: String::new(),
                project_id: project.id,
                workflow_id: workflow.id,
                dependencies: Some(vec![Uuid::new_v4()]),
            },
            org,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // One assignee id is bogus: no assignees are written
    let task = fx.task(project.id, workflow.id, org, vec![]).await;
    let err = fx
        .tasks
        .assign_task(
            &AssignTaskRequest {
                task_id: task.id,
                assignee_ids: vec![employee.id, Uuid::new_v4()],
            },
            org,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    let task = fx
        .tasks
        .find_in_organization(task.id, org)
        .await
        .unwrap()
        .expect("task still exists");
    assert_eq!(task.status, WorkStatus::NotStarted);
}

#[tokio::test]
async fn test_duplicate_email_is_a_validation_error() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let fx = Fixture::new(pool);

    let org = fx.organization("Email Org").await;
    let email = format!("dup-{}@test.local", Uuid::new_v4());

    fx.users
        .create_user(&email, "First", "hash", org)
        .await
        .expect("first registration");
    let err = fx
        .users
        .create_user(&email, "Second", "hash", org)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}
