//! Planhub Database Layer
//!
//! This crate provides the sqlx/Postgres repositories for every aggregate.
//! Each repository is a thin struct over a shared [`sqlx::PgPool`]; all
//! entity lookups are scoped by `organization_id` so cross-tenant access
//! surfaces as "not found".

pub mod db;

pub use db::{
    OrganizationRepository, ProjectRepository, SessionRepository, TaskRepository, UserRepository,
    WorkflowRepository,
};
