//! Planhub Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! authorization rules shared across all Planhub components.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
