//! Planhub API Library
//!
//! This crate provides the HTTP handlers, auth extraction, and application
//! setup for the Planhub server binary.

mod api_doc;

pub mod auth;
pub mod error;
pub mod handlers;
pub mod response;
pub mod setup;
pub mod state;

pub use error::HttpAppError;
pub use response::ApiResponse;
