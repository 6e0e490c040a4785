//! Core Service Layer
//!
//! Shared infrastructure for the blog server: accounts and authentication,
//! data models, configuration, storage and routing.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod db;
pub mod error;
pub mod models;
pub mod router;

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use router::router;
