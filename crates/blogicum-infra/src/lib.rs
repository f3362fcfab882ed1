//! # Blogicum Infrastructure
//!
//! Concrete implementations of the ports defined in `blogicum-core`.
//! This crate contains the database adapters, the auth services and the
//! notification sinks.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `webhook` - Notifications delivered to an HTTP webhook

pub mod database;
pub mod notify;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryDatabase};
pub use notify::LogNotifier;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnection;

#[cfg(feature = "webhook")]
pub use notify::{WebhookConfig, WebhookNotifier};
