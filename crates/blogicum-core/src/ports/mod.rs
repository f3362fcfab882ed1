//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod notify;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use notify::{Notification, Notifier, NotifyError};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
