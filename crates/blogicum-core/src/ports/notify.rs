//! Notification port - side effects that must never fail a request.

use async_trait::async_trait;

/// A message for the site administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

impl Notification {
    /// Announcement sent whenever a post is created.
    pub fn post_created(title: &str) -> Self {
        Self {
            subject: "New post!".to_string(),
            message: format!("titled {title}"),
        }
    }
}

/// Notification sink (log, webhook, mail relay).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notification errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),

    #[error("Notification rejected with status {0}")]
    Rejected(u16),
}
