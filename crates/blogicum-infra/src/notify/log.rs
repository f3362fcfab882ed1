use async_trait::async_trait;

use blogicum_core::ports::{Notification, Notifier, NotifyError};

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            subject = %notification.subject,
            message = %notification.message,
            "Notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let result = LogNotifier
            .notify(Notification::post_created("Hello"))
            .await;
        assert!(result.is_ok());
    }
}
