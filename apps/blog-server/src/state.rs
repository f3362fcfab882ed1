//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, Notifier, PostRepository,
    UserRepository,
};
use blogicum_infra::{InMemoryDatabase, LogNotifier};

#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};
#[cfg(feature = "postgres")]
use blogicum_infra::{DatabaseConfig, DatabaseConnection};
#[cfg(feature = "webhook")]
use blogicum_infra::WebhookNotifier;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let notifier = build_notifier(config);

        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                if let Some(state) = Self::postgres(db_config, notifier.clone()).await {
                    tracing::info!("Application state initialized (postgres)");
                    return state;
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(InMemoryDatabase::new(), notifier)
    }

    /// State backed by the given in-memory tables.
    pub fn in_memory(db: InMemoryDatabase, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            users: Arc::new(db.users()),
            posts: Arc::new(db.posts()),
            categories: Arc::new(db.categories()),
            locations: Arc::new(db.locations()),
            comments: Arc::new(db.comments()),
            notifier,
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &DatabaseConfig, notifier: Arc<dyn Notifier>) -> Option<Self> {
        match DatabaseConnection::init(config).await {
            Ok(connection) => {
                let conn = connection.conn;
                Some(Self {
                    users: Arc::new(PostgresUserRepository::new(conn.clone())),
                    posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                    locations: Arc::new(PostgresLocationRepository::new(conn.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(conn)),
                    notifier,
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }
}

#[cfg_attr(not(feature = "webhook"), allow(unused_variables))]
fn build_notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    #[cfg(feature = "webhook")]
    {
        if let Some(webhook) = &config.webhook {
            match WebhookNotifier::new(webhook.clone()) {
                Ok(notifier) => {
                    tracing::info!(url = %webhook.url, "Notifications delivered to webhook");
                    return Arc::new(notifier);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Webhook notifier unavailable, logging instead")
                }
            }
        }
    }

    Arc::new(LogNotifier)
}
