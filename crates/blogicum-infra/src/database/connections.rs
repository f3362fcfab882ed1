use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
            sqlx_logging: false,
        }
    }
}

/// Pooled connection to the blog database.
#[cfg(feature = "postgres")]
pub struct DatabaseConnection {
    pub conn: DbConn,
}

#[cfg(feature = "postgres")]
impl DatabaseConnection {
    /// Open the connection pool.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(config.sqlx_logging)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            pool_max = config.max_connections,
            pool_min = config.min_connections,
            "Database connected"
        );

        Ok(Self { conn })
    }
}
