use crate::shared::config::DatabaseConfig;
use crate::shared::error::CacheError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct ConnectionPool {
    pool: Arc<SqlitePool>,
}

impl ConnectionPool {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Self::connect_with(options, 5).await
    }

    /// An in-memory database lives only as long as its connection, so the
    /// pool holds exactly one and never recycles it.
    pub async fn from_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, CacheError> {
        config.validate()?;

        if config.is_in_memory() {
            return Self::from_memory()
                .await
                .map_err(|err| CacheError::ConnectionFailure(err.to_string()));
        }

        let options = match (&config.url, &config.database) {
            (Some(url), _) => SqliteConnectOptions::from_str(url)
                .map_err(|err| CacheError::InvalidConfiguration(err.to_string()))?,
            (None, Some(database)) => SqliteConnectOptions::new()
                .filename(database)
                .create_if_missing(true),
            (None, None) => {
                return Err(CacheError::InvalidConfiguration(
                    "either database or url must be set".to_string(),
                ));
            }
        };
        let options = options.busy_timeout(Duration::from_millis(config.timeout));

        let pool = Self::connect_with(options, config.pool)
            .await
            .map_err(|err| CacheError::ConnectionFailure(err.to_string()))?;
        info!(
            database = config.database.as_deref().unwrap_or("<url>"),
            max_connections = config.pool,
            "Feed cache database connected"
        );
        Ok(pool)
    }

    async fn connect_with(
        options: SqliteConnectOptions,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
