//! Connection and schema lifecycle for the feed cache.
//!
//! The store moves through three states: no connection, connected without a
//! usable table, and ready. Nothing here re-checks readiness on its own;
//! callers ask with [`FeedCacheStore::ready`].

use crate::infrastructure::database::sqlite_repository::schema;
use crate::infrastructure::database::{
    CACHED_FEEDS_TABLE, ConnectionPool, SqliteFeedCacheRepository,
};
use crate::shared::config::{self, CacheSettings};
use crate::shared::error::{CacheError, Result};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Columns a usable `cached_feeds` table must have. `time_to_live` and
/// `serialized` are created but not required.
pub const EXPECTED_COLUMNS: [&str; 8] = [
    "id",
    "href",
    "title",
    "link",
    "feed_data",
    "feed_data_type",
    "http_headers",
    "last_retrieved",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// Create the table if it is missing, never touch an existing one.
    EnsureExists,
    /// Drop and recreate the table. Existing rows are lost.
    ForceRecreate,
}

#[derive(Debug)]
pub enum InitOutcome {
    AlreadyReady,
    Initialized,
    Failed(CacheError),
}

impl InitOutcome {
    pub fn is_ready(&self) -> bool {
        !matches!(self, InitOutcome::Failed(_))
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            InitOutcome::Failed(err) => Err(err),
            _ => Ok(()),
        }
    }
}

pub struct FeedCacheStore {
    settings: CacheSettings,
    pool: Option<ConnectionPool>,
    column_cache: RwLock<Option<Vec<String>>>,
}

impl FeedCacheStore {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            pool: None,
            column_cache: RwLock::new(None),
        }
    }

    /// Uses an already-open connection instead of discovering `database.yml`.
    pub fn with_pool(settings: CacheSettings, pool: ConnectionPool) -> Self {
        Self {
            settings,
            pool: Some(pool),
            column_cache: RwLock::new(None),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn pool(&self) -> Option<&ConnectionPool> {
        self.pool.as_ref().filter(|pool| !pool.is_closed())
    }

    pub fn connected(&self) -> bool {
        self.pool().is_some()
    }

    /// Connects and ensures the table, reporting instead of raising.
    pub async fn initialize_cache(&mut self) -> InitOutcome {
        if self.ready().await {
            return InitOutcome::AlreadyReady;
        }

        match self.try_initialize().await {
            Ok(()) => InitOutcome::Initialized,
            Err(err) => {
                warn!(error = %err, "Could not establish connection or create feed cache table");
                InitOutcome::Failed(err)
            }
        }
    }

    async fn try_initialize(&mut self) -> Result<()> {
        self.attempt_connection().await?;
        if !self.ready().await {
            self.create_cache_table().await?;
        }
        Ok(())
    }

    /// Opens a pool from the first `database.yml` candidate unless a live
    /// connection is already held.
    pub async fn attempt_connection(&mut self) -> Result<()> {
        if self.connected() {
            return Ok(());
        }

        let path = config::discover_config_file(&self.settings)?;
        let database_config = config::load_database_config(&path, &self.settings.environment)?;
        debug!(
            path = %path.display(),
            environment = %self.settings.environment,
            "loaded feed cache database configuration"
        );

        let pool = ConnectionPool::from_config(&database_config).await?;
        self.pool = Some(pool);
        self.reset_column_information().await;
        Ok(())
    }

    /// Drops any existing `cached_feeds` table and creates it afresh.
    pub async fn create_cache_table(&self) -> Result<()> {
        let pool = self.require_pool()?;

        if schema::table_exists(pool.get_pool()).await? {
            schema::drop_table(pool.get_pool()).await?;
            debug!(table = CACHED_FEEDS_TABLE, "dropped existing feed cache table");
        }
        schema::create_table(pool.get_pool()).await?;
        self.reset_column_information().await;

        info!(table = CACHED_FEEDS_TABLE, "Feed cache table created");
        Ok(())
    }

    pub async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        match mode {
            SchemaMode::ForceRecreate => self.create_cache_table().await,
            SchemaMode::EnsureExists => {
                let pool = self.require_pool()?;
                if !schema::table_exists(pool.get_pool()).await? {
                    return self.create_cache_table().await;
                }

                let missing = self.missing_columns().await?;
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(CacheError::SchemaMismatch { missing })
                }
            }
        }
    }

    pub async fn table_exists(&self) -> Result<bool> {
        let pool = self.require_pool()?;
        Ok(schema::table_exists(pool.get_pool()).await?)
    }

    /// Column names of `cached_feeds`, cached until the next
    /// [`reset_column_information`](Self::reset_column_information).
    pub async fn column_names(&self) -> Result<Vec<String>> {
        if let Some(columns) = self.column_cache.read().await.as_ref() {
            return Ok(columns.clone());
        }

        let pool = self.require_pool()?;
        let columns = schema::column_names(pool.get_pool()).await?;
        if !columns.is_empty() {
            *self.column_cache.write().await = Some(columns.clone());
        }
        Ok(columns)
    }

    pub async fn reset_column_information(&self) {
        *self.column_cache.write().await = None;
    }

    pub async fn missing_columns(&self) -> Result<Vec<String>> {
        let columns = self.column_names().await?;
        Ok(EXPECTED_COLUMNS
            .iter()
            .filter(|expected| !columns.iter().any(|column| column == *expected))
            .map(|expected| expected.to_string())
            .collect())
    }

    /// Connected, table present, and every [`EXPECTED_COLUMNS`] entry found.
    pub async fn table_correct(&self) -> bool {
        if !self.connected() {
            return false;
        }

        match self.table_exists().await {
            Ok(true) => {}
            Ok(false) => return false,
            Err(err) => {
                debug!(error = %err, "feed cache table lookup failed");
                return false;
            }
        }

        match self.missing_columns().await {
            Ok(missing) => missing.is_empty(),
            Err(err) => {
                debug!(error = %err, "feed cache column lookup failed");
                false
            }
        }
    }

    pub async fn ready(&self) -> bool {
        self.connected() && self.table_correct().await
    }

    pub async fn set_up_correctly(&self) -> bool {
        self.ready().await
    }

    pub fn repository(&self) -> Result<SqliteFeedCacheRepository> {
        Ok(SqliteFeedCacheRepository::new(self.require_pool()?.clone()))
    }

    pub async fn close(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        self.reset_column_information().await;
    }

    fn require_pool(&self) -> Result<&ConnectionPool> {
        self.pool().ok_or(CacheError::NotConnected)
    }
}
