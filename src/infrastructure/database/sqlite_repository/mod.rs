use super::ConnectionPool;

mod feeds;
mod mapper;
mod queries;
pub(crate) mod schema;

pub const CACHED_FEEDS_TABLE: &str = "cached_feeds";

/// SQLite-backed [`FeedCacheRepository`](super::FeedCacheRepository).
#[derive(Clone)]
pub struct SqliteFeedCacheRepository {
    pool: ConnectionPool,
}

impl SqliteFeedCacheRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await
            .is_ok()
    }
}
