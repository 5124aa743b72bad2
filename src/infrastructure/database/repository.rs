use crate::domain::entities::{CachedFeedRecord, NewCachedFeed};
use crate::shared::error::CacheError;
use async_trait::async_trait;

/// Record-level access to the `cached_feeds` table.
///
/// `href` is not unique at the database level; `find_by_href` returns the
/// oldest matching row and `save_by_href` keeps at most one row current.
#[async_trait]
pub trait FeedCacheRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<CachedFeedRecord>, CacheError>;
    async fn find_by_href(&self, href: &str) -> Result<Option<CachedFeedRecord>, CacheError>;
    async fn create(&self, feed: &NewCachedFeed) -> Result<CachedFeedRecord, CacheError>;
    async fn update(&self, record: &CachedFeedRecord) -> Result<(), CacheError>;
    async fn save_by_href(&self, feed: &NewCachedFeed) -> Result<CachedFeedRecord, CacheError>;
    async fn delete_by_id(&self, id: i64) -> Result<bool, CacheError>;
    async fn delete_by_href(&self, href: &str) -> Result<u64, CacheError>;
    async fn count(&self) -> Result<i64, CacheError>;
}
