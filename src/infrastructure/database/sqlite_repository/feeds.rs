use super::SqliteFeedCacheRepository;
use super::mapper::map_cached_feed_row;
use super::queries::{
    COUNT_CACHED_FEEDS, DELETE_CACHED_FEED_BY_ID, DELETE_CACHED_FEEDS_BY_HREF, INSERT_CACHED_FEED,
    SELECT_CACHED_FEED_BY_HREF, SELECT_CACHED_FEED_BY_ID, UPDATE_CACHED_FEED,
};
use crate::domain::entities::{CachedFeedRecord, NewCachedFeed};
use crate::infrastructure::database::FeedCacheRepository;
use crate::shared::error::CacheError;
use async_trait::async_trait;
use sqlx::{Executor, Sqlite};
use tracing::debug;

async fn insert_feed<'e, E>(executor: E, feed: &NewCachedFeed) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(INSERT_CACHED_FEED)
        .bind(&feed.href)
        .bind(&feed.title)
        .bind(&feed.link)
        .bind(&feed.feed_data)
        .bind(&feed.feed_data_type)
        .bind(&feed.http_headers)
        .bind(&feed.serialized)
        .bind(feed.last_retrieved)
        .bind(feed.time_to_live)
        .execute(executor)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn update_feed<'e, E>(executor: E, record: &CachedFeedRecord) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(UPDATE_CACHED_FEED)
        .bind(record.id)
        .bind(&record.href)
        .bind(&record.title)
        .bind(&record.link)
        .bind(&record.feed_data)
        .bind(&record.feed_data_type)
        .bind(&record.http_headers)
        .bind(&record.serialized)
        .bind(record.last_retrieved)
        .bind(record.time_to_live)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl FeedCacheRepository for SqliteFeedCacheRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CachedFeedRecord>, CacheError> {
        let row = sqlx::query(SELECT_CACHED_FEED_BY_ID)
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        row.as_ref().map(map_cached_feed_row).transpose()
    }

    async fn find_by_href(&self, href: &str) -> Result<Option<CachedFeedRecord>, CacheError> {
        let row = sqlx::query(SELECT_CACHED_FEED_BY_HREF)
            .bind(href)
            .fetch_optional(self.pool.get_pool())
            .await?;

        row.as_ref().map(map_cached_feed_row).transpose()
    }

    async fn create(&self, feed: &NewCachedFeed) -> Result<CachedFeedRecord, CacheError> {
        let id = insert_feed(self.pool.get_pool(), feed).await?;
        debug!(id, href = %feed.href, "cached feed created");
        Ok(feed.clone().into_record(id))
    }

    async fn update(&self, record: &CachedFeedRecord) -> Result<(), CacheError> {
        let affected = update_feed(self.pool.get_pool(), record).await?;
        if affected == 0 {
            return Err(CacheError::NotFound(format!("cached feed {}", record.id)));
        }
        Ok(())
    }

    async fn save_by_href(&self, feed: &NewCachedFeed) -> Result<CachedFeedRecord, CacheError> {
        let mut tx = self.pool.get_pool().begin().await?;

        let existing = sqlx::query(SELECT_CACHED_FEED_BY_HREF)
            .bind(&feed.href)
            .fetch_optional(&mut *tx)
            .await?;

        let record = match existing {
            Some(row) => {
                let mut record = map_cached_feed_row(&row)?;
                record.apply(feed);
                update_feed(&mut *tx, &record).await?;
                debug!(id = record.id, href = %feed.href, "cached feed refreshed");
                record
            }
            None => {
                let id = insert_feed(&mut *tx, feed).await?;
                debug!(id, href = %feed.href, "cached feed created");
                feed.clone().into_record(id)
            }
        };

        tx.commit().await?;
        Ok(record)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, CacheError> {
        let result = sqlx::query(DELETE_CACHED_FEED_BY_ID)
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_href(&self, href: &str) -> Result<u64, CacheError> {
        let result = sqlx::query(DELETE_CACHED_FEEDS_BY_HREF)
            .bind(href)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, CacheError> {
        let count = sqlx::query_scalar(COUNT_CACHED_FEEDS)
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(count)
    }
}
