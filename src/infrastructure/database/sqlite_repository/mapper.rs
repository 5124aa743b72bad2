use crate::domain::entities::CachedFeedRecord;
use crate::shared::error::CacheError;
use sqlx::{Row, sqlite::SqliteRow};

pub(super) fn map_cached_feed_row(row: &SqliteRow) -> Result<CachedFeedRecord, CacheError> {
    Ok(CachedFeedRecord {
        id: row.try_get("id")?,
        href: row.try_get("href")?,
        title: row.try_get("title")?,
        link: row.try_get("link")?,
        feed_data: row.try_get("feed_data")?,
        feed_data_type: row.try_get("feed_data_type")?,
        http_headers: row.try_get("http_headers")?,
        serialized: row.try_get("serialized")?,
        last_retrieved: row.try_get("last_retrieved")?,
        time_to_live: row.try_get("time_to_live")?,
    })
}
