//! DDL and introspection for the `cached_feeds` table.

use super::queries::{
    CREATE_CACHED_FEEDS_TABLE, DROP_CACHED_FEEDS_TABLE, SELECT_COLUMN_NAMES, TABLE_EXISTS,
};
use sqlx::SqlitePool;

pub(crate) async fn table_exists(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(TABLE_EXISTS).fetch_one(pool).await?;
    Ok(count > 0)
}

pub(crate) async fn column_names(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(SELECT_COLUMN_NAMES)
        .fetch_all(pool)
        .await
}

pub(crate) async fn drop_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(DROP_CACHED_FEEDS_TABLE).execute(pool).await?;
    Ok(())
}

pub(crate) async fn create_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CACHED_FEEDS_TABLE).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::ConnectionPool;

    #[tokio::test]
    async fn create_table_exposes_all_columns() {
        let pool = ConnectionPool::from_memory().await.unwrap();
        assert!(!table_exists(pool.get_pool()).await.unwrap());
        assert!(column_names(pool.get_pool()).await.unwrap().is_empty());

        create_table(pool.get_pool()).await.unwrap();

        assert!(table_exists(pool.get_pool()).await.unwrap());
        assert_eq!(
            column_names(pool.get_pool()).await.unwrap(),
            vec![
                "id",
                "href",
                "title",
                "link",
                "feed_data_type",
                "feed_data",
                "http_headers",
                "serialized",
                "last_retrieved",
                "time_to_live",
            ]
        );
    }

    #[tokio::test]
    async fn drop_table_is_noop_when_missing() {
        let pool = ConnectionPool::from_memory().await.unwrap();
        drop_table(pool.get_pool()).await.unwrap();
        assert!(!table_exists(pool.get_pool()).await.unwrap());
    }
}
