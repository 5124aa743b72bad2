//! Persistence-backed cache for fetched syndication feeds.
//!
//! [`FeedCacheStore`] discovers a `database.yml`, opens a SQLite pool, and
//! keeps the `cached_feeds` table in shape. Records are read and written
//! through [`FeedCacheRepository`].

pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod shared;
pub mod store;

pub use domain::entities::{CachedFeedRecord, NewCachedFeed};
pub use infrastructure::database::{
    ConnectionPool, FeedCacheRepository, SqliteFeedCacheRepository,
};
pub use shared::{CacheError, CacheSettings, DatabaseConfig, Environment, Result};
pub use store::{FeedCacheStore, InitOutcome, SchemaMode};
