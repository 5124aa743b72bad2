pub mod connection_pool;
pub mod repository;
pub mod sqlite_repository;

pub use connection_pool::ConnectionPool;
pub use repository::FeedCacheRepository;
pub use sqlite_repository::{CACHED_FEEDS_TABLE, SqliteFeedCacheRepository};
