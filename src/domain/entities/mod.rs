pub mod cached_feed;

pub use cached_feed::{CachedFeedRecord, NewCachedFeed};
