use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stored row of the `cached_feeds` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFeedRecord {
    pub id: i64,
    pub href: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub feed_data: Option<String>,
    pub feed_data_type: Option<String>,
    pub http_headers: Option<String>,
    pub serialized: Option<String>,
    pub last_retrieved: Option<DateTime<Utc>>,
    pub time_to_live: Option<i64>,
}

impl CachedFeedRecord {
    /// `last_retrieved + time_to_live`, when both are known.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let retrieved = self.last_retrieved?;
        let ttl = Duration::try_seconds(self.time_to_live?)?;
        retrieved.checked_add_signed(ttl)
    }

    /// Records without a retrieval time or TTL are always considered stale.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    pub fn http_headers_map(&self) -> Result<BTreeMap<String, String>, serde_json::Error> {
        match self.http_headers.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw),
            _ => Ok(BTreeMap::new()),
        }
    }

    /// Overwrites every column except `id` with the values in `feed`.
    pub fn apply(&mut self, feed: &NewCachedFeed) {
        self.href = Some(feed.href.clone());
        self.title = feed.title.clone();
        self.link = feed.link.clone();
        self.feed_data = feed.feed_data.clone();
        self.feed_data_type = feed.feed_data_type.clone();
        self.http_headers = feed.http_headers.clone();
        self.serialized = feed.serialized.clone();
        self.last_retrieved = feed.last_retrieved;
        self.time_to_live = feed.time_to_live;
    }
}

/// Column values for a record that has not been assigned an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCachedFeed {
    pub href: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub feed_data: Option<String>,
    pub feed_data_type: Option<String>,
    pub http_headers: Option<String>,
    pub serialized: Option<String>,
    pub last_retrieved: Option<DateTime<Utc>>,
    pub time_to_live: Option<i64>,
}

impl NewCachedFeed {
    /// Starts a record for `href`, retrieved now.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            last_retrieved: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_feed_data(mut self, data: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.feed_data = Some(data.into());
        self.feed_data_type = Some(data_type.into());
        self
    }

    pub fn with_http_headers(
        mut self,
        headers: &BTreeMap<String, String>,
    ) -> Result<Self, serde_json::Error> {
        self.http_headers = Some(serde_json::to_string(headers)?);
        Ok(self)
    }

    pub fn with_serialized(mut self, serialized: impl Into<String>) -> Self {
        self.serialized = Some(serialized.into());
        self
    }

    pub fn with_last_retrieved(mut self, retrieved: DateTime<Utc>) -> Self {
        self.last_retrieved = Some(retrieved);
        self
    }

    pub fn with_time_to_live(mut self, seconds: i64) -> Self {
        self.time_to_live = Some(seconds);
        self
    }

    pub fn into_record(self, id: i64) -> CachedFeedRecord {
        CachedFeedRecord {
            id,
            href: Some(self.href),
            title: self.title,
            link: self.link,
            feed_data: self.feed_data,
            feed_data_type: self.feed_data_type,
            http_headers: self.http_headers,
            serialized: self.serialized,
            last_retrieved: self.last_retrieved,
            time_to_live: self.time_to_live,
        }
    }
}
