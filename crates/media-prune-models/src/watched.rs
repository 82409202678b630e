use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A movie the media server reports as watched.
///
/// `tmdb_id` is the join key against the library tool; titles are carried for
/// display only and never participate in matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedItem {
    pub tmdb_id: u32,
    pub title: String,
    pub year: Option<u32>,
    /// Most recent watch timestamp reported by the server.
    pub last_watched_at: DateTime<Utc>,
}
