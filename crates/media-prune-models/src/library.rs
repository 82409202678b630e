use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A managed movie entry in the library tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryEntry {
    /// Internal ID, used for the delete operation.
    pub id: u64,
    pub tmdb_id: u32,
    pub title: String,
    pub year: Option<u32>,
    /// Numeric tag IDs assigned to the entry.
    pub tag_ids: HashSet<u64>,
    pub has_file: bool,
    pub path: Option<String>,
}
