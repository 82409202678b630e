use async_trait::async_trait;

use crate::error::SourceError;

/// The library tool operations the action executor needs. Kept narrow so the
/// executor can be tested against a recording mock.
#[async_trait]
pub trait MovieLibrary: Send + Sync {
    /// Delete the library entry and its files.
    async fn delete_movie(&self, id: u64) -> Result<(), SourceError>;

    /// Append the external identifier to the tool's import exclusion list.
    /// Implementations treat an already-present identifier as success.
    async fn add_exclusion(&self, tmdb_id: u32, title: &str, year: u32) -> Result<(), SourceError>;
}
