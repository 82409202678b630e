use serde::{Deserialize, Serialize};

/// Result of executing one delete decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Entry and files deleted, identifier appended to the exclusion list.
    Deleted,
    /// Delete succeeded but the exclusion append failed; the movie is gone
    /// but not protected from re-import.
    DeletedNotExcluded(String),
    /// Delete failed; the entry is untouched.
    Failed(String),
}

impl ActionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ActionOutcome::Deleted => "deleted",
            ActionOutcome::DeletedNotExcluded(_) => "deleted-not-excluded",
            ActionOutcome::Failed(_) => "failed",
        }
    }
}
