use serde::{Deserialize, Serialize};

use crate::library::LibraryEntry;
use crate::watched::WatchedItem;

/// What the pipeline decided to do with one watched movie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    /// Matched, past threshold, not tag-protected: delete and exclude.
    Delete,
    /// Matched but carries an exclusion tag. Listed, never acted upon.
    SkipTagged,
    /// Matched but watched too recently.
    SkipThreshold,
    /// No library entry with this external ID. Informational only.
    SkipUnmatched,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Delete => "delete",
            Action::SkipTagged => "skipped-tagged",
            Action::SkipThreshold => "skipped-recent",
            Action::SkipUnmatched => "unmatched",
        }
    }
}

/// One watched movie joined (or not) to its library entry, with the action
/// the filter assigned. Derived per run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub watched: WatchedItem,
    /// Absent for `SkipUnmatched`.
    pub entry: Option<LibraryEntry>,
    pub action: Action,
}
