use chrono::{DateTime, Duration, Utc};
use media_prune_models::{Action, Decision, LibraryEntry, WatchedItem};
use std::collections::HashMap;
use tracing::debug;

#[cfg(test)]
mod tests;

/// Filtering policy for one run. Exclusion tag IDs are resolved once up
/// front and handed in explicitly; the matcher carries no ambient state.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    /// Minimum elapsed days since last watch before a movie is eligible.
    pub threshold_days: u32,
    pub exclusion_tag_ids: std::collections::HashSet<u64>,
}

/// Collapse duplicate reports of the same movie to one item carrying the
/// most recent watch timestamp. First-seen order is preserved.
pub fn dedupe_watched(items: Vec<WatchedItem>) -> Vec<WatchedItem> {
    let mut seen: HashMap<u32, usize> = HashMap::new();
    let mut out: Vec<WatchedItem> = Vec::new();

    for item in items {
        match seen.get(&item.tmdb_id) {
            Some(&idx) => {
                if item.last_watched_at > out[idx].last_watched_at {
                    out[idx] = item;
                }
            }
            None => {
                seen.insert(item.tmdb_id, out.len());
                out.push(item);
            }
        }
    }

    out
}

/// Join watched items to library entries by TMDb ID and assign an action to
/// each. Threshold is checked before tags, so a recently watched movie is
/// reported as skipped-recent even when it is also tag-protected. Titles
/// never participate in matching.
pub fn build_decisions(
    watched: &[WatchedItem],
    entries: &[LibraryEntry],
    policy: &MatchPolicy,
    now: DateTime<Utc>,
) -> Vec<Decision> {
    let by_tmdb: HashMap<u32, &LibraryEntry> =
        entries.iter().map(|e| (e.tmdb_id, e)).collect();
    let threshold = Duration::days(i64::from(policy.threshold_days));

    watched
        .iter()
        .map(|item| {
            let Some(entry) = by_tmdb.get(&item.tmdb_id) else {
                debug!("No library entry for '{}' (tmdb {})", item.title, item.tmdb_id);
                return Decision {
                    watched: item.clone(),
                    entry: None,
                    action: Action::SkipUnmatched,
                };
            };

            let age = now - item.last_watched_at;
            let action = if age < threshold {
                Action::SkipThreshold
            } else if !entry.tag_ids.is_disjoint(&policy.exclusion_tag_ids) {
                Action::SkipTagged
            } else {
                Action::Delete
            };

            Decision {
                watched: item.clone(),
                entry: Some((*entry).clone()),
                action,
            }
        })
        .collect()
}
