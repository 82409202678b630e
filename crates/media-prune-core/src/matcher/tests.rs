use super::*;
use chrono::TimeZone;
use media_prune_models::{Action, LibraryEntry, WatchedItem};

fn create_watched(tmdb_id: u32, title: &str, days_ago: i64) -> WatchedItem {
    WatchedItem {
        tmdb_id,
        title: title.to_string(),
        year: Some(1999),
        last_watched_at: now() - Duration::days(days_ago),
    }
}

fn create_entry(id: u64, tmdb_id: u32, title: &str, tags: &[u64]) -> LibraryEntry {
    LibraryEntry {
        id,
        tmdb_id,
        title: title.to_string(),
        year: Some(1999),
        tag_ids: tags.iter().copied().collect(),
        has_file: true,
        path: Some(format!("/movies/{}", title)),
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn policy(threshold_days: u32, exclusion_ids: &[u64]) -> MatchPolicy {
    MatchPolicy {
        threshold_days,
        exclusion_tag_ids: exclusion_ids.iter().copied().collect(),
    }
}

#[test]
fn test_untagged_past_threshold_is_delete() {
    let watched = vec![create_watched(603, "The Matrix", 10)];
    let entries = vec![create_entry(42, 603, "The Matrix", &[])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[1]), now());
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].action, Action::Delete);
    assert_eq!(decisions[0].entry.as_ref().unwrap().id, 42);
}

#[test]
fn test_exclusion_tag_protects() {
    let watched = vec![create_watched(603, "The Matrix", 10)];
    let entries = vec![create_entry(42, 603, "The Matrix", &[1])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[1]), now());
    assert_eq!(decisions[0].action, Action::SkipTagged);
}

#[test]
fn test_unrelated_tags_do_not_protect() {
    let watched = vec![create_watched(603, "The Matrix", 10)];
    let entries = vec![create_entry(42, 603, "The Matrix", &[9, 12])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[1, 5]), now());
    assert_eq!(decisions[0].action, Action::Delete);
}

#[test]
fn test_recent_watch_is_skip_threshold() {
    let watched = vec![create_watched(603, "The Matrix", 1)];
    let entries = vec![create_entry(42, 603, "The Matrix", &[])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[]), now());
    assert_eq!(decisions[0].action, Action::SkipThreshold);
}

#[test]
fn test_threshold_checked_before_tags() {
    // Recently watched AND tag-protected: reported as skipped-recent.
    let watched = vec![create_watched(603, "The Matrix", 1)];
    let entries = vec![create_entry(42, 603, "The Matrix", &[1])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[1]), now());
    assert_eq!(decisions[0].action, Action::SkipThreshold);
}

#[test]
fn test_age_exactly_at_threshold_is_eligible() {
    let watched = vec![create_watched(603, "The Matrix", 3)];
    let entries = vec![create_entry(42, 603, "The Matrix", &[])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[]), now());
    assert_eq!(decisions[0].action, Action::Delete);
}

#[test]
fn test_unmatched_watched_item_is_reported() {
    let watched = vec![create_watched(603, "The Matrix", 10)];
    let entries = vec![create_entry(42, 604, "The Matrix Reloaded", &[])];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[]), now());
    assert_eq!(decisions[0].action, Action::SkipUnmatched);
    assert!(decisions[0].entry.is_none());
}

#[test]
fn test_matching_ignores_titles() {
    // Two entries share a title; only the external ID decides the match.
    let watched = vec![create_watched(603, "The Matrix", 10)];
    let entries = vec![
        create_entry(1, 999, "The Matrix", &[]),
        create_entry(2, 603, "The Matrix", &[]),
    ];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[]), now());
    assert_eq!(decisions[0].entry.as_ref().unwrap().id, 2);
    assert_eq!(decisions[0].action, Action::Delete);
}

#[test]
fn test_library_only_entries_are_never_acted_upon() {
    let watched = vec![create_watched(603, "The Matrix", 10)];
    let entries = vec![
        create_entry(42, 603, "The Matrix", &[]),
        create_entry(43, 700, "Never Watched", &[]),
    ];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[]), now());
    // One decision per watched item; the library-only entry produces nothing.
    assert_eq!(decisions.len(), 1);
}

#[test]
fn test_decisions_preserve_watched_order() {
    let watched = vec![
        create_watched(603, "The Matrix", 10),
        create_watched(604, "The Matrix Reloaded", 1),
        create_watched(605, "The Matrix Revolutions", 10),
    ];
    let entries = vec![
        create_entry(3, 605, "The Matrix Revolutions", &[]),
        create_entry(1, 603, "The Matrix", &[]),
    ];

    let decisions = build_decisions(&watched, &entries, &policy(3, &[]), now());
    let ids: Vec<u32> = decisions.iter().map(|d| d.watched.tmdb_id).collect();
    assert_eq!(ids, vec![603, 604, 605]);
    assert_eq!(decisions[1].action, Action::SkipThreshold);
}

#[test]
fn test_dedupe_keeps_most_recent_watch() {
    let items = vec![
        create_watched(603, "The Matrix", 30),
        create_watched(604, "The Matrix Reloaded", 5),
        create_watched(603, "The Matrix", 2),
    ];

    let deduped = dedupe_watched(items);
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].tmdb_id, 603);
    assert_eq!(deduped[0].last_watched_at, now() - Duration::days(2));
    assert_eq!(deduped[1].tmdb_id, 604);
}

#[test]
fn test_dedupe_ignores_older_duplicate() {
    let items = vec![
        create_watched(603, "The Matrix", 2),
        create_watched(603, "The Matrix", 30),
    ];

    let deduped = dedupe_watched(items);
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].last_watched_at, now() - Duration::days(2));
}
