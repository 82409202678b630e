use chrono::Utc;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use media_prune_config::{Credentials, PathManager, Settings};
use media_prune_core::{build_decisions, dedupe_watched, execute, Gate, MatchPolicy};
use media_prune_models::{Action, ActionOutcome, Decision, TagMap};
use media_prune_sources::{PlexHttpClient, RadarrHttpClient};
use serde_json::json;

use super::prompts;
use crate::output::{Output, OutputFormat};

pub async fn run_prune(
    days: Option<u32>,
    process: bool,
    yes: bool,
    output: &Output,
) -> Result<()> {
    tracing::debug!("Prune command started");

    // Fatal before any network call: all four collaborator settings are
    // required from the environment.
    let credentials = Credentials::from_env()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration error: {}", e))?;

    let path_manager = PathManager::new()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration error: {}", e))?;
    let settings = Settings::load_or_default(&path_manager.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Configuration error: {}", e))?;

    let threshold_days = days.unwrap_or(settings.default_days);

    let radarr = RadarrHttpClient::new(credentials.radarr_url, credentials.radarr_api_key)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create Radarr client: {}", e))?;
    radarr
        .check_auth()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Radarr authentication check failed: {}", e))?;

    let tag_map = radarr
        .resolve_tags(&settings.exclude_tags)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch Radarr tags: {}", e))?;
    for name in tag_map.unresolved() {
        output.warn(format!(
            "Radarr tag '{}' not found; movies with this tag will NOT be protected",
            name
        ));
    }

    output.info(format!(
        "Searching for movies watched longer than {} days ago in Plex...",
        threshold_days
    ));

    let plex = PlexHttpClient::new(credentials.plex_url, credentials.plex_token)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create Plex client: {}", e))?;
    let watched = plex
        .get_watched_movies(&settings.plex_library)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch watched movies from Plex: {}", e))?;
    let watched = dedupe_watched(watched);

    if watched.is_empty() {
        output.info("No watched movies found in Plex.");
        return Ok(());
    }

    let entries = radarr
        .get_movies()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to fetch movies from Radarr: {}", e))?;

    let policy = MatchPolicy {
        threshold_days,
        exclusion_tag_ids: tag_map.ids(),
    };
    let decisions = build_decisions(&watched, &entries, &policy, Utc::now());

    render_decisions(&decisions, &tag_map, output);

    if !process {
        output.info("Processing is disabled. Use --process to delete and exclude.");
        return Ok(());
    }

    let deletions = decisions
        .iter()
        .filter(|d| d.action == Action::Delete)
        .count();
    if deletions == 0 {
        output.info("Nothing to delete.");
        return Ok(());
    }

    let gate = Gate::Listed.resolve(yes, || {
        prompts::prompt_yes_no(
            &format!(
                "Delete {} movie(s) from Radarr (including files) and add them to the exclusion list?",
                deletions
            ),
            false,
        )
    })
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if gate == Gate::Aborted {
        output.info("Processing cancelled by user.");
        return Ok(());
    }

    let report = execute(&radarr, &decisions).await;
    render_report(&report.outcomes, report.deleted(), report.partial(), report.failed(), output);

    Ok(())
}

fn decision_json(decision: &Decision, tag_map: &TagMap, now: chrono::DateTime<Utc>) -> serde_json::Value {
    let tags: Vec<&str> = decision
        .entry
        .as_ref()
        .map(|e| {
            e.tag_ids
                .iter()
                .filter_map(|id| tag_map.name_for(*id))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "title": decision.watched.title,
        "tmdb_id": decision.watched.tmdb_id,
        "year": decision.watched.year,
        "watched_days_ago": (now - decision.watched.last_watched_at).num_days(),
        "radarr_id": decision.entry.as_ref().map(|e| e.id),
        "exclusion_tags": tags,
        "action": decision.action.label(),
    })
}

fn render_decisions(decisions: &[Decision], tag_map: &TagMap, output: &Output) {
    let now = Utc::now();

    let delete = decisions.iter().filter(|d| d.action == Action::Delete).count();
    let tagged = decisions.iter().filter(|d| d.action == Action::SkipTagged).count();
    let recent = decisions.iter().filter(|d| d.action == Action::SkipThreshold).count();
    let unmatched = decisions.iter().filter(|d| d.action == Action::SkipUnmatched).count();

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Title", "Year", "TMDb", "Watched", "Tags", "Action"]);

            for decision in decisions {
                let tags = decision
                    .entry
                    .as_ref()
                    .map(|e| {
                        e.tag_ids
                            .iter()
                            .filter_map(|id| tag_map.name_for(*id))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();

                table.add_row(vec![
                    Cell::new(&decision.watched.title),
                    Cell::new(
                        decision
                            .watched
                            .year
                            .map(|y| y.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(decision.watched.tmdb_id.to_string()),
                    Cell::new(format!(
                        "{}d ago",
                        (now - decision.watched.last_watched_at).num_days()
                    )),
                    Cell::new(tags),
                    Cell::new(decision.action.label()),
                ]);
            }

            output.println(table.to_string());
            output.info(format!(
                "{} to delete, {} skipped (tagged), {} skipped (recent), {} unmatched",
                delete, tagged, recent, unmatched
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json_decisions: Vec<serde_json::Value> = decisions
                .iter()
                .map(|d| decision_json(d, tag_map, now))
                .collect();
            output.json(&json!({
                "decisions": json_decisions,
                "counts": {
                    "delete": delete,
                    "skipped_tagged": tagged,
                    "skipped_recent": recent,
                    "unmatched": unmatched,
                },
            }));
        }
    }
}

fn render_report(
    outcomes: &[(Decision, ActionOutcome)],
    deleted: usize,
    partial: usize,
    failed: usize,
    output: &Output,
) {
    match output.format() {
        OutputFormat::Human => {
            for (decision, outcome) in outcomes {
                let title = &decision.watched.title;
                match outcome {
                    ActionOutcome::Deleted => {
                        output.success(format!("Deleted and excluded '{}'", title));
                    }
                    ActionOutcome::DeletedNotExcluded(reason) => {
                        output.warn(format!(
                            "Deleted '{}' but exclusion failed: {}",
                            title, reason
                        ));
                    }
                    ActionOutcome::Failed(reason) => {
                        output.error(format!("Failed to delete '{}': {}", title, reason));
                    }
                }
            }
            output.info(format!(
                "Processed {} movie(s): {} deleted, {} partial, {} failed",
                outcomes.len(),
                deleted,
                partial,
                failed
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json_outcomes: Vec<serde_json::Value> = outcomes
                .iter()
                .map(|(decision, outcome)| {
                    let reason = match outcome {
                        ActionOutcome::Deleted => None,
                        ActionOutcome::DeletedNotExcluded(r) | ActionOutcome::Failed(r) => {
                            Some(r.as_str())
                        }
                    };
                    json!({
                        "title": decision.watched.title,
                        "tmdb_id": decision.watched.tmdb_id,
                        "outcome": outcome.label(),
                        "reason": reason,
                    })
                })
                .collect();

            output.json(&json!({
                "outcomes": json_outcomes,
                "counts": {
                    "deleted": deleted,
                    "partial": partial,
                    "failed": failed,
                },
            }));
        }
    }
}
