use media_prune_models::{Action, ActionOutcome, Decision};
use media_prune_sources::MovieLibrary;
use tracing::{info, warn};

/// Per-movie results of one processing pass.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(Decision, ActionOutcome)>,
}

impl RunReport {
    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Deleted))
    }

    pub fn partial(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::DeletedNotExcluded(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ActionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Run the delete decisions sequentially: delete the entry and its files,
/// then append the external identifier to the exclusion list. The two calls
/// are independent per movie and nothing spans movies, so one failure never
/// blocks the rest of the list.
pub async fn execute<L: MovieLibrary + ?Sized>(library: &L, decisions: &[Decision]) -> RunReport {
    let mut report = RunReport::default();

    for decision in decisions {
        if decision.action != Action::Delete {
            continue;
        }
        let Some(entry) = &decision.entry else {
            continue;
        };

        info!("Processing '{}' (Radarr ID {})", entry.title, entry.id);

        if let Err(err) = library.delete_movie(entry.id).await {
            warn!("Failed to delete '{}': {}", entry.title, err);
            report
                .outcomes
                .push((decision.clone(), ActionOutcome::Failed(err.to_string())));
            continue;
        }

        let year = entry.year.unwrap_or_else(|| {
            warn!("'{}' has no release year, excluding with year 0", entry.title);
            0
        });

        let outcome = match library
            .add_exclusion(entry.tmdb_id, &entry.title, year)
            .await
        {
            Ok(()) => ActionOutcome::Deleted,
            Err(err) => {
                warn!(
                    "'{}' was deleted but could not be added to the exclusion list: {}",
                    entry.title, err
                );
                ActionOutcome::DeletedNotExcluded(err.to_string())
            }
        };

        report.outcomes.push((decision.clone(), outcome));
    }

    report
}
