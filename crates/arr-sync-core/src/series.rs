use crate::outcome::Reconciliation;
use arr_sync_models::{truncate_date, LibraryEntry};
use arr_sync_sources::{AddOutcome, SeriesLibrary};
use tracing::{info, instrument, warn};

/// Brings one series in line with the series library manager
///
/// Series are addressed by TVDb id in the library, so every title goes
/// through a lookup first. The lookup also supplies the first-aired date,
/// which is reported whatever happens afterwards.
pub struct SeriesReconciler<'a> {
    library: &'a dyn SeriesLibrary,
    dry_run: bool,
}

impl<'a> SeriesReconciler<'a> {
    pub fn new(library: &'a dyn SeriesLibrary) -> Self {
        Self { library, dry_run: false }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[instrument(skip(self), fields(library = self.library.library_name()))]
    pub async fn reconcile(&self, tmdb_id: u32) -> Reconciliation {
        let metadata = match self.library.lookup_series(tmdb_id).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                warn!("Series {} not found by lookup", tmdb_id);
                return Reconciliation::not_found();
            }
            Err(e) => {
                warn!("Lookup for series {} failed: {}", tmdb_id, e);
                return Reconciliation::error();
            }
        };
        let date = truncate_date(metadata.first_aired.as_deref());

        let entry = match self.library.find_series(metadata.tvdb_id).await {
            Ok(Some(series)) => LibraryEntry::from_episode_percent(series.percent_of_episodes),
            Ok(None) => LibraryEntry::Absent,
            Err(e) => {
                warn!("Series {} (tvdb {}) could not be queried: {}", tmdb_id, metadata.tvdb_id, e);
                return Reconciliation::error();
            }
        };

        if let Some(status) = entry.status() {
            info!("Series '{}' already tracked ({})", metadata.title, status);
            return Reconciliation::tracked(status, date);
        }

        if self.dry_run {
            info!("Would add series '{}'", metadata.title);
            return Reconciliation::would_add(date);
        }

        match self.library.add_series(&metadata).await {
            Ok(AddOutcome::Added) => {
                info!("Added series '{}' (tvdb {})", metadata.title, metadata.tvdb_id);
                Reconciliation::added(date)
            }
            Ok(AddOutcome::Rejected { status, message }) => {
                warn!("Adding series '{}' was rejected ({}): {}", metadata.title, status, message);
                Reconciliation::failed_to_add(date)
            }
            Err(e) => {
                warn!("Adding series '{}' failed: {}", metadata.title, e);
                Reconciliation::failed_to_add(date)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeSeriesLibrary;
    use arr_sync_models::SyncStatus;

    fn game_of_thrones() -> FakeSeriesLibrary {
        FakeSeriesLibrary::default().with_lookup(1399, 121361, "Game of Thrones", Some("2011-04-17T01:00:00Z"))
    }

    #[tokio::test]
    async fn test_partial_series_rounds_percentage() {
        let library = game_of_thrones().with_series(121361, 45.6);
        let result = SeriesReconciler::new(&library).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::Partial(46)));
        assert_eq!(result.row.status_label(), "Partial (46%)");
        assert_eq!(result.date(), "2011-04-17");
        assert!(library.add_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_boundaries() {
        let complete = game_of_thrones().with_series(121361, 100.0);
        let result = SeriesReconciler::new(&complete).reconcile(1399).await;
        assert_eq!(result.status(), Some(SyncStatus::Downloaded));

        let empty = game_of_thrones().with_series(121361, 0.0);
        let result = SeriesReconciler::new(&empty).reconcile(1399).await;
        assert_eq!(result.status(), Some(SyncStatus::Monitored));
    }

    #[tokio::test]
    async fn test_lookup_miss_is_not_found_without_add() {
        let library = FakeSeriesLibrary::default();
        let result = SeriesReconciler::new(&library).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::NotFound));
        assert_eq!(result.date(), "");
        assert!(library.add_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_absent_series_is_added_from_lookup() {
        let library = game_of_thrones();
        let result = SeriesReconciler::new(&library).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::Monitored));
        assert_eq!(result.date(), "2011-04-17");
        assert!(result.added);

        let calls = library.add_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tvdb_id, 121361);
        assert_eq!(calls[0].title, "Game of Thrones");
    }

    #[tokio::test]
    async fn test_rejected_add_keeps_first_aired() {
        let mut library = game_of_thrones();
        library.add_status = 400;
        let result = SeriesReconciler::new(&library).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::FailedToAdd));
        assert_eq!(result.date(), "2011-04-17");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_error() {
        let library = FakeSeriesLibrary {
            fail_lookups: true,
            ..Default::default()
        };
        let result = SeriesReconciler::new(&library).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::Error));
        assert_eq!(result.date(), "");
    }

    #[tokio::test]
    async fn test_inventory_failure_is_error_without_add() {
        let mut library = game_of_thrones();
        library.fail_queries = true;
        let result = SeriesReconciler::new(&library).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::Error));
        assert_eq!(result.date(), "");
        assert!(!result.added);
        assert!(library.add_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_reports_would_add() {
        let library = game_of_thrones();
        let result = SeriesReconciler::new(&library).with_dry_run(true).reconcile(1399).await;

        assert_eq!(result.status(), Some(SyncStatus::WouldAdd));
        assert_eq!(result.date(), "2011-04-17");
        assert!(library.add_calls.lock().unwrap().is_empty());
    }
}
