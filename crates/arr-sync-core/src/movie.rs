use crate::outcome::Reconciliation;
use arr_sync_models::{truncate_date, SyncStatus};
use arr_sync_sources::{AddOutcome, MovieLibrary};
use tracing::{info, instrument, warn};

/// Brings one movie in line with the movie library manager
pub struct MovieReconciler<'a> {
    library: &'a dyn MovieLibrary,
    dry_run: bool,
}

impl<'a> MovieReconciler<'a> {
    pub fn new(library: &'a dyn MovieLibrary) -> Self {
        Self { library, dry_run: false }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[instrument(skip(self), fields(library = self.library.library_name()))]
    pub async fn reconcile(&self, tmdb_id: u32) -> Reconciliation {
        let tracked = match self.library.find_movie(tmdb_id).await {
            Ok(tracked) => tracked,
            Err(e) => {
                warn!("Movie {} could not be queried: {}", tmdb_id, e);
                return Reconciliation::error();
            }
        };

        if let Some(movie) = tracked {
            let status = if movie.has_file {
                SyncStatus::Downloaded
            } else {
                SyncStatus::Monitored
            };
            info!("Movie {} already tracked ({})", tmdb_id, status);
            return Reconciliation::tracked(status, truncate_date(movie.digital_release.as_deref()));
        }

        // The date comes from the lookup so it is known even if the add fails
        let date = match self.library.lookup_movie(tmdb_id).await {
            Ok(Some(metadata)) => truncate_date(metadata.digital_release.as_deref()),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Metadata lookup for movie {} failed: {}", tmdb_id, e);
                String::new()
            }
        };

        if self.dry_run {
            info!("Would add movie {}", tmdb_id);
            return Reconciliation::would_add(date);
        }

        match self.library.add_movie(tmdb_id).await {
            Ok(AddOutcome::Added) => {
                info!("Added movie {}", tmdb_id);
                Reconciliation::added(date)
            }
            Ok(AddOutcome::Rejected { status, message }) => {
                warn!("Adding movie {} was rejected ({}): {}", tmdb_id, status, message);
                Reconciliation::failed_to_add(date)
            }
            Err(e) => {
                warn!("Adding movie {} failed: {}", tmdb_id, e);
                Reconciliation::failed_to_add(date)
            }
        }
    }
}
