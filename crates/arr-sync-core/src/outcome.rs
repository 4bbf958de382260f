use arr_sync_models::{OutputRow, SyncStatus};

/// What a reconciler decided for one title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub row: OutputRow,
    /// An add request was accepted by the library manager
    pub added: bool,
}

impl Reconciliation {
    pub fn tracked(status: SyncStatus, date: String) -> Self {
        Self {
            row: OutputRow::new(status, date),
            added: false,
        }
    }

    pub fn added(date: String) -> Self {
        Self {
            row: OutputRow::new(SyncStatus::Monitored, date),
            added: true,
        }
    }

    pub fn failed_to_add(date: String) -> Self {
        Self::tracked(SyncStatus::FailedToAdd, date)
    }

    pub fn would_add(date: String) -> Self {
        Self::tracked(SyncStatus::WouldAdd, date)
    }

    pub fn not_found() -> Self {
        Self::tracked(SyncStatus::NotFound, String::new())
    }

    pub fn error() -> Self {
        Self::tracked(SyncStatus::Error, String::new())
    }

    pub fn status(&self) -> Option<SyncStatus> {
        self.row.status
    }

    pub fn date(&self) -> &str {
        &self.row.date
    }
}
