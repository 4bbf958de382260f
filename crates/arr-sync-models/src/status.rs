use serde::{Serialize, Serializer};
use std::fmt;

/// Presence of a title in a library manager, as seen during one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LibraryEntry {
    /// Not tracked yet, an add request is due
    Absent,
    /// Tracked, nothing downloaded
    Monitored,
    /// Tracked series with some episodes on disk (percentage of episodes)
    Partial(f64),
    /// Tracked and fully on disk
    Downloaded,
}

impl LibraryEntry {
    /// Map a tracked series' episode completion to an entry
    pub fn from_episode_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            LibraryEntry::Downloaded
        } else if percent > 0.0 {
            LibraryEntry::Partial(percent)
        } else {
            LibraryEntry::Monitored
        }
    }

    /// Status label for a title the library already knows about
    ///
    /// Returns `None` for [`LibraryEntry::Absent`], whose status depends on
    /// the outcome of the add request.
    pub fn status(&self) -> Option<SyncStatus> {
        match self {
            LibraryEntry::Absent => None,
            LibraryEntry::Monitored => Some(SyncStatus::Monitored),
            // Ties go to the even percentage: 12.5% of episodes reads as 12%
            LibraryEntry::Partial(pct) => Some(SyncStatus::Partial(pct.round_ties_even() as u32)),
            LibraryEntry::Downloaded => Some(SyncStatus::Downloaded),
        }
    }
}

/// Status label written to the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStatus {
    Downloaded,
    Monitored,
    /// Rounded percentage of episodes on disk
    Partial(u32),
    NotFound,
    FailedToAdd,
    /// An inventory or lookup query failed
    Error,
    /// Dry run: the title would have been added
    WouldAdd,
}

impl SyncStatus {
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Label without the percentage, for grouping counts
    pub fn category(&self) -> &'static str {
        match self {
            SyncStatus::Downloaded => "Downloaded",
            SyncStatus::Monitored => "Monitored",
            SyncStatus::Partial(_) => "Partial",
            SyncStatus::NotFound => "Not Found",
            SyncStatus::FailedToAdd => "Failed to Add",
            SyncStatus::Error => "Error",
            SyncStatus::WouldAdd => "Would Add",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Partial(pct) => write!(f, "Partial ({}%)", pct),
            other => f.write_str(other.category()),
        }
    }
}

impl Serialize for SyncStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
