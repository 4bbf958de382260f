use crate::SyncStatus;
use serde::Serialize;

/// Status and date pair written back next to a watch list row
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct OutputRow {
    pub status: Option<SyncStatus>,
    pub date: String,
}

impl OutputRow {
    pub fn new(status: SyncStatus, date: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            date: date.into(),
        }
    }

    /// Row for blank or unrecognised input, written as two empty cells
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.status.is_none() && self.date.is_empty()
    }

    pub fn status_label(&self) -> String {
        self.status.map(|s| s.label()).unwrap_or_default()
    }

    /// Cell values in sheet column order
    pub fn to_cells(&self) -> Vec<String> {
        vec![self.status_label(), self.date.clone()]
    }
}
