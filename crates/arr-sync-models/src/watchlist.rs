use serde::{Deserialize, Serialize};

/// One cell of the watch list column
///
/// Rows carry no identity beyond their position in the sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchListRow {
    pub url: Option<String>,
}

impl WatchListRow {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()) }
    }

    pub fn blank() -> Self {
        Self { url: None }
    }

    /// Build a row from the raw cells the sheet returned for it
    ///
    /// Only the first cell is considered; an empty row or an empty first cell
    /// both read as blank.
    pub fn from_cells(cells: &[String]) -> Self {
        match cells.first() {
            Some(cell) if !cell.trim().is_empty() => Self::new(cell.trim()),
            _ => Self::blank(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.url.is_none()
    }
}
