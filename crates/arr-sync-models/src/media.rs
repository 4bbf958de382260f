use serde::{Deserialize, Serialize};
use std::fmt;

/// Which library manager a title belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TMDb identifier tagged with the kind of detail page it came from
///
/// Derived from a watch list URL on every run and never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExternalId {
    pub kind: MediaKind,
    pub tmdb_id: u32,
}

impl ExternalId {
    pub fn movie(tmdb_id: u32) -> Self {
        Self { kind: MediaKind::Movie, tmdb_id }
    }

    pub fn series(tmdb_id: u32) -> Self {
        Self { kind: MediaKind::Series, tmdb_id }
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:tmdb:{}", self.kind, self.tmdb_id)
    }
}
