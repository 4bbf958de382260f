use async_trait::async_trait;
use crate::error::SourceError;

/// A movie as tracked by the movie library manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedMovie {
    pub title: Option<String>,
    pub has_file: bool,
    pub digital_release: Option<String>,
}

/// Metadata the movie library manager knows about an untracked title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    pub title: Option<String>,
    pub digital_release: Option<String>,
}

/// Result of resolving a TMDb id through the series library manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMetadata {
    pub title: String,
    pub tvdb_id: u32,
    pub first_aired: Option<String>,
}

/// A series as tracked by the series library manager
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedSeries {
    pub title: Option<String>,
    pub percent_of_episodes: f64,
}

/// Answer from a library manager to an add request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// HTTP 201
    Added,
    /// Any other status; `message` is the response body
    Rejected { status: u16, message: String },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

/// Movie library manager (Radarr)
#[async_trait]
pub trait MovieLibrary: Send + Sync {
    fn library_name(&self) -> &str;

    /// Inventory query by TMDb id; `None` when the movie is not tracked
    async fn find_movie(&self, tmdb_id: u32) -> Result<Option<TrackedMovie>, SourceError>;

    /// Metadata lookup for a movie that is not tracked yet
    async fn lookup_movie(&self, tmdb_id: u32) -> Result<Option<MovieMetadata>, SourceError>;

    /// Add a movie, monitored, with an immediate search
    async fn add_movie(&self, tmdb_id: u32) -> Result<AddOutcome, SourceError>;
}

/// Series library manager (Sonarr)
#[async_trait]
pub trait SeriesLibrary: Send + Sync {
    fn library_name(&self) -> &str;

    /// Resolve a TMDb id; `None` when the lookup returns no match
    async fn lookup_series(&self, tmdb_id: u32) -> Result<Option<SeriesMetadata>, SourceError>;

    /// Inventory query by TVDb id; `None` when the series is not tracked
    async fn find_series(&self, tvdb_id: u32) -> Result<Option<TrackedSeries>, SourceError>;

    /// Add a series, monitored, searching for missing episodes
    async fn add_series(&self, series: &SeriesMetadata) -> Result<AddOutcome, SourceError>;
}

/// Spreadsheet holding the watch list
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Rows of the given range, in sheet order. Each row holds the raw cell
    /// values and may be empty.
    async fn read_rows(&self, range: &str) -> Result<Vec<Vec<String>>, SourceError>;

    /// Overwrite the given range with raw (unformatted) values
    async fn write_rows(&self, range: &str, rows: &[Vec<String>]) -> Result<(), SourceError>;

    /// Whether the configured credentials allow writing
    fn can_write(&self) -> bool;
}
