//! In-memory stand-ins for the external clients, used by the unit tests.

use arr_sync_sources::{
    AddOutcome, MovieLibrary, MovieMetadata, SeriesLibrary, SeriesMetadata, SheetStore, SourceError, TrackedMovie,
    TrackedSeries,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn server_error(context: &str) -> SourceError {
    SourceError::Status {
        context: context.to_string(),
        status: 500,
        body: "internal error".to_string(),
    }
}

fn outcome(status: u16) -> AddOutcome {
    if status == 201 {
        AddOutcome::Added
    } else {
        AddOutcome::Rejected {
            status,
            message: "rejected".to_string(),
        }
    }
}

pub struct FakeMovieLibrary {
    pub movies: HashMap<u32, TrackedMovie>,
    pub lookups: HashMap<u32, MovieMetadata>,
    pub add_status: u16,
    pub fail_queries: bool,
    pub fail_lookups: bool,
    pub add_calls: Arc<Mutex<Vec<u32>>>,
}

impl Default for FakeMovieLibrary {
    fn default() -> Self {
        Self {
            movies: HashMap::new(),
            lookups: HashMap::new(),
            add_status: 201,
            fail_queries: false,
            fail_lookups: false,
            add_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeMovieLibrary {
    pub fn with_movie(mut self, tmdb_id: u32, has_file: bool, digital_release: Option<&str>) -> Self {
        self.movies.insert(
            tmdb_id,
            TrackedMovie {
                title: None,
                has_file,
                digital_release: digital_release.map(str::to_string),
            },
        );
        self
    }

    pub fn with_lookup(mut self, tmdb_id: u32, digital_release: Option<&str>) -> Self {
        self.lookups.insert(
            tmdb_id,
            MovieMetadata {
                title: None,
                digital_release: digital_release.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl MovieLibrary for FakeMovieLibrary {
    fn library_name(&self) -> &str {
        "fake-radarr"
    }

    async fn find_movie(&self, tmdb_id: u32) -> Result<Option<TrackedMovie>, SourceError> {
        if self.fail_queries {
            return Err(server_error("movie query"));
        }
        Ok(self.movies.get(&tmdb_id).cloned())
    }

    async fn lookup_movie(&self, tmdb_id: u32) -> Result<Option<MovieMetadata>, SourceError> {
        if self.fail_lookups {
            return Err(server_error("movie lookup"));
        }
        Ok(self.lookups.get(&tmdb_id).cloned())
    }

    async fn add_movie(&self, tmdb_id: u32) -> Result<AddOutcome, SourceError> {
        self.add_calls.lock().unwrap().push(tmdb_id);
        Ok(outcome(self.add_status))
    }
}

pub struct FakeSeriesLibrary {
    /// Keyed by TMDb id
    pub lookups: HashMap<u32, SeriesMetadata>,
    /// Keyed by TVDb id
    pub series: HashMap<u32, TrackedSeries>,
    pub add_status: u16,
    pub fail_lookups: bool,
    pub fail_queries: bool,
    pub add_calls: Arc<Mutex<Vec<SeriesMetadata>>>,
}

impl Default for FakeSeriesLibrary {
    fn default() -> Self {
        Self {
            lookups: HashMap::new(),
            series: HashMap::new(),
            add_status: 201,
            fail_lookups: false,
            fail_queries: false,
            add_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeSeriesLibrary {
    pub fn with_lookup(mut self, tmdb_id: u32, tvdb_id: u32, title: &str, first_aired: Option<&str>) -> Self {
        self.lookups.insert(
            tmdb_id,
            SeriesMetadata {
                title: title.to_string(),
                tvdb_id,
                first_aired: first_aired.map(str::to_string),
            },
        );
        self
    }

    pub fn with_series(mut self, tvdb_id: u32, percent_of_episodes: f64) -> Self {
        self.series.insert(
            tvdb_id,
            TrackedSeries {
                title: None,
                percent_of_episodes,
            },
        );
        self
    }
}

#[async_trait]
impl SeriesLibrary for FakeSeriesLibrary {
    fn library_name(&self) -> &str {
        "fake-sonarr"
    }

    async fn lookup_series(&self, tmdb_id: u32) -> Result<Option<SeriesMetadata>, SourceError> {
        if self.fail_lookups {
            return Err(server_error("series lookup"));
        }
        Ok(self.lookups.get(&tmdb_id).cloned())
    }

    async fn find_series(&self, tvdb_id: u32) -> Result<Option<TrackedSeries>, SourceError> {
        if self.fail_queries {
            return Err(server_error("series query"));
        }
        Ok(self.series.get(&tvdb_id).cloned())
    }

    async fn add_series(&self, series: &SeriesMetadata) -> Result<AddOutcome, SourceError> {
        self.add_calls.lock().unwrap().push(series.clone());
        Ok(outcome(self.add_status))
    }
}

pub struct FakeSheet {
    pub rows: Vec<Vec<String>>,
    pub fail_read: bool,
    /// HTTP status returned by writes, `None` for success
    pub write_error: Option<u16>,
    pub writable: bool,
    pub writes: Arc<Mutex<Vec<(String, Vec<Vec<String>>)>>>,
}

impl FakeSheet {
    pub fn with_urls(urls: &[&str]) -> Self {
        Self {
            rows: urls
                .iter()
                .map(|url| if url.is_empty() { Vec::new() } else { vec![url.to_string()] })
                .collect(),
            fail_read: false,
            write_error: None,
            writable: true,
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SheetStore for FakeSheet {
    async fn read_rows(&self, _range: &str) -> Result<Vec<Vec<String>>, SourceError> {
        if self.fail_read {
            return Err(server_error("Sheet read"));
        }
        Ok(self.rows.clone())
    }

    async fn write_rows(&self, range: &str, rows: &[Vec<String>]) -> Result<(), SourceError> {
        if let Some(status) = self.write_error {
            return Err(SourceError::Status {
                context: "Sheet write".to_string(),
                status,
                body: String::new(),
            });
        }
        self.writes.lock().unwrap().push((range.to_string(), rows.to_vec()));
        Ok(())
    }

    fn can_write(&self) -> bool {
        self.writable
    }
}
