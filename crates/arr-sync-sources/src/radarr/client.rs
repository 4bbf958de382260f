use crate::error::SourceError;
use crate::http::{create_api_client, normalize_base_url};
use crate::radarr::api::{self, AddMovieOptions, AddMovieRequest};
use crate::traits::{AddOutcome, MovieLibrary, MovieMetadata, TrackedMovie};
use arr_sync_config::{HttpConfig, LibraryConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub struct RadarrClient {
    client: Client,
    base_url: String,
    quality_profile: u32,
    root_folder_path: String,
}

impl RadarrClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        quality_profile: u32,
        root_folder_path: String,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: create_api_client(api_key, timeout)?,
            base_url: normalize_base_url(base_url),
            quality_profile,
            root_folder_path,
        })
    }

    pub fn from_config(library: &LibraryConfig, http: &HttpConfig) -> Result<Self, SourceError> {
        Self::new(
            &library.url,
            &library.api_key,
            library.quality_profile,
            library.root_folder_path.clone(),
            Duration::from_secs(http.timeout_secs),
        )
    }
}

#[async_trait]
impl MovieLibrary for RadarrClient {
    fn library_name(&self) -> &str {
        "radarr"
    }

    async fn find_movie(&self, tmdb_id: u32) -> Result<Option<TrackedMovie>, SourceError> {
        let movies = api::get_movies_by_tmdb_id(&self.client, &self.base_url, tmdb_id).await?;
        Ok(movies.into_iter().next().map(|movie| TrackedMovie {
            title: movie.title,
            has_file: movie.has_file,
            digital_release: movie.digital_release,
        }))
    }

    async fn lookup_movie(&self, tmdb_id: u32) -> Result<Option<MovieMetadata>, SourceError> {
        let movie = api::lookup_movie_by_tmdb_id(&self.client, &self.base_url, tmdb_id).await?;
        Ok(movie.map(|movie| MovieMetadata {
            title: movie.title,
            digital_release: movie.digital_release,
        }))
    }

    async fn add_movie(&self, tmdb_id: u32) -> Result<AddOutcome, SourceError> {
        let request = AddMovieRequest {
            quality_profile_id: self.quality_profile,
            tmdb_id,
            root_folder_path: self.root_folder_path.clone(),
            monitored: true,
            add_options: AddMovieOptions { search_for_movie: true },
        };

        let (status, body) = api::add_movie(&self.client, &self.base_url, &request).await?;
        debug!("Radarr add response for tmdbId {}: {} {}", tmdb_id, status, body);

        if status == StatusCode::CREATED {
            Ok(AddOutcome::Added)
        } else {
            Ok(AddOutcome::Rejected {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
