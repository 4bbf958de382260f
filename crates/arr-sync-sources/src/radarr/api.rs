use crate::error::SourceError;
use crate::http::ensure_success;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<u32>,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub digital_release: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub quality_profile_id: u32,
    pub tmdb_id: u32,
    pub root_folder_path: String,
    pub monitored: bool,
    pub add_options: AddMovieOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieOptions {
    pub search_for_movie: bool,
}

/// `GET /movie?tmdbId=` - movies in the library with this TMDb id
pub async fn get_movies_by_tmdb_id(
    client: &Client,
    base_url: &str,
    tmdb_id: u32,
) -> Result<Vec<RadarrMovie>, SourceError> {
    let url = format!("{}/movie", base_url);
    debug!("Radarr inventory query: {} tmdbId={}", url, tmdb_id);

    let response = client
        .get(&url)
        .query(&[("tmdbId", tmdb_id)])
        .send()
        .await?;
    let response = ensure_success(response, "Radarr movie query").await?;

    Ok(response.json().await?)
}

/// `GET /movie/lookup/tmdb?tmdbId=` - metadata from Radarr's TMDb cache
pub async fn lookup_movie_by_tmdb_id(
    client: &Client,
    base_url: &str,
    tmdb_id: u32,
) -> Result<Option<RadarrMovie>, SourceError> {
    let url = format!("{}/movie/lookup/tmdb", base_url);
    debug!("Radarr metadata lookup: {} tmdbId={}", url, tmdb_id);

    let response = client
        .get(&url)
        .query(&[("tmdbId", tmdb_id)])
        .send()
        .await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let response = ensure_success(response, "Radarr movie lookup").await?;

    Ok(Some(response.json().await?))
}

/// `POST /movie` - returns the HTTP status and response body
pub async fn add_movie(
    client: &Client,
    base_url: &str,
    request: &AddMovieRequest,
) -> Result<(StatusCode, String), SourceError> {
    let url = format!("{}/movie", base_url);
    debug!("Radarr add: {} tmdbId={}", url, request.tmdb_id);

    let response = client.post(&url).json(request).send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    Ok((status, body))
}
