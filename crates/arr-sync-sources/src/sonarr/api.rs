use crate::error::SourceError;
use crate::http::ensure_success;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeries {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tvdb_id: Option<u32>,
    #[serde(default)]
    pub first_aired: Option<String>,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    #[serde(default)]
    pub percent_of_episodes: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSeriesRequest {
    pub title: String,
    pub quality_profile_id: u32,
    pub tvdb_id: u32,
    pub root_folder_path: String,
    pub monitored: bool,
    pub add_options: AddSeriesOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSeriesOptions {
    pub search_for_missing_episodes: bool,
}

/// `GET /series/lookup?term=tmdb:<id>` - resolve a TMDb id
pub async fn lookup_series_by_tmdb_id(
    client: &Client,
    base_url: &str,
    tmdb_id: u32,
) -> Result<Vec<SonarrSeries>, SourceError> {
    let url = format!("{}/series/lookup", base_url);
    let term = format!("tmdb:{}", tmdb_id);
    debug!("Sonarr lookup: {} term={}", url, term);

    let response = client
        .get(&url)
        .query(&[("term", term.as_str())])
        .send()
        .await?;
    let response = ensure_success(response, "Sonarr series lookup").await?;

    Ok(response.json().await?)
}

/// `GET /series?tvdbId=` - series in the library with this TVDb id
pub async fn get_series_by_tvdb_id(
    client: &Client,
    base_url: &str,
    tvdb_id: u32,
) -> Result<Vec<SonarrSeries>, SourceError> {
    let url = format!("{}/series", base_url);
    debug!("Sonarr inventory query: {} tvdbId={}", url, tvdb_id);

    let response = client
        .get(&url)
        .query(&[("tvdbId", tvdb_id)])
        .send()
        .await?;
    let response = ensure_success(response, "Sonarr series query").await?;

    Ok(response.json().await?)
}

/// `POST /series` - returns the HTTP status and response body
pub async fn add_series(
    client: &Client,
    base_url: &str,
    request: &AddSeriesRequest,
) -> Result<(StatusCode, String), SourceError> {
    let url = format!("{}/series", base_url);
    debug!("Sonarr add: {} tvdbId={}", url, request.tvdb_id);

    let response = client.post(&url).json(request).send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    Ok((status, body))
}
