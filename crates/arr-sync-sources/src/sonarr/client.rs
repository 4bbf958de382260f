use crate::error::SourceError;
use crate::http::{create_api_client, normalize_base_url};
use crate::sonarr::api::{self, AddSeriesOptions, AddSeriesRequest};
use crate::traits::{AddOutcome, SeriesLibrary, SeriesMetadata, TrackedSeries};
use arr_sync_config::{HttpConfig, LibraryConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub struct SonarrClient {
    client: Client,
    base_url: String,
    quality_profile: u32,
    root_folder_path: String,
}

impl SonarrClient {
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
impl SeriesLibrary for SonarrClient {
    fn library_name(&self) -> &str {
        "sonarr"
    }

    async fn lookup_series(&self, tmdb_id: u32) -> Result<Option<SeriesMetadata>, SourceError> {
        let results = api::lookup_series_by_tmdb_id(&self.client, &self.base_url, tmdb_id).await?;
        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        // Sonarr keys series by TVDb id; a result without one cannot be tracked
        match first.tvdb_id.filter(|id| *id > 0) {
            Some(tvdb_id) => Ok(Some(SeriesMetadata {
                title: first.title.unwrap_or_default(),
                tvdb_id,
                first_aired: first.first_aired,
            })),
            None => {
                warn!("Sonarr lookup for tmdbId {} returned a result without a tvdbId", tmdb_id);
                Ok(None)
            }
        }
    }

    async fn find_series(&self, tvdb_id: u32) -> Result<Option<TrackedSeries>, SourceError> {
        let series = api::get_series_by_tvdb_id(&self.client, &self.base_url, tvdb_id).await?;
        Ok(series.into_iter().next().map(|s| TrackedSeries {
            title: s.title,
            percent_of_episodes: s
                .statistics
                .and_then(|stats| stats.percent_of_episodes)
                .unwrap_or(0.0),
        }))
    }

    async fn add_series(&self, series: &SeriesMetadata) -> Result<AddOutcome, SourceError> {
        let request = AddSeriesRequest {
            title: series.title.clone(),
            quality_profile_id: self.quality_profile,
            tvdb_id: series.tvdb_id,
            root_folder_path: self.root_folder_path.clone(),
            monitored: true,
            add_options: AddSeriesOptions {
                search_for_missing_episodes: true,
            },
        };

        let (status, body) = api::add_series(&self.client, &self.base_url, &request).await?;
        debug!("Sonarr add response for tvdbId {}: {} {}", series.tvdb_id, status, body);

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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SonarrClient {
        SonarrClient::new(
            &format!("{}/api/v3", server.uri()),
            "sonarr-key",
            6,
            "/tv".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series/lookup"))
            .and(query_param("term", "tmdb:1399"))
            .and(header("X-Api-Key", "sonarr-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"title": "Game of Thrones", "tvdbId": 121361, "firstAired": "2011-04-17T00:00:00Z"},
                {"title": "Other", "tvdbId": 1}
            ])))
            .mount(&server)
            .await;

        let series = client(&server).lookup_series(1399).await.unwrap().unwrap();
        assert_eq!(
            series,
            SeriesMetadata {
                title: "Game of Thrones".to_string(),
                tvdb_id: 121361,
                first_aired: Some("2011-04-17T00:00:00Z".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_series_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(client(&server).lookup_series(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_series_without_tvdb_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"title": "Web Only"}])))
            .mount(&server)
            .await;

        assert!(client(&server).lookup_series(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_series_statistics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series"))
            .and(query_param("tvdbId", "121361"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"title": "Game of Thrones", "tvdbId": 121361, "statistics": {"percentOfEpisodes": 45.6}}
            ])))
            .mount(&server)
            .await;

        let series = client(&server).find_series(121361).await.unwrap().unwrap();
        assert_eq!(series.percent_of_episodes, 45.6);
    }

    #[tokio::test]
    async fn test_find_series_missing_statistics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"title": "New Show", "tvdbId": 7}])))
            .mount(&server)
            .await;

        let series = client(&server).find_series(7).await.unwrap().unwrap();
        assert_eq!(series.percent_of_episodes, 0.0);
    }

    #[tokio::test]
    async fn test_add_series_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/series"))
            .and(body_json(json!({
                "title": "Game of Thrones",
                "qualityProfileId": 6,
                "tvdbId": 121361,
                "rootFolderPath": "/tv",
                "monitored": true,
                "addOptions": {"searchForMissingEpisodes": true}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
            .expect(1)
            .mount(&server)
            .await;

        let metadata = SeriesMetadata {
            title: "Game of Thrones".to_string(),
            tvdb_id: 121361,
            first_aired: None,
        };
        assert!(client(&server).add_series(&metadata).await.unwrap().is_added());
    }

    #[tokio::test]
    async fn test_add_series_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/series"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let metadata = SeriesMetadata {
            title: "Game of Thrones".to_string(),
            tvdb_id: 121361,
            first_aired: None,
        };
        let outcome = client(&server).add_series(&metadata).await.unwrap();
        assert!(matches!(outcome, AddOutcome::Rejected { status: 409, .. }));
    }
}
