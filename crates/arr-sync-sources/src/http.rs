use crate::error::SourceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use std::time::Duration;

const USER_AGENT: &str = concat!("arrsheets/", env!("CARGO_PKG_VERSION"));

/// Build a client for Radarr/Sonarr with the API key sent on every request
pub fn create_api_client(api_key: &str, timeout: Duration) -> Result<Client, SourceError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_str(api_key)
            .map_err(|_| SourceError::Config("API key contains invalid header characters".to_string()))?,
    );

    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

/// Client without default credentials, for Google endpoints
pub fn create_client(timeout: Duration) -> Result<Client, SourceError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Turn a non-2xx response into [`SourceError::Status`]
pub async fn ensure_success(response: Response, context: &str) -> Result<Response, SourceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        context: context.to_string(),
        status,
        body,
    })
}

/// Strip trailing slashes so paths can be appended with `/`
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
