use crate::error::SourceError;
use crate::http::{create_client, ensure_success, normalize_base_url};
use crate::sheets::auth::{self, AccessToken};
use crate::traits::SheetStore;
use arr_sync_config::{Config, ServiceAccountKey, SheetAuth};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

enum Credentials {
    /// Read-only
    ApiKey(String),
    ServiceAccount {
        key: ServiceAccountKey,
        token: Mutex<AccessToken>,
    },
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeUpdate<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Vec<String>],
}

/// Google Sheets v4 values client for a single spreadsheet
pub struct GoogleSheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    credentials: Credentials,
}

impl GoogleSheetsClient {
    /// Connect using the configured auth mode. A service account key is
    /// exchanged for a token immediately so bad credentials fail up front.
    pub async fn connect(config: &Config) -> Result<Self, SourceError> {
        let auth = config
            .sheet_auth()
            .map_err(|e| SourceError::Config(e.to_string()))?;
        Self::connect_with_base_url(
            SHEETS_BASE_URL,
            &config.google.spreadsheet_id,
            &auth,
            Duration::from_secs(config.http.timeout_secs),
        )
        .await
    }

    pub async fn connect_with_base_url(
        base_url: &str,
        spreadsheet_id: &str,
        auth: &SheetAuth,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = create_client(timeout)?;
        let credentials = match auth {
            SheetAuth::ApiKey(key) => {
                info!("Using Google API key (read-only sheet access)");
                Credentials::ApiKey(key.clone())
            }
            SheetAuth::ServiceAccount(path) => {
                let key = ServiceAccountKey::load(path).map_err(|e| SourceError::Auth(format!("{:#}", e)))?;
                let token = auth::exchange_token(&client, &key).await?;
                Credentials::ServiceAccount {
                    key,
                    token: Mutex::new(token),
                }
            }
        };

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            spreadsheet_id: spreadsheet_id.to_string(),
            credentials,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, SourceError> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            Credentials::ServiceAccount { key, token } => {
                let mut token = token.lock().await;
                if token.is_expiring(Utc::now()) {
                    debug!("Google access token expiring, requesting a new one");
                    *token = auth::exchange_token(&self.client, key).await?;
                }
                Ok(request.bearer_auth(&token.token))
            }
        }
    }
}

// reqwest errors print the request URL, which carries the API key in `key=`
fn without_url(error: reqwest::Error) -> SourceError {
    SourceError::Http(error.without_url())
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn read_rows(&self, range: &str) -> Result<Vec<Vec<String>>, SourceError> {
        let url = self.values_url(range);
        debug!("Reading sheet range {}", range);

        let request = self.authorize(self.client.get(&url)).await?;
        let response = request.send().await.map_err(without_url)?;
        let response = ensure_success(response, "Sheet read").await?;

        let body: ValueRange = response.json().await.map_err(without_url)?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_rows(&self, range: &str, rows: &[Vec<String>]) -> Result<(), SourceError> {
        let url = self.values_url(range);
        debug!("Writing {} rows to sheet range {}", rows.len(), range);

        let body = ValueRangeUpdate {
            range,
            major_dimension: "ROWS",
            values: rows,
        };
        let request = self
            .client
            .put(&url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        let request = self.authorize(request).await?;
        let response = request.send().await.map_err(without_url)?;
        ensure_success(response, "Sheet write").await?;

        Ok(())
    }

    fn can_write(&self) -> bool {
        matches!(self.credentials, Credentials::ServiceAccount { .. })
    }
}
