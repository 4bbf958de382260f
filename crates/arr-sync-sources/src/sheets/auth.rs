use crate::error::SourceError;
use crate::http::ensure_success;
use arr_sync_config::ServiceAccountKey;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Read/write scope, needed for the status write-back
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token expires within the next minute
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::minutes(1)
    }
}

/// Build the signed RS256 assertion for the JWT bearer grant
pub fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, SourceError> {
    let claims = Claims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now.timestamp(),
        exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

/// Exchange a service account key for a bearer token
pub async fn exchange_token(client: &Client, key: &ServiceAccountKey) -> Result<AccessToken, SourceError> {
    let now = Utc::now();
    let assertion = sign_assertion(key, now)?;

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let response = match ensure_success(response, "Service account token exchange").await {
        Ok(response) => response,
        Err(e) => return Err(SourceError::Auth(e.to_string())),
    };

    let token: TokenResponse = response.json().await?;
    info!("Obtained Google access token for {}", key.client_email);

    Ok(AccessToken {
        token: token.access_token,
        expires_at: now + Duration::seconds(token.expires_in),
    })
}
