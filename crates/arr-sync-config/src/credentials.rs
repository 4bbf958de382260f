use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google service account key file, as downloaded from the cloud console
///
/// Only the fields needed for the JWT bearer grant are read.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid service account file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(content)?;
        if key.client_email.trim().is_empty() {
            return Err(anyhow::anyhow!("client_email is empty"));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(anyhow::anyhow!("private_key is not a PEM encoded key"));
        }
        Ok(key)
    }
}

// Keep the private key out of debug output.
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("private_key_id", &self.private_key_id)
            .finish_non_exhaustive()
    }
}
