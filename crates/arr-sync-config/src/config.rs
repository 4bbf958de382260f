use arr_sync_models::SheetRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value written by `config init` that must be replaced before syncing
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub google: GoogleConfig,
    pub radarr: LibraryConfig,
    pub sonarr: LibraryConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub spreadsheet_id: String,
    /// Single-column range holding the watch list, e.g. `Sheet1!A2:A`
    pub spreadsheet_range: String,
    /// Read-only access; write-back needs a service account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_file: Option<PathBuf>,
}

/// Connection and add settings for a Radarr or Sonarr instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// API base, including the version prefix (`http://host:7878/api/v3`)
    pub url: String,
    pub api_key: String,
    pub quality_profile: u32,
    pub root_folder_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// How the spreadsheet is accessed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAuth {
    ApiKey(String),
    ServiceAccount(PathBuf),
}

impl SheetAuth {
    pub fn can_write(&self) -> bool {
        matches!(self, SheetAuth::ServiceAccount(_))
    }
}

impl GoogleConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn service_account_file(&self) -> Option<&Path> {
        self.service_account_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl Config {
    /// Load a config file, resolving a relative service account path
    /// against the directory the file lives in.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        if let (Some(file), Some(dir)) = (config.google.service_account_file.as_mut(), path.parent()) {
            if file.is_relative() && !file.as_os_str().is_empty() {
                *file = dir.join(&*file);
            }
        }

        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Starting point written by `config init`
    pub fn template() -> Self {
        Self {
            google: GoogleConfig {
                spreadsheet_id: String::new(),
                spreadsheet_range: "Sheet1!A2:A".to_string(),
                api_key: None,
                service_account_file: Some(PathBuf::from("service-account.json")),
            },
            radarr: LibraryConfig {
                url: "http://localhost:7878/api/v3".to_string(),
                api_key: PLACEHOLDER_API_KEY.to_string(),
                quality_profile: 1,
                root_folder_path: "/movies".to_string(),
            },
            sonarr: LibraryConfig {
                url: "http://localhost:8989/api/v3".to_string(),
                api_key: PLACEHOLDER_API_KEY.to_string(),
                quality_profile: 1,
                root_folder_path: "/tv".to_string(),
            },
            http: HttpConfig::default(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.google.spreadsheet_id.trim().is_empty() {
            return Err(anyhow::anyhow!("google.spreadsheet_id is not configured"));
        }
        self.sheet_range()?;
        self.sheet_auth()?;

        for (name, library) in [("radarr", &self.radarr), ("sonarr", &self.sonarr)] {
            if library.url.trim().is_empty() {
                return Err(anyhow::anyhow!("{}.url is not configured", name));
            }
            if !library.url.starts_with("http://") && !library.url.starts_with("https://") {
                return Err(anyhow::anyhow!("{}.url must start with http:// or https://", name));
            }
            if library.api_key.trim().is_empty() || library.api_key == PLACEHOLDER_API_KEY {
                return Err(anyhow::anyhow!("{}.api_key is not configured", name));
            }
            if library.root_folder_path.trim().is_empty() {
                return Err(anyhow::anyhow!("{}.root_folder_path is not configured", name));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow::anyhow!("http.timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    pub fn sheet_range(&self) -> anyhow::Result<SheetRange> {
        SheetRange::parse(&self.google.spreadsheet_range)
            .map_err(|e| anyhow::anyhow!("Invalid google.spreadsheet_range: {}", e))
    }

    /// Spreadsheet access mode. Exactly one of `api_key` and
    /// `service_account_file` must be set.
    pub fn sheet_auth(&self) -> anyhow::Result<SheetAuth> {
        match (self.google.api_key(), self.google.service_account_file()) {
            (Some(_), Some(_)) => Err(anyhow::anyhow!(
                "google.api_key and google.service_account_file are mutually exclusive; set only one"
            )),
            (Some(key), None) => {
                if key == PLACEHOLDER_API_KEY {
                    return Err(anyhow::anyhow!("google.api_key is not configured"));
                }
                Ok(SheetAuth::ApiKey(key.to_string()))
            }
            (None, Some(file)) => Ok(SheetAuth::ServiceAccount(file.to_path_buf())),
            (None, None) => Err(anyhow::anyhow!(
                "No Google auth configured: set api_key or service_account_file in the [google] section"
            )),
        }
    }
}
