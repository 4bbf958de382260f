use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("ARRSHEETS_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

/// Pick the config file: explicit path, then `$ARRSHEETS_CONFIG`, then the
/// platform default.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("ARRSHEETS_CONFIG") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    PathManager::default().config_file()
}

/// Log file used when `--log-file` is not given: only inside the container,
/// where the base directory is a mounted volume worth keeping logs on.
pub fn default_log_file() -> Option<PathBuf> {
    container_log_file(&container_base_path())
}

fn container_log_file(base: &Path) -> Option<PathBuf> {
    base.is_dir().then(|| PathManager::with_base(base).log_file())
}

pub struct PathManager {
    config_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("arrsheets");

        Ok(Self::with_base(&base_dir))
    }

    pub fn from_docker_env() -> Self {
        Self::with_base(&container_base_path())
    }

    pub fn with_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("arrsheets.log")
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container image creates the base directory
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}
