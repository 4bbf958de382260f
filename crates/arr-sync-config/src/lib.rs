pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, GoogleConfig, HttpConfig, LibraryConfig, SheetAuth, PLACEHOLDER_API_KEY};
pub use credentials::ServiceAccountKey;
pub use paths::{PathManager, container_base_path, default_log_file, resolve_config_path};
