//! Application configuration. Listen address, storage, gateway header.

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_USER_HEADER: &str = "x-user-id";

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Sqlite,
    /// Process-local, lost on restart.
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Bind host. Read from COMMUNITY_HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// Bind port. Read from COMMUNITY_PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// Directory holding community.db. Read from COMMUNITY_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// `sqlite` (default) or `memory`. Read from COMMUNITY_STORAGE.
    #[serde(default)]
    pub storage: Option<StorageKind>,

    /// Header the gateway uses to pass the authenticated user id. Read from COMMUNITY_USER_HEADER.
    #[serde(default)]
    pub user_header: Option<String>,

    /// Allowed CORS origin; any origin when unset. Read from COMMUNITY_CORS_ORIGIN.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl AppConfig {
    /// Environment (COMMUNITY_*) plus an optional file named by COMMUNITY_CONFIG.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("COMMUNITY_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment last so it overrides the file.
        c = c.add_source(config::Environment::with_prefix("COMMUNITY").try_parsing(true));
        c.build()?.try_deserialize()
    }

    pub fn host_or_default(&self) -> String {
        self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host_or_default(), self.port_or_default())
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    pub fn storage_or_default(&self) -> StorageKind {
        self.storage.unwrap_or_default()
    }

    pub fn user_header_or_default(&self) -> String {
        self.user_header
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_HEADER.to_string())
    }
}
