use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Fixed endpoint returning the full business catalog as a JSON array.
    pub catalog_url: String,
    pub categories_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first catalog request fails transiently.
    /// `0` keeps the single-request behaviour.
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Reverse-geocoding endpoint used for address lookups.
    pub geocoder_url: String,
    pub location_timeout_ms: u64,
}
