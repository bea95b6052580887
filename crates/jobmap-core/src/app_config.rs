use std::path::PathBuf;

use crate::geo::Coordinate;
use crate::map::MapView;

#[derive(Debug, Clone, PartialEq, Eq)]
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

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Optional YAML file overriding the default tier scale.
    pub tiers_path: Option<PathBuf>,
    /// Place name geocoded to center the map and to stand in for
    /// locations the geocoder cannot resolve.
    pub map_center: String,
    /// Used when `map_center` itself cannot be resolved.
    pub map_fallback_center: Coordinate,
    pub map_view: MapView,
    pub map_output: PathBuf,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_min_interval_ms: u64,
    pub geocoder_max_retries: u32,
    pub geocoder_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("tiers_path", &self.tiers_path)
            .field("map_center", &self.map_center)
            .field("map_fallback_center", &self.map_fallback_center)
            .field("map_view", &self.map_view)
            .field("map_output", &self.map_output)
            .field("geocoder_url", &self.geocoder_url)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_min_interval_ms", &self.geocoder_min_interval_ms)
            .field("geocoder_max_retries", &self.geocoder_max_retries)
            .field(
                "geocoder_retry_backoff_base_ms",
                &self.geocoder_retry_backoff_base_ms,
            )
            .finish()
    }
}
