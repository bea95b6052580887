use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::map::MapView;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        or_default(var, default)
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = or_default("DATABASE_URL", "sqlite://jobmap.db?mode=rwc");
    let env = parse_environment(&or_default("JOBMAP_ENV", "development"))?;
    let log_level = or_default("JOBMAP_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("JOBMAP_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("JOBMAP_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("JOBMAP_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "JOBMAP_DB_MIN_CONNECTIONS",
            format!(
                "{db_min_connections} exceeds JOBMAP_DB_MAX_CONNECTIONS ({db_max_connections})"
            ),
        ));
    }

    let tiers_path = lookup("JOBMAP_TIERS_PATH").ok().map(PathBuf::from);

    let map_center = or_default("JOBMAP_MAP_CENTER", "Columbus, OH");
    let fallback_raw = or_default("JOBMAP_MAP_FALLBACK_CENTER", "39.9612,-82.9988");
    let map_fallback_center = Coordinate::parse_pair(&fallback_raw)
        .map_err(|e| invalid("JOBMAP_MAP_FALLBACK_CENTER", e.to_string()))?;
    let map_view = MapView {
        width: parse_u32("JOBMAP_MAP_WIDTH", "1000")?,
        height: parse_u32("JOBMAP_MAP_HEIGHT", "1000")?,
        zoom: parse_u8("JOBMAP_MAP_ZOOM", "7")?,
    };
    let map_output = PathBuf::from(or_default("JOBMAP_MAP_OUTPUT", "jobs_map.geojson"));

    let geocoder_url = or_default("JOBMAP_GEOCODER_URL", "https://nominatim.openstreetmap.org/");
    let geocoder_user_agent = or_default(
        "JOBMAP_GEOCODER_USER_AGENT",
        "jobmap/0.1 (job-posting-map)",
    );
    let geocoder_timeout_secs = parse_u64("JOBMAP_GEOCODER_TIMEOUT_SECS", "30")?;
    let geocoder_min_interval_ms = parse_u64("JOBMAP_GEOCODER_MIN_INTERVAL_MS", "1000")?;
    let geocoder_max_retries = parse_u32("JOBMAP_GEOCODER_MAX_RETRIES", "3")?;
    let geocoder_retry_backoff_base_ms =
        parse_u64("JOBMAP_GEOCODER_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        tiers_path,
        map_center,
        map_fallback_center,
        map_view,
        map_output,
        geocoder_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_min_interval_ms,
        geocoder_max_retries,
        geocoder_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "JOBMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
