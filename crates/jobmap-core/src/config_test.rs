use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "JOBMAP_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.database_url, "sqlite://jobmap.db?mode=rwc");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_max_connections, 5);
    assert_eq!(cfg.db_min_connections, 1);
    assert_eq!(cfg.db_acquire_timeout_secs, 10);
    assert!(cfg.tiers_path.is_none());
    assert_eq!(cfg.map_center, "Columbus, OH");
    assert!((cfg.map_fallback_center.lat - 39.9612).abs() < 1e-9);
    assert!((cfg.map_fallback_center.lng + 82.9988).abs() < 1e-9);
    assert_eq!(cfg.map_view.width, 1000);
    assert_eq!(cfg.map_view.height, 1000);
    assert_eq!(cfg.map_view.zoom, 7);
    assert_eq!(cfg.map_output, PathBuf::from("jobs_map.geojson"));
    assert_eq!(cfg.geocoder_url, "https://nominatim.openstreetmap.org/");
    assert_eq!(cfg.geocoder_user_agent, "jobmap/0.1 (job-posting-map)");
    assert_eq!(cfg.geocoder_timeout_secs, 30);
    assert_eq!(cfg.geocoder_min_interval_ms, 1000);
    assert_eq!(cfg.geocoder_max_retries, 3);
    assert_eq!(cfg.geocoder_retry_backoff_base_ms, 1000);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite::memory:");
    map.insert("JOBMAP_ENV", "test");
    map.insert("JOBMAP_TIERS_PATH", "./config/tiers.yaml");
    map.insert("JOBMAP_MAP_CENTER", "Boston, MA");
    map.insert("JOBMAP_MAP_FALLBACK_CENTER", "42.3601, -71.0589");
    map.insert("JOBMAP_MAP_ZOOM", "9");
    map.insert("JOBMAP_GEOCODER_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.database_url, "sqlite::memory:");
    assert_eq!(cfg.env, Environment::Test);
    assert_eq!(cfg.tiers_path, Some(PathBuf::from("./config/tiers.yaml")));
    assert_eq!(cfg.map_center, "Boston, MA");
    assert!((cfg.map_fallback_center.lat - 42.3601).abs() < 1e-9);
    assert_eq!(cfg.map_view.zoom, 9);
    assert_eq!(cfg.geocoder_max_retries, 0);
}

#[test]
fn build_app_config_rejects_invalid_zoom() {
    let mut map = HashMap::new();
    map.insert("JOBMAP_MAP_ZOOM", "very-close");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "JOBMAP_MAP_ZOOM"),
        "expected InvalidEnvVar(JOBMAP_MAP_ZOOM), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_fallback_center() {
    let mut map = HashMap::new();
    map.insert("JOBMAP_MAP_FALLBACK_CENTER", "columbus");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "JOBMAP_MAP_FALLBACK_CENTER"),
        "expected InvalidEnvVar(JOBMAP_MAP_FALLBACK_CENTER), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_min_connections_above_max() {
    let mut map = HashMap::new();
    map.insert("JOBMAP_DB_MAX_CONNECTIONS", "2");
    map.insert("JOBMAP_DB_MIN_CONNECTIONS", "4");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "JOBMAP_DB_MIN_CONNECTIONS"),
        "expected InvalidEnvVar(JOBMAP_DB_MIN_CONNECTIONS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_geocoder_timeout() {
    let mut map = HashMap::new();
    map.insert("JOBMAP_GEOCODER_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "JOBMAP_GEOCODER_TIMEOUT_SECS"),
        "expected InvalidEnvVar(JOBMAP_GEOCODER_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_database_url() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite:///home/someone/secret-jobs.db");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-jobs"));
    assert!(rendered.contains("[redacted]"));
}
