pub mod aggregate;
pub mod app_config;
pub mod config;
pub mod geo;
pub mod import;
pub mod job;
pub mod map;
pub mod tier;

pub use aggregate::{Aggregation, LocationAggregator};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Coordinate, GeoResolver, LocationEntry};
pub use import::{ImportTable, DEFAULT_HEADER_ROWS};
pub use job::{JobFields, JobRecord, SalaryType, IMPORT_FIELD_COUNT, LOCATION_COLUMN};
pub use map::{GeoJsonComposer, MapComposer, MapMarker, MapPlan, MapView};
pub use tier::{load_tier_scale, Tier, TierBand, TierScale};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid import table: {0}")]
    InvalidTable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tiers file {path}: {source}")]
    TiersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tiers file: {0}")]
    TiersFileParse(#[from] serde_yaml::Error),

    #[error("tier scale validation failed: {0}")]
    Validation(String),
}
