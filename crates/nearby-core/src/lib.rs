//! Domain model and static configuration for the nearby business directory.
//!
//! Everything here is synchronous and I/O-free except for loading the
//! environment and the categories YAML file at startup.

pub mod app_config;
pub mod business;
pub mod categories;
pub mod classify;
pub mod config;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use business::{BusinessId, BusinessRecord, RankedBusiness};
pub use categories::{
    load_categories, parse_categories, CategoriesFile, CategoryDefinition, CategoryStore,
    SubcategoryDefinition,
};
pub use classify::{ClassificationRule, RuleTable};
pub use config::{
    categories_path_from_env, load_app_config, load_app_config_from_env, log_level_from_env,
};
pub use geo::{distance_km, Coordinates, EARTH_RADIUS_KM};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinates ({latitude}, {longitude}): {reason}")]
    InvalidCoordinates {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[from] serde_yaml::Error),

    #[error("categories validation failed: {0}")]
    Validation(String),
}
