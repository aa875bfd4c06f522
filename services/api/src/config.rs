//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chrono::{NaiveDate, NaiveTime};
use revision_planner_core::{ExamTable, PlannerSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Could not load the exam table from {path}: {reason}")]
    ExamTable { path: PathBuf, reason: String },
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    /// Optional JSON exam table replacing the built-in catalog.
    pub exam_table_path: Option<PathBuf>,
    pub planner: PlannerSettings,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Planner Settings ---
        let exam_table_path = lookup("EXAM_TABLE_PATH").map(PathBuf::from);

        let defaults = PlannerSettings::default();
        let planner = PlannerSettings {
            horizon_start: parse_date(&lookup, "HORIZON_START")?.unwrap_or(defaults.horizon_start),
            horizon_end: parse_date(&lookup, "HORIZON_END")?.unwrap_or(defaults.horizon_end),
            focus_start: parse_date(&lookup, "FOCUS_PHASE_START")?.unwrap_or(defaults.focus_start),
            default_exam_time: match lookup("DEFAULT_EXAM_TIME") {
                Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| {
                    ConfigError::InvalidValue("DEFAULT_EXAM_TIME".to_string(), e.to_string())
                })?,
                None => defaults.default_exam_time,
            },
        };
        planner
            .validate()
            .map_err(|e| ConfigError::InvalidValue("HORIZON_END".to_string(), e.to_string()))?;

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            exam_table_path,
            planner,
        })
    }

    /// Reads the configured exam table, or returns the built-in one.
    pub fn load_exam_table(&self) -> Result<ExamTable, ConfigError> {
        let Some(path) = &self.exam_table_path else {
            return Ok(ExamTable::gcse_2025());
        };
        let to_error = |reason: String| ConfigError::ExamTable {
            path: path.clone(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| to_error(e.to_string()))?;
        serde_json::from_slice::<ExamTable>(&bytes).map_err(|e| to_error(e.to_string()))
    }
}

fn parse_date<F>(lookup: &F, key: &str) -> Result<Option<NaiveDate>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
        })
        .transpose()
}
