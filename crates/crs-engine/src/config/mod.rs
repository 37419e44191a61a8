use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::scoring::{ScoringTables, TableError};

const DEFAULT_STORE_PATH: &str = "crs-store.json";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let tables_path = match env::var("CRS_TABLES_PATH") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyPath {
                    variable: "CRS_TABLES_PATH",
                })
            }
            Ok(value) => Some(PathBuf::from(value)),
            Err(_) => None,
        };

        let store_path = match env::var("CRS_STORE_PATH") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyPath {
                    variable: "CRS_STORE_PATH",
                })
            }
            Ok(value) => PathBuf::from(value),
            Err(_) => PathBuf::from(DEFAULT_STORE_PATH),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                tables_path,
                store_path,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where scoring tables and candidate records live.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// JSON table set; the built-in standard tables apply when unset.
    pub tables_path: Option<PathBuf>,
    pub store_path: PathBuf,
}

impl ScoringConfig {
    pub fn load_tables(&self) -> Result<ScoringTables, ConfigError> {
        match &self.tables_path {
            Some(path) => ScoringTables::from_path(path).map_err(|source| ConfigError::Tables {
                path: path.clone(),
                source,
            }),
            None => Ok(ScoringTables::standard()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyPath { variable: &'static str },
    Tables { path: PathBuf, source: TableError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPath { variable } => {
                write!(f, "{variable} must not be empty when set")
            }
            ConfigError::Tables { path, .. } => {
                write!(f, "unable to load scoring tables from {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::EmptyPath { .. } => None,
            ConfigError::Tables { source, .. } => Some(source),
        }
    }
}
