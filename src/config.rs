//! Configuration management for the fraud data pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub sink: SinkConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

/// Source data configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Path to the input CSV file
    pub input_file: String,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Path to the SQLite database file
    pub db_file: String,
}

/// Fraud rule parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// Amounts strictly above this trigger the high-amount rule
    #[serde(default = "default_amount_threshold")]
    pub amount_threshold: f64,
    /// Keywords matched case-insensitively against merchant names
    #[serde(default = "default_suspicious_merchants")]
    pub suspicious_merchants: Vec<String>,
    /// Gaps strictly below this many seconds trigger the velocity rule
    #[serde(default = "default_velocity_window_secs")]
    pub velocity_window_secs: i64,
}

fn default_amount_threshold() -> f64 {
    1000.0
}

fn default_suspicious_merchants() -> Vec<String> {
    vec![
        "Casino".to_string(),
        "Gaming".to_string(),
        "Crypto".to_string(),
        "Betting".to_string(),
    ]
}

fn default_velocity_window_secs() -> i64 {
    60
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            amount_threshold: default_amount_threshold(),
            suspicious_merchants: default_suspicious_merchants(),
            velocity_window_secs: default_velocity_window_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                input_file: "transaction_data.csv".to_string(),
            },
            sink: SinkConfig {
                db_file: "fraud_detection.db".to_string(),
            },
            rules: RulesConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source.input_file, "transaction_data.csv");
        assert_eq!(config.sink.db_file, "fraud_detection.db");
        assert_eq!(config.rules.amount_threshold, 1000.0);
        assert_eq!(config.rules.velocity_window_secs, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_suspicious_merchants() {
        let merchants = default_suspicious_merchants();
        assert_eq!(merchants.len(), 4);
        assert!(merchants.contains(&"Casino".to_string()));
        assert!(merchants.contains(&"Betting".to_string()));
    }

    #[test]
    fn test_load_from_file_with_rule_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[source]
input_file = "batch.csv"

[sink]
db_file = "batch.db"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();

        assert_eq!(config.source.input_file, "batch.csv");
        assert_eq!(config.sink.db_file, "batch.db");
        assert_eq!(config.logging.level, "debug");
        // [rules] omitted falls back to the built-in defaults
        assert_eq!(config.rules.amount_threshold, 1000.0);
        assert_eq!(config.rules.suspicious_merchants.len(), 4);
    }

    #[test]
    fn test_load_from_file_overrides_rules() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[source]
input_file = "batch.csv"

[sink]
db_file = "batch.db"

[rules]
amount_threshold = 250.0
suspicious_merchants = ["Pawn"]
velocity_window_secs = 120

[logging]
level = "info"
format = "pretty"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();

        assert_eq!(config.rules.amount_threshold, 250.0);
        assert_eq!(config.rules.suspicious_merchants, vec!["Pawn".to_string()]);
        assert_eq!(config.rules.velocity_window_secs, 120);
    }
}
