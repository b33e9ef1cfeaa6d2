//! Fraud Data Pipeline - Main Entry Point
//!
//! Loads a CSV batch of transactions, cleans and scores it, stores the
//! results in SQLite, and logs a batch summary.

use anyhow::Result;
use fraud_data_pipeline::{config::LoggingConfig, AppConfig, Pipeline};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    if config.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> Result<()> {
    // Load configuration, from the path given as the first argument if any
    let config = match env::args().nth(1) {
        Some(path) => AppConfig::load_from_path(&path)?,
        None => AppConfig::load()?,
    };

    init_logging(&config.logging);

    info!("Starting Fraud Data Pipeline");
    info!(
        input = %config.source.input_file,
        db = %config.sink.db_file,
        "Configuration loaded"
    );

    let summary = Pipeline::new(config).run()?;

    info!(
        total = summary.total_records,
        flagged = summary.rule_based_flags,
        high_risk = summary.high_risk_transactions,
        "Pipeline completed successfully"
    );

    Ok(())
}
