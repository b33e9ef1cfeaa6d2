//! Fraud Data Pipeline Library
//!
//! A batch fraud detection pipeline: load transactions from CSV, clean
//! them, score them against a small rule set, store the results in
//! SQLite, and report a batch summary.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod sink;
pub mod types;

pub use cleaner::Cleaner;
pub use config::AppConfig;
pub use error::{PipelineError, PipelineResult};
pub use loader::CsvLoader;
pub use pipeline::Pipeline;
pub use report::Summary;
pub use rules::RuleEngine;
pub use sink::SqliteSink;
pub use types::{RawTransaction, ScoredTransaction, Transaction};
