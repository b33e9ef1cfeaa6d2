//! Batch pipeline orchestration.
//!
//! Wires the stages together in their fixed order: load, clean, score,
//! store, summarize. Each stage consumes the previous stage's output; no
//! stage reaches around another.

use crate::cleaner::Cleaner;
use crate::config::AppConfig;
use crate::error::PipelineResult;
use crate::loader::CsvLoader;
use crate::report::{self, Summary};
use crate::rules::RuleEngine;
use crate::sink::SqliteSink;
use tracing::info;

/// One batch run over a CSV source into a SQLite sink.
pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    /// Create a pipeline from the application configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the batch against the configured source and sink paths.
    pub fn run(&self) -> PipelineResult<Summary> {
        let loader = CsvLoader::new(self.config.source.input_file.as_str());
        let mut sink = SqliteSink::open(self.config.sink.db_file.as_str())?;
        self.run_with_sink(&loader, &mut sink)
    }

    /// Run the batch against an explicit source and sink.
    pub fn run_with_sink(
        &self,
        loader: &CsvLoader,
        sink: &mut SqliteSink,
    ) -> PipelineResult<Summary> {
        info!("Starting batch run");

        let raw = loader.load()?;
        let cleaned = Cleaner::new().clean(raw);
        let scored = RuleEngine::new(&self.config.rules).score(cleaned.transactions)?;
        sink.write_batch(&scored.transactions)?;

        let summary = report::summarize(&scored.transactions);
        report::log_summary(&summary);
        Ok(summary)
    }
}
