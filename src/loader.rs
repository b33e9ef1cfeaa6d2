//! CSV ingestion for the fraud data pipeline

use crate::error::{PipelineError, PipelineResult};
use crate::types::transaction::RawTransaction;
use std::path::{Path, PathBuf};
use tracing::info;

/// Columns the source file must provide.
const REQUIRED_COLUMNS: [&str; 6] = [
    "transaction_id",
    "timestamp",
    "amount",
    "merchant",
    "user_id",
    "is_fraud",
];

/// Reads raw transactions from a CSV source file.
///
/// Empty cells become `None` and are left for the Cleaner; a file that is
/// missing, unreadable, or structurally malformed (absent column, wrong
/// field count, non-numeric amount, unrecognized fraud label) fails the
/// whole load.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    /// Create a loader for the given source file.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Read the full batch into memory, preserving input order.
    pub fn load(&self) -> PipelineResult<Vec<RawTransaction>> {
        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| self.source_error(&e))?;

        let headers = reader.headers().map_err(|e| self.source_error(&e))?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(PipelineError::SourceRead(format!(
                    "{}: missing required column '{}'",
                    self.path.display(),
                    column
                )));
            }
        }

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: RawTransaction = result.map_err(|e| self.source_error(&e))?;
            records.push(record);
        }

        info!(
            path = %self.path.display(),
            records = records.len(),
            "Loaded transactions from source"
        );
        Ok(records)
    }

    /// Get the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source_error(&self, err: &csv::Error) -> PipelineError {
        PipelineError::SourceRead(format!("{}: {}", self.path.display(), err))
    }
}
