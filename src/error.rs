//! Error types for the fraud data pipeline

use thiserror::Error;

/// Errors surfaced by pipeline stages.
///
/// Per-record data-quality problems (duplicate ids, missing fields,
/// unparseable timestamps) are never errors; the Cleaner removes those
/// records and reports counts. These variants cover the fatal cases only.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source file is missing, unreadable, or structurally malformed.
    #[error("Failed to read source data: {0}")]
    SourceRead(String),

    /// A cleaner-guaranteed invariant was violated at scoring time.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// The SQLite sink rejected an operation.
    #[error("Failed to write to sink: {0}")]
    SinkWrite(#[from] rusqlite::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
