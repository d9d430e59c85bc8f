use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Trace error: {0}")]
    TraceError(#[from] TraceError),

    #[error("Failed to write report '{0}': {1}")]
    ReportWriteError(PathBuf, #[source] std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors related to trace file ingestion
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace file '{0}': {1}")]
    FileReadError(PathBuf, #[source] std::io::Error),

    #[error("Failed to read trace row: {0}")]
    RowReadError(#[from] csv::Error),
}

/// Type alias for Result with AnalyzerError
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
