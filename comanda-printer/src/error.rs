//! Error types for the print pipeline

use thiserror::Error;

/// Print pipeline error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Pipeline executable could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipeline ran but reported failure
    #[error("{command} exited with {status}")]
    ExitStatus {
        command: String,
        status: std::process::ExitStatus,
    },

    /// Invalid print job configuration
    #[error("invalid print job: {0}")]
    InvalidJob(String),
}

/// Result type for print operations
pub type PrintResult<T> = Result<T, PrintError>;
