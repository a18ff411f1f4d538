//! Error handling for the ticket price tracker
//!
//! Defines the failure taxonomy of a tracking run and establishes a unified
//! Result type using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Failure kinds of a single tracking run.
///
/// Every variant aborts the run; missing alert configuration is not an error
/// and never shows up here.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("file system error: {0}")]
    FileSystem(String),

    #[error("mail error: {0}")]
    Mail(String),

    #[error("date error: {0}")]
    Date(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for tracker operations
pub type Result<T> = anyhow::Result<T>;
