use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and aggregating a sampling log.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected 8 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid core id: {value:?}")]
    InvalidCoreId { line: usize, value: String },

    #[error("line {line}: invalid idle percentage: {value:?}")]
    InvalidIdle { line: usize, value: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
