//! Error types for fermata-engine.

use thiserror::Error;

/// Result type alias for instrument-load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors an [`InstrumentLoader`](crate::InstrumentLoader) can report.
///
/// The pipeline never propagates these to the caller of `change()`: access
/// denials are broadcast on the alert hub and everything else is logged and
/// swallowed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The instrument file exists but may not be read.
    #[error("file access denied")]
    AccessDenied,

    /// The file could not be parsed as an instrument bank.
    #[error("malformed instrument file: {0}")]
    Malformed(String),

    /// Any other I/O failure while reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
