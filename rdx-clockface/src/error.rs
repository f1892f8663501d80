//! Error types for Clockface.

use thiserror::Error;

/// Errors raised by the clock face and its configuration layer.
#[derive(Debug, Error)]
pub enum FaceError {
    /// A required element is missing from the document tree. Raised while
    /// the face is being constructed; the layout is fixed, so this is fatal.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A mode name or index outside the fixed mode set.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// The engine was already started; it runs a single `Watch`.
    #[error("Engine is already running")]
    AlreadyRunning,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
