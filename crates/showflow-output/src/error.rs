//! Error types for the output module.

use thiserror::Error;

/// Errors that can occur on the output side.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The host refused to create the surface.
    #[error("Output surface creation was blocked by the host")]
    Blocked,

    /// The configured base address is not a valid URL.
    #[error("Invalid output route: {0}")]
    InvalidRoute(#[from] url::ParseError),
}
