//! Error types for the engine.

use thiserror::Error;

use showflow_output::OutputError;

/// Errors raised while building the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Output configuration is unusable.
    #[error("Output setup failed: {0}")]
    Output(#[from] OutputError),
}
