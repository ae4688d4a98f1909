//! Error types for the capture module.

use thiserror::Error;

/// Message used when the platform reports a failure without text.
pub(crate) const GENERIC_FAILURE: &str = "Error adding source.";

/// Errors that can occur while acquiring a capture source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The operator dismissed the platform picker.
    #[error("Capture request cancelled by user")]
    Cancelled,

    /// Capture is unavailable outside a secure context.
    #[error("Screen capture requires HTTPS.")]
    InsecureContext,

    /// Any other platform failure; the message is passed through.
    #[error("{}", platform_message(.0))]
    Platform(String),
}

fn platform_message(message: &str) -> &str {
    if message.is_empty() {
        GENERIC_FAILURE
    } else {
        message
    }
}

impl CaptureError {
    /// Returns true for the picker-dismissed outcome, which is not a fault.
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
