//! Screen/window capture acquisition for ShowFlow.
//!
//! The platform's own source picker is reached through [`CapturePlatform`].
//! A successful request yields a [`MediaHandle`] that the switcher owns
//! until the source is removed or the device ends the stream.

mod error;
mod platform;
mod simulated;
mod track;

pub use error::CaptureError;
pub use platform::{
    AcquireReply, AcquireRequest, CaptureConstraints, CapturePlatform, CapturedStream,
};
pub use simulated::{SimulatedOutcome, SimulatedPlatform, SimulatedTrack};
pub use track::{CaptureTrack, EndedCallback, MediaHandle};

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;
