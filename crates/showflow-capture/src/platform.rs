//! The platform source-picker boundary.

use showflow_ipc::CaptureConfig;

use crate::track::MediaHandle;
use crate::CaptureResult;

/// Constraints passed to the platform picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Suppress the cursor in the video track.
    pub hide_cursor: bool,

    /// Capture audio alongside video.
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            hide_cursor: true,
            audio: true,
        }
    }
}

impl From<&CaptureConfig> for CaptureConstraints {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            hide_cursor: config.hide_cursor,
            audio: config.audio,
        }
    }
}

/// A single acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireRequest {
    /// Engine-assigned request number.
    pub id: u64,

    /// Requested constraints.
    pub constraints: CaptureConstraints,
}

/// A stream granted by the platform.
#[derive(Debug, Clone)]
pub struct CapturedStream {
    /// Handle to the live stream.
    pub handle: MediaHandle,

    /// Whether an audio track came along.
    pub has_audio: bool,
}

impl CapturedStream {
    /// Track label, if the platform exposes one.
    pub fn label(&self) -> Option<String> {
        self.handle.label().filter(|label| !label.is_empty())
    }
}

/// Completion callback for an acquisition request.
pub type AcquireReply = Box<dyn FnOnce(CaptureResult<CapturedStream>) + Send>;

/// Platform capture subsystem.
pub trait CapturePlatform: Send + Sync {
    /// Start an acquisition. Must not block on the operator: `reply` is
    /// invoked whenever the picker resolves, possibly on another thread.
    fn request(&self, request: AcquireRequest, reply: AcquireReply);
}
