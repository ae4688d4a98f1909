//! Live capture tracks and the handles that reference them.

use std::fmt;
use std::sync::Arc;

/// Callback fired once when the device ends a track.
pub type EndedCallback = Box<dyn FnOnce() + Send>;

/// A live video track produced by the platform.
pub trait CaptureTrack: Send + Sync {
    /// Human-readable label, if the platform exposes one.
    fn label(&self) -> Option<String>;

    /// Release the track. Does not fire ended callbacks.
    fn stop(&self);

    /// Returns true once the track has been stopped or ended by the device.
    fn is_ended(&self) -> bool;

    /// Register a callback for device-initiated termination. If the track
    /// has already ended, the callback runs immediately on the caller's
    /// thread.
    fn on_ended(&self, callback: EndedCallback);
}

/// Shared reference to a platform capture stream.
#[derive(Clone)]
pub struct MediaHandle {
    stream_id: u64,
    track: Arc<dyn CaptureTrack>,
}

impl MediaHandle {
    /// Wrap a platform track.
    pub fn new(stream_id: u64, track: Arc<dyn CaptureTrack>) -> Self {
        Self { stream_id, track }
    }

    /// Platform identifier for the underlying stream.
    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }

    /// Track label, if any.
    pub fn label(&self) -> Option<String> {
        self.track.label()
    }

    /// Register a device-termination callback on the video track. Runs at
    /// once if the track has already ended.
    pub fn on_ended(&self, callback: EndedCallback) {
        self.track.on_ended(callback);
    }

    /// Release the platform stream.
    pub fn release(&self) {
        self.track.stop();
    }

    /// Whether the stream is still producing video.
    pub fn is_live(&self) -> bool {
        !self.track.is_ended()
    }
}

impl PartialEq for MediaHandle {
    fn eq(&self, other: &Self) -> bool {
        self.stream_id == other.stream_id
    }
}

impl Eq for MediaHandle {}

impl fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaHandle")
            .field("stream_id", &self.stream_id)
            .field("live", &self.is_live())
            .finish()
    }
}
