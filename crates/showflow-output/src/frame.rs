//! The state snapshot pushed to the output surface.

use bytes::Bytes;

use showflow_capture::MediaHandle;
use showflow_ipc::SourceId;

/// Decoded standby image, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandbyImage {
    /// Upload counter; each upload gets a new revision.
    pub revision: u64,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Row-major RGBA8 pixels.
    pub pixels: Bytes,
}

/// The source currently on air.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramFeed {
    /// Source identifier.
    pub source: SourceId,

    /// Source name.
    pub name: String,

    /// Live media to bind to the video layer.
    pub media: MediaHandle,
}

/// Authoritative `{program, standby}` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFrame {
    /// Source on air, if any.
    pub program: Option<ProgramFeed>,

    /// Current standby image, if any.
    pub standby: Option<StandbyImage>,
}

impl OutputFrame {
    /// Build a frame.
    pub fn new(program: Option<ProgramFeed>, standby: Option<StandbyImage>) -> Self {
        Self { program, standby }
    }

    /// Program source identifier, if live.
    pub fn program_id(&self) -> Option<SourceId> {
        self.program.as_ref().map(|feed| feed.source)
    }
}
