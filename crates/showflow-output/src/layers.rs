//! Two-layer model of the output view.

use showflow_capture::MediaHandle;

use crate::frame::{OutputFrame, StandbyImage};

/// Static overlay always present on the output view.
pub const WATERMARK: &str = "SHOWFLOW FREE";

/// Live video layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoLayer {
    /// Whether the layer is shown.
    pub visible: bool,

    /// Media bound to the layer.
    pub media: Option<MediaHandle>,
}

/// What the fallback layer displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FallbackContent {
    /// Empty/placeholder state.
    #[default]
    Placeholder,

    /// The standby image.
    Image(StandbyImage),
}

/// Fallback image layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackLayer {
    /// Whether the layer is shown.
    pub visible: bool,

    /// Layer contents.
    pub content: FallbackContent,
}

impl Default for FallbackLayer {
    fn default() -> Self {
        Self {
            visible: true,
            content: FallbackContent::Placeholder,
        }
    }
}

/// Rendered state of an output view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceLayers {
    /// Live program video.
    pub video: VideoLayer,

    /// Standby image or placeholder, shown when nothing is live.
    pub fallback: FallbackLayer,

    /// Overlay text, always drawn.
    pub watermark: &'static str,
}

impl SurfaceLayers {
    /// Layers of a freshly opened view that has received nothing yet.
    pub fn blank() -> Self {
        Self {
            video: VideoLayer::default(),
            fallback: FallbackLayer::default(),
            watermark: WATERMARK,
        }
    }

    /// Layers for a snapshot. Exactly one of video/fallback is visible, chosen
    /// only by whether a program source is set.
    pub fn from_frame(frame: &OutputFrame) -> Self {
        let live = frame.program.is_some();
        let content = match &frame.standby {
            Some(image) => FallbackContent::Image(image.clone()),
            None => FallbackContent::Placeholder,
        };

        Self {
            video: VideoLayer {
                visible: live,
                media: frame.program.as_ref().map(|feed| feed.media.clone()),
            },
            fallback: FallbackLayer {
                visible: !live,
                content,
            },
            watermark: WATERMARK,
        }
    }

    /// Standby image shown on the fallback layer, if any.
    pub fn standby(&self) -> Option<&StandbyImage> {
        match &self.fallback.content {
            FallbackContent::Image(image) => Some(image),
            FallbackContent::Placeholder => None,
        }
    }
}

impl Default for SurfaceLayers {
    fn default() -> Self {
        Self::blank()
    }
}
