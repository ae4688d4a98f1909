//! Output surface synchronization for ShowFlow.
//!
//! The output surface is a second rendering context addressed by a routing
//! token. It renders whatever [`OutputFrame`] it last received; the
//! [`OutputChannel`] is the only writer and the [`ConnectionMonitor`] the
//! only judge of whether the surface is still there.

mod channel;
mod error;
mod frame;
mod layers;
mod loopback;
mod monitor;
mod route;
mod surface;

pub use channel::OutputChannel;
pub use error::OutputError;
pub use frame::{OutputFrame, ProgramFeed, StandbyImage};
pub use layers::{FallbackContent, FallbackLayer, SurfaceLayers, VideoLayer, WATERMARK};
pub use loopback::{LoopbackHost, LoopbackView};
pub use monitor::ConnectionMonitor;
pub use route::{OutputRoute, ViewMode};
pub use surface::{OutputSurface, SurfaceHost};

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;
