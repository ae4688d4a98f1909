//! Host-side traits for creating and driving output surfaces.

use crate::frame::OutputFrame;
use crate::route::OutputRoute;

/// A live output rendering context.
pub trait OutputSurface: Send {
    /// Replace the rendered state with this snapshot. Fire and forget.
    fn render(&mut self, frame: &OutputFrame);

    /// Returns true once the context is gone (closed by the user or host).
    fn is_closed(&self) -> bool;
}

/// Environment that can create output surfaces.
pub trait SurfaceHost: Send {
    /// Create a surface at the route. `None` means the host refused.
    fn open(&mut self, route: &OutputRoute) -> Option<Box<dyn OutputSurface>>;
}
