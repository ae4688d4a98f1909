//! In-process surface host.
//!
//! Each opened surface is a [`LoopbackView`] that keeps the layers it last
//! rendered, so the host application and tests can observe the output.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::frame::OutputFrame;
use crate::layers::SurfaceLayers;
use crate::route::{OutputRoute, ViewMode};
use crate::surface::{OutputSurface, SurfaceHost};

struct ViewState {
    url: Url,
    mode: ViewMode,
    layers: SurfaceLayers,
    renders: u64,
    closed: bool,
}

/// Observer handle for one opened surface.
#[derive(Clone)]
pub struct LoopbackView {
    state: Arc<Mutex<ViewState>>,
}

impl LoopbackView {
    fn new(route: &OutputRoute) -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState {
                url: route.url.clone(),
                mode: route.view_mode(),
                layers: SurfaceLayers::blank(),
                renders: 0,
                closed: false,
            })),
        }
    }

    /// Address the surface was opened at.
    pub fn url(&self) -> Url {
        self.state.lock().url.clone()
    }

    /// View selected by the address.
    pub fn mode(&self) -> ViewMode {
        self.state.lock().mode
    }

    /// Layers as last rendered.
    pub fn layers(&self) -> SurfaceLayers {
        self.state.lock().layers.clone()
    }

    /// Number of snapshots rendered.
    pub fn renders(&self) -> u64 {
        self.state.lock().renders
    }

    /// Whether the surface has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Close the surface, as a user closing the window would.
    pub fn close(&self) {
        self.state.lock().closed = true;
    }
}

struct LoopbackSurface {
    view: LoopbackView,
}

impl OutputSurface for LoopbackSurface {
    fn render(&mut self, frame: &OutputFrame) {
        let mut state = self.view.state.lock();
        if state.closed {
            return;
        }
        if state.mode != ViewMode::Output {
            warn!(url = %state.url, "Surface is not in output mode, ignoring frame");
            return;
        }
        state.layers = SurfaceLayers::from_frame(frame);
        state.renders += 1;
    }

    fn is_closed(&self) -> bool {
        self.view.is_closed()
    }
}

#[derive(Default)]
struct HostState {
    blocked: bool,
    views: Vec<LoopbackView>,
}

/// Surface host that renders into shared memory.
#[derive(Clone, Default)]
pub struct LoopbackHost {
    state: Arc<Mutex<HostState>>,
}

impl LoopbackHost {
    /// Host that allows surface creation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse (or allow) future surface creation, like a popup blocker.
    pub fn set_blocked(&self, blocked: bool) {
        self.state.lock().blocked = blocked;
    }

    /// Number of surfaces opened so far.
    pub fn opened(&self) -> usize {
        self.state.lock().views.len()
    }

    /// Most recently opened surface.
    pub fn latest(&self) -> Option<LoopbackView> {
        self.state.lock().views.last().cloned()
    }
}

impl SurfaceHost for LoopbackHost {
    fn open(&mut self, route: &OutputRoute) -> Option<Box<dyn OutputSurface>> {
        let mut state = self.state.lock();
        if state.blocked {
            return None;
        }

        debug!(
            url = %route.url,
            name = %route.window_name,
            features = %route.features(),
            "Opening loopback surface"
        );
        let view = LoopbackView::new(route);
        state.views.push(view.clone());
        Some(Box::new(LoopbackSurface { view }))
    }
}
