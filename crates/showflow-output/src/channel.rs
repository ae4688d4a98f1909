//! One-way snapshot channel to the output surface.

use tracing::{debug, info, instrument, warn};

use showflow_ipc::OutputStatus;

use crate::frame::OutputFrame;
use crate::route::OutputRoute;
use crate::surface::{OutputSurface, SurfaceHost};

/// Owns the output surface handle and projects snapshots onto it.
pub struct OutputChannel {
    route: OutputRoute,
    host: Box<dyn SurfaceHost>,
    surface: Option<Box<dyn OutputSurface>>,
    status: OutputStatus,
    pushes: u64,
}

impl OutputChannel {
    /// Create a disconnected channel.
    pub fn new(route: OutputRoute, host: Box<dyn SurfaceHost>) -> Self {
        Self {
            route,
            host,
            surface: None,
            status: OutputStatus::Disconnected,
            pushes: 0,
        }
    }

    /// Current connection status.
    pub fn status(&self) -> OutputStatus {
        self.status
    }

    /// Number of snapshots delivered since creation.
    pub fn pushes(&self) -> u64 {
        self.pushes
    }

    /// Open the output surface and deliver `frame` to it.
    ///
    /// A surface that is still alive is reused and re-synced instead of
    /// opening a second one.
    #[instrument(name = "output_connect", skip(self, frame))]
    pub fn connect(&mut self, frame: &OutputFrame) -> OutputStatus {
        if self.is_surface_alive() {
            debug!("Output surface already open, re-syncing");
            self.status = OutputStatus::Connected;
            self.push(frame);
            return self.status;
        }

        match self.host.open(&self.route) {
            Some(surface) => {
                info!(url = %self.route.url, "Output surface opened");
                self.surface = Some(surface);
                self.status = OutputStatus::Connected;
                self.push(frame);
            }
            None => {
                warn!(url = %self.route.url, "Output surface creation refused");
                self.surface = None;
                self.status = OutputStatus::Blocked;
            }
        }

        self.status
    }

    /// Deliver a snapshot. Dropped silently unless connected; never queued or
    /// retried. Returns true if the snapshot was handed to a surface.
    pub fn push(&mut self, frame: &OutputFrame) -> bool {
        if !self.status.is_connected() {
            return false;
        }

        match self.surface.as_mut() {
            Some(surface) => {
                surface.render(frame);
                self.pushes += 1;
                debug!(
                    program = ?frame.program_id(),
                    standby = frame.standby.as_ref().map(|image| image.revision),
                    "Pushed output frame"
                );
                true
            }
            None => false,
        }
    }

    /// Liveness check of the current handle.
    pub fn is_surface_alive(&self) -> bool {
        self.surface
            .as_ref()
            .is_some_and(|surface| !surface.is_closed())
    }

    /// Drop the handle after the monitor found it gone.
    pub(crate) fn mark_disconnected(&mut self) {
        self.surface = None;
        self.status = OutputStatus::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use showflow_ipc::OutputConfig;

    use super::*;
    use crate::frame::StandbyImage;
    use crate::loopback::LoopbackHost;

    fn channel(host: &LoopbackHost) -> OutputChannel {
        let route = OutputRoute::from_config(&OutputConfig::default()).unwrap();
        OutputChannel::new(route, Box::new(host.clone()))
    }

    fn standby() -> StandbyImage {
        StandbyImage {
            revision: 3,
            width: 1,
            height: 1,
            pixels: Bytes::from_static(&[255, 255, 255, 255]),
        }
    }

    #[test]
    fn test_push_while_disconnected_is_dropped() {
        let host = LoopbackHost::new();
        let mut channel = channel(&host);

        assert!(!channel.push(&OutputFrame::default()));
        assert_eq!(channel.pushes(), 0);
        assert_eq!(channel.status(), OutputStatus::Disconnected);
    }

    #[test]
    fn test_connect_delivers_current_standby() {
        let host = LoopbackHost::new();
        let mut channel = channel(&host);

        let status = channel.connect(&OutputFrame::new(None, Some(standby())));
        assert_eq!(status, OutputStatus::Connected);

        let view = host.latest().unwrap();
        assert_eq!(view.layers().standby(), Some(&standby()));
        assert!(view.layers().fallback.visible);
    }

    #[test]
    fn test_refused_surface_is_blocked() {
        let host = LoopbackHost::new();
        host.set_blocked(true);
        let mut channel = channel(&host);

        assert_eq!(channel.connect(&OutputFrame::default()), OutputStatus::Blocked);
        assert!(!channel.push(&OutputFrame::default()));

        host.set_blocked(false);
        assert_eq!(channel.connect(&OutputFrame::default()), OutputStatus::Connected);
    }

    #[test]
    fn test_reconnect_reuses_live_surface() {
        let host = LoopbackHost::new();
        let mut channel = channel(&host);

        channel.connect(&OutputFrame::default());
        channel.connect(&OutputFrame::new(None, Some(standby())));

        assert_eq!(host.opened(), 1);
        assert_eq!(host.latest().unwrap().renders(), 2);
    }

    #[test]
    fn test_push_to_closed_surface_is_not_an_error() {
        let host = LoopbackHost::new();
        let mut channel = channel(&host);
        channel.connect(&OutputFrame::default());

        host.latest().unwrap().close();
        assert!(!channel.is_surface_alive());
        assert_eq!(channel.status(), OutputStatus::Connected);

        channel.push(&OutputFrame::default());
        assert_eq!(channel.status(), OutputStatus::Connected);
    }
}
