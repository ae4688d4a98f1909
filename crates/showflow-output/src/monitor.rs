//! Liveness polling of the output surface.

use std::time::Duration;

use tracing::info;

use showflow_ipc::{MonitorConfig, OutputStatus};

use crate::channel::OutputChannel;

/// Polls the output handle and reports when it disappears.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    interval: Duration,
    armed: bool,
}

impl ConnectionMonitor {
    /// Create an idle monitor.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: false,
        }
    }

    /// Create a monitor from configuration.
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(Duration::from_millis(config.poll_interval_ms.max(1)))
    }

    /// Poll period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether polling is active.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start polling after a successful connect.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop polling, e.g. after a refused connect.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// One poll tick. Returns the new status if the surface was found gone;
    /// polling then stops until the next [`arm`](Self::arm). Only a connected
    /// channel is ever moved, and only to disconnected.
    pub fn poll(&mut self, channel: &mut OutputChannel) -> Option<OutputStatus> {
        if !self.armed || !channel.status().is_connected() {
            return None;
        }

        if channel.is_surface_alive() {
            return None;
        }

        info!("Output surface gone");
        self.armed = false;
        channel.mark_disconnected();
        Some(channel.status())
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use showflow_ipc::OutputConfig;

    use super::*;
    use crate::frame::OutputFrame;
    use crate::loopback::LoopbackHost;
    use crate::route::OutputRoute;

    fn connected(host: &LoopbackHost) -> OutputChannel {
        let route = OutputRoute::from_config(&OutputConfig::default()).unwrap();
        let mut channel = OutputChannel::new(route, Box::new(host.clone()));
        channel.connect(&OutputFrame::default());
        channel
    }

    #[test]
    fn test_default_interval_is_one_second() {
        assert_eq!(ConnectionMonitor::default().interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_idle_monitor_does_nothing() {
        let host = LoopbackHost::new();
        let mut channel = connected(&host);
        host.latest().unwrap().close();

        let mut monitor = ConnectionMonitor::default();
        assert_eq!(monitor.poll(&mut channel), None);
        assert_eq!(channel.status(), OutputStatus::Connected);
    }

    #[test]
    fn test_detects_closed_surface_once() {
        let host = LoopbackHost::new();
        let mut channel = connected(&host);
        let mut monitor = ConnectionMonitor::default();
        monitor.arm();

        assert_eq!(monitor.poll(&mut channel), None);

        host.latest().unwrap().close();
        assert_eq!(monitor.poll(&mut channel), Some(OutputStatus::Disconnected));
        assert!(!monitor.is_armed());
        assert_eq!(monitor.poll(&mut channel), None);
        assert!(!channel.push(&OutputFrame::default()));
    }

    #[test]
    fn test_blocked_channel_is_left_alone() {
        let host = LoopbackHost::new();
        let mut channel = connected(&host);
        let mut monitor = ConnectionMonitor::default();
        monitor.arm();

        host.latest().unwrap().close();
        host.set_blocked(true);
        assert_eq!(channel.connect(&OutputFrame::default()), OutputStatus::Blocked);

        assert_eq!(monitor.poll(&mut channel), None);
        assert_eq!(channel.status(), OutputStatus::Blocked);
    }

    #[test]
    fn test_disarm_stops_polling() {
        let host = LoopbackHost::new();
        let mut channel = connected(&host);
        let mut monitor = ConnectionMonitor::default();
        monitor.arm();
        monitor.disarm();

        host.latest().unwrap().close();
        assert_eq!(monitor.poll(&mut channel), None);
        assert_eq!(channel.status(), OutputStatus::Connected);
    }
}
