//! Switcher state as reported to the operator surface.

use serde::{Deserialize, Serialize};

use crate::types::{SourceId, SourceInfo};

/// Status of the output surface connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputStatus {
    /// Never opened, or closed by the user.
    #[default]
    Disconnected,

    /// A surface handle exists and the latest liveness check succeeded.
    Connected,

    /// The host refused to create the surface.
    Blocked,
}

impl OutputStatus {
    /// Check if connected.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if surface creation was refused.
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// Status text for the operator.
    pub fn message(self) -> &'static str {
        match self {
            Self::Disconnected => "No Projector",
            Self::Connected => "Display Connected",
            Self::Blocked => "Popup Blocked",
        }
    }
}

/// What the local program monitor shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramView {
    /// A source is on air.
    Live { source: SourceId, name: String },

    /// Nothing is live and a standby image is set.
    Standby,

    /// Nothing is live and no standby image exists ("Signal Offline").
    Offline,
}

impl ProgramView {
    /// Returns true if a source is on air.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }
}

/// What the local preview monitor shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewView {
    /// A source is selected for preview.
    Showing { source: SourceId, name: String },

    /// No preview selection ("Select a Source Below").
    Empty,
}

/// Complete operator-facing view of the switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitcherSnapshot {
    /// Gallery, in insertion order.
    pub sources: Vec<SourceInfo>,

    /// Current preview selection.
    pub preview_id: Option<SourceId>,

    /// Current program selection.
    pub program_id: Option<SourceId>,

    /// Local preview monitor contents.
    pub preview: PreviewView,

    /// Local program monitor contents.
    pub program: ProgramView,

    /// Whether a standby image is loaded.
    pub has_standby: bool,

    /// Output surface status.
    pub output_status: OutputStatus,

    /// Pending acquisition requests.
    pub pending_acquisitions: usize,

    /// Current undismissed notification.
    pub error_message: Option<String>,
}

impl SwitcherSnapshot {
    /// Number of sources in the gallery.
    pub fn available(&self) -> usize {
        self.sources.len()
    }

    /// Whether `Take` would do anything.
    pub fn can_take(&self) -> bool {
        self.preview_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_status_messages() {
        assert_eq!(OutputStatus::default(), OutputStatus::Disconnected);
        assert_eq!(OutputStatus::Connected.message(), "Display Connected");
        assert_eq!(OutputStatus::Disconnected.message(), "No Projector");
        assert!(OutputStatus::Blocked.is_blocked());
        assert!(!OutputStatus::Blocked.is_connected());
    }
}
