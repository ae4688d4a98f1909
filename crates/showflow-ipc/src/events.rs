//! Events sent from the engine to the operator surface.

use serde::{Deserialize, Serialize};

use crate::state::{OutputStatus, SwitcherSnapshot};

/// Events that the engine can send to the operator surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwitcherEvent {
    /// Engine is ready to accept commands.
    Ready,

    /// Switcher state has changed.
    StateChanged(Box<SwitcherSnapshot>),

    /// Output surface status has changed.
    OutputStatusChanged {
        /// Previous status.
        previous: OutputStatus,

        /// Current status.
        current: OutputStatus,
    },

    /// Dismissible operator notification (acquisition fault, decode failure).
    Notification {
        /// Message to show.
        message: String,
    },

    /// Engine has shut down.
    Shutdown,
}
