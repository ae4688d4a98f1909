//! Typed operator<->switcher messages for ShowFlow.
//!
//! This crate defines the message and value types exchanged between the
//! operator surface and the switcher engine, plus the shared configuration.

mod commands;
mod config;
mod events;
mod state;
mod types;

pub use commands::SwitcherCommand;
pub use config::{CaptureConfig, ConfigError, MonitorConfig, OutputConfig, ShowflowConfig};
pub use events::SwitcherEvent;
pub use state::{OutputStatus, PreviewView, ProgramView, SwitcherSnapshot};
pub use types::{SourceId, SourceInfo};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (operator → engine).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (engine → operator).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<SwitcherCommand>, Receiver<SwitcherCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<SwitcherEvent>, Receiver<SwitcherEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
