//! Preview/program switcher core for ShowFlow.
//!
//! This crate owns the source gallery, the preview/program state machine and
//! the standby image, and keeps the output surface in step with them.

mod error;
mod orchestrator;
mod registry;
mod standby;
mod switcher;
mod views;

pub use error::EngineError;
pub use orchestrator::{Engine, PlatformSignal};
pub use registry::{Admission, Source, SourceRegistry};
pub use standby::{StandbyError, StandbySlot};
pub use switcher::{Forgotten, Phase, SwitcherState};
pub use views::{preview_view, program_view};

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use showflow_capture::CapturePlatform;
use showflow_ipc::{ShowflowConfig, SwitcherCommand, SwitcherEvent};
use showflow_output::SurfaceHost;

/// Create an engine instance with IPC channels.
pub fn create_engine(
    config: &ShowflowConfig,
    command_rx: Receiver<SwitcherCommand>,
    event_tx: Sender<SwitcherEvent>,
    platform: Arc<dyn CapturePlatform>,
    host: Box<dyn SurfaceHost>,
) -> Result<Engine, EngineError> {
    Engine::new(config, command_rx, event_tx, platform, host)
}
