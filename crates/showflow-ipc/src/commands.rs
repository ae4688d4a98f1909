//! Commands sent from the operator surface to the engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::SourceId;

/// Operator actions the engine understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwitcherCommand {
    /// Ask the platform picker for a new capture source.
    AddSource,

    /// Remove a source from the gallery and release its capture.
    RemoveSource(SourceId),

    /// Show a source privately on the preview monitor.
    SelectPreview(SourceId),

    /// Promote the preview selection to program.
    Take,

    /// Clear program and fall back to the standby image ("panic").
    Cut,

    /// Replace the standby image with the given file.
    UploadStandby { path: PathBuf },

    /// Open (or re-sync) the output surface.
    OpenOutput,

    /// Dismiss the current error notification.
    DismissError,

    /// Request a fresh state snapshot.
    GetState,

    /// Shut the engine down.
    Shutdown,
}
