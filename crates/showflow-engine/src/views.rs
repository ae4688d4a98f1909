//! Local monitor projections.

use showflow_ipc::{PreviewView, ProgramView};

use crate::registry::SourceRegistry;
use crate::standby::StandbySlot;
use crate::switcher::SwitcherState;

/// What the local program monitor shows.
pub fn program_view(
    state: &SwitcherState,
    registry: &SourceRegistry,
    standby: &StandbySlot,
) -> ProgramView {
    match state.program().and_then(|id| registry.get(id)) {
        Some(source) => ProgramView::Live {
            source: source.id,
            name: source.name.clone(),
        },
        None if standby.is_set() => ProgramView::Standby,
        None => ProgramView::Offline,
    }
}

/// What the local preview monitor shows.
pub fn preview_view(state: &SwitcherState, registry: &SourceRegistry) -> PreviewView {
    match state.preview().and_then(|id| registry.get(id)) {
        Some(source) => PreviewView::Showing {
            source: source.id,
            name: source.name.clone(),
        },
        None => PreviewView::Empty,
    }
}
