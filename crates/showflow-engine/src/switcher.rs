//! Preview/program state machine.

use tracing::debug;

use showflow_ipc::SourceId;

/// Phase derived from the two selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected.
    Idle,

    /// A preview is selected and nothing is on air.
    Previewing,

    /// A source is on air.
    Live,
}

/// What forgetting a removed source did to the selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Forgotten {
    /// The source was the preview selection.
    pub preview_cleared: bool,

    /// The source was on air and program was cut.
    pub program_cut: bool,
}

/// Preview and program selections.
///
/// Program holds at most one id and only [`take`](Self::take) can set it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitcherState {
    preview: Option<SourceId>,
    program: Option<SourceId>,
}

impl SwitcherState {
    /// Idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preview selection.
    pub fn preview(&self) -> Option<SourceId> {
        self.preview
    }

    /// Program selection.
    pub fn program(&self) -> Option<SourceId> {
        self.program
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match (self.preview, self.program) {
            (_, Some(_)) => Phase::Live,
            (Some(_), None) => Phase::Previewing,
            (None, None) => Phase::Idle,
        }
    }

    /// Select a source for preview. The caller checks that it exists.
    pub fn select_preview(&mut self, id: SourceId) {
        self.preview = Some(id);
    }

    /// Promote preview to program. No-op without a preview; returns whether
    /// it applied.
    pub fn take(&mut self) -> bool {
        let Some(preview) = self.preview else {
            return false;
        };

        let previous = self.program.replace(preview);
        debug!(?previous, current = %preview, "Take");
        true
    }

    /// Clear program. Returns the id that was on air, if any.
    pub fn cut(&mut self) -> Option<SourceId> {
        let previous = self.program.take();
        debug!(?previous, "Cut");
        previous
    }

    /// Drop every reference to a source that is going away, cutting first if
    /// it is on air.
    pub fn forget(&mut self, id: SourceId) -> Forgotten {
        let mut forgotten = Forgotten::default();

        if self.program == Some(id) {
            self.cut();
            forgotten.program_cut = true;
        }
        if self.preview == Some(id) {
            self.preview = None;
            forgotten.preview_cleared = true;
        }

        forgotten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_without_preview_is_noop() {
        let mut state = SwitcherState::new();
        assert!(!state.take());
        assert_eq!(state.program(), None);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_take_promotes_preview() {
        let a = SourceId::new();
        let mut state = SwitcherState::new();

        state.select_preview(a);
        assert_eq!(state.phase(), Phase::Previewing);

        assert!(state.take());
        assert_eq!(state.program(), Some(a));
        assert_eq!(state.preview(), Some(a));
        assert_eq!(state.phase(), Phase::Live);
    }

    #[test]
    fn test_select_preview_keeps_program() {
        let (a, b) = (SourceId::new(), SourceId::new());
        let mut state = SwitcherState::new();
        state.select_preview(a);
        state.take();

        state.select_preview(b);
        assert_eq!(state.program(), Some(a));
        assert_eq!(state.preview(), Some(b));

        state.take();
        assert_eq!(state.program(), Some(b));
    }

    #[test]
    fn test_cut_is_idempotent() {
        let a = SourceId::new();
        let mut state = SwitcherState::new();
        state.select_preview(a);
        state.take();

        assert_eq!(state.cut(), Some(a));
        let once = state;
        assert_eq!(state.cut(), None);
        assert_eq!(state, once);
        assert_eq!(state.program(), None);
        assert_eq!(state.preview(), Some(a));
    }

    #[test]
    fn test_forget_program_source_cuts() {
        let a = SourceId::new();
        let mut state = SwitcherState::new();
        state.select_preview(a);
        state.take();

        let forgotten = state.forget(a);
        assert!(forgotten.program_cut);
        assert!(forgotten.preview_cleared);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_forget_other_source_changes_nothing() {
        let (a, b) = (SourceId::new(), SourceId::new());
        let mut state = SwitcherState::new();
        state.select_preview(a);
        state.take();

        let before = state;
        assert_eq!(state.forget(b), Forgotten::default());
        assert_eq!(state, before);
    }
}
