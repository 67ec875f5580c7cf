use serde::{Deserialize, Serialize};

/// Whether the session holds edits the backend has not confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    #[default]
    Clean,
    Dirty,
}

/// Dirty-state gate for the work-step table.
///
/// `Clean -> Dirty` on any detected edit or an explicit add-row.
/// `Dirty -> Clean` only after a confirmed save or a fresh load.
#[derive(Debug, Clone, Default)]
pub struct DirtyGate {
    state: GateState,
}

impl DirtyGate {
    pub fn new() -> Self {
        DirtyGate::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == GateState::Dirty
    }

    pub fn mark_dirty(&mut self) {
        self.state = GateState::Dirty;
    }

    pub fn mark_clean(&mut self) {
        self.state = GateState::Clean;
    }

    /// The save action is only actionable while dirty
    pub fn can_save(&self) -> bool {
        self.is_dirty()
    }

    /// Navigation to another screen is refused while dirty when `locked`
    pub fn allows_navigation(&self, locked: bool) -> bool {
        !(locked && self.is_dirty())
    }
}
