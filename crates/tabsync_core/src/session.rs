//! Edit session state machine.

use tabsync_model::RowId;

/// The current state of an edit session.
///
/// A tagged state rather than a nullable field, so the transitions are
/// explicit and testable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No row is being edited.
    #[default]
    Idle,
    /// Exactly this row is open for in-place editing.
    Editing(RowId),
}

impl EditState {
    /// Returns true while a row is being edited.
    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing(_))
    }

    /// Returns the edit target, if any.
    pub fn target(&self) -> Option<&RowId> {
        match self {
            EditState::Idle => None,
            EditState::Editing(id) => Some(id),
        }
    }
}

/// Single-row-at-a-time edit state machine.
///
/// At most one row is mutable at any time; this is the structural
/// mutual exclusion that bounds in-flight saves to one per dataset.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Returns the edit target, if any.
    pub fn target(&self) -> Option<&RowId> {
        self.state.target()
    }

    /// Moves to Editing on the given row.
    ///
    /// Beginning a new edit while another row is active silently
    /// switches the target; the abandoned target is returned so a
    /// caller may surface it.
    pub fn begin(&mut self, id: RowId) -> Option<RowId> {
        let previous = std::mem::replace(&mut self.state, EditState::Editing(id));
        match previous {
            EditState::Editing(old) => Some(old),
            EditState::Idle => None,
        }
    }

    /// Moves to Idle, returning the target that was active.
    pub fn clear(&mut self) -> Option<RowId> {
        match std::mem::take(&mut self.state) {
            EditState::Editing(old) => Some(old),
            EditState::Idle => None,
        }
    }
}
