//! Hover/select/edit state machine.
//!
//! The controller owns the one [`InteractionState`] value and advances it in
//! response to pre-translated pointer and keyboard events. It knows nothing
//! about the DOM or rendering: the catalog hands it an ordered id list, and
//! edit commits come back out as [`Effect::Commit`] for the host to forward
//! to the sync bridge.
//!
//! Time is explicit. The hover-leave debounce records a deadline and the
//! host's event loop drives [`InteractionController::tick`]; there is no
//! internal timer thread.

use crate::state::InteractionState;
use core_types::ElementId;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct InteractionConfig {
    /// How long a pointer may be off an element (e.g. travelling onto its
    /// affordance menu) before the hover is dropped.
    pub leave_debounce: Duration,
    /// Whether Tab past the last entry wraps to the first.
    pub wrap_tab: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            leave_debounce: Duration::from_millis(200),
            wrap_tab: false,
        }
    }
}

/// What the host must do after handling an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Selection moved (or cleared); refresh highlights.
    SelectionChanged(Option<ElementId>),
    /// An edit was saved; forward to the content sync bridge.
    Commit { id: ElementId, text: String },
}

#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
    /// Catalog order, used for Tab navigation and id validation.
    entries: Vec<ElementId>,
    config: InteractionConfig,
    pending_leave: Option<(ElementId, Instant)>,
}

impl InteractionController {
    pub fn new(entries: Vec<ElementId>, config: InteractionConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            entries,
            config,
            pending_leave: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Replace the id list after a re-detection. The current selection
    /// survives only if its id is still present (content-preserving
    /// re-render); otherwise the controller falls back to Idle.
    pub fn set_entries(&mut self, entries: Vec<ElementId>) {
        self.entries = entries;
        if let Some(id) = self.state.active_id()
            && !self.entries.contains(&id)
        {
            self.state = InteractionState::Idle;
            self.pending_leave = None;
        }
    }

    /// Hard reset on a new render session. No state survives a content swap.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.entries.clear();
        self.pending_leave = None;
    }

    pub fn pointer_enter(&mut self, id: ElementId, _now: Instant) -> Effect {
        if !self.entries.contains(&id) {
            return Effect::None;
        }
        // Re-entering cancels a pending debounced leave for the same id.
        if matches!(self.pending_leave, Some((pending, _)) if pending == id) {
            self.pending_leave = None;
        }
        match self.state {
            InteractionState::Idle | InteractionState::Hovered(_) => {
                self.state = InteractionState::Hovered(id);
            }
            _ => {}
        }
        Effect::None
    }

    /// Pointer left the hovered element. The hover is not dropped until the
    /// debounce deadline passes without a re-enter, so moving onto an
    /// affordance menu spawned for the element keeps it hovered.
    pub fn pointer_leave(&mut self, now: Instant) -> Effect {
        if let InteractionState::Hovered(id) = self.state {
            self.pending_leave = Some((id, now + self.config.leave_debounce));
        }
        Effect::None
    }

    /// Resolve any expired debounce deadline.
    pub fn tick(&mut self, now: Instant) -> Effect {
        if let Some((id, deadline)) = self.pending_leave
            && now >= deadline
        {
            self.pending_leave = None;
            if self.state == InteractionState::Hovered(id) {
                self.state = InteractionState::Idle;
            }
        }
        Effect::None
    }

    pub fn click(&mut self, id: ElementId) -> Effect {
        if !self.entries.contains(&id) || self.state.is_editing() {
            return Effect::None;
        }
        if self.state == InteractionState::Selected(id) {
            return Effect::None;
        }
        self.state = InteractionState::Selected(id);
        self.pending_leave = None;
        Effect::SelectionChanged(Some(id))
    }

    pub fn click_outside(&mut self) -> Effect {
        match self.state {
            InteractionState::Selected(_) | InteractionState::Hovered(_) => {
                self.state = InteractionState::Idle;
                self.pending_leave = None;
                Effect::SelectionChanged(None)
            }
            _ => Effect::None,
        }
    }

    /// Escape clears a selection, or cancels an in-progress edit back to
    /// Selected.
    pub fn escape(&mut self) -> Effect {
        match self.state {
            InteractionState::Selected(_) => {
                self.state = InteractionState::Idle;
                Effect::SelectionChanged(None)
            }
            InteractionState::Editing(_) => self.cancel(),
            _ => Effect::None,
        }
    }

    pub fn double_click(&mut self, id: ElementId) -> Effect {
        if self.state == InteractionState::Selected(id) {
            self.state = InteractionState::Editing(id);
        }
        Effect::None
    }

    /// Enter or Space while an element is selected starts editing it.
    pub fn key_activate(&mut self) -> Effect {
        if let InteractionState::Selected(id) = self.state {
            self.state = InteractionState::Editing(id);
        }
        Effect::None
    }

    /// Tab / Shift+Tab while selected moves the selection through catalog
    /// order. Does not wrap unless configured to.
    pub fn tab(&mut self, forward: bool) -> Effect {
        let InteractionState::Selected(current) = self.state else {
            return Effect::None;
        };
        let Some(position) = self.entries.iter().position(|&e| e == current) else {
            return Effect::None;
        };
        let last = self.entries.len() - 1;
        let next = match (forward, position) {
            (true, p) if p < last => Some(p + 1),
            (true, _) if self.config.wrap_tab => Some(0),
            (false, p) if p > 0 => Some(p - 1),
            (false, _) if self.config.wrap_tab => Some(last),
            _ => None,
        };
        match next {
            Some(p) => {
                let id = self.entries[p];
                self.state = InteractionState::Selected(id);
                Effect::SelectionChanged(Some(id))
            }
            None => Effect::None,
        }
    }

    /// Commit the edit buffer. The controller reports the commit as an
    /// effect; descriptor bookkeeping belongs to the sync bridge.
    pub fn save(&mut self, text: &str) -> Effect {
        if let InteractionState::Editing(id) = self.state {
            self.state = InteractionState::Selected(id);
            Effect::Commit {
                id,
                text: text.to_string(),
            }
        } else {
            Effect::None
        }
    }

    /// Abandon the edit, returning to Selected with nothing changed.
    pub fn cancel(&mut self) -> Effect {
        if let InteractionState::Editing(id) = self.state {
            self.state = InteractionState::Selected(id);
        }
        Effect::None
    }
}
