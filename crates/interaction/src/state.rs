//! The single interaction state value.

use core_types::ElementId;

/// Exactly one element may be hovered, selected, or edited at any time.
/// That invariant is structural: the whole interaction layer shares this one
/// value, and there are no per-element flags anywhere that could drift out
/// of sync with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovered(ElementId),
    Selected(ElementId),
    Editing(ElementId),
}

impl InteractionState {
    /// The element the state refers to, if any.
    pub fn active_id(self) -> Option<ElementId> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Hovered(id)
            | InteractionState::Selected(id)
            | InteractionState::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(self) -> bool {
        matches!(self, InteractionState::Editing(_))
    }

    pub fn selected_id(self) -> Option<ElementId> {
        match self {
            InteractionState::Selected(id) | InteractionState::Editing(id) => Some(id),
            _ => None,
        }
    }
}
