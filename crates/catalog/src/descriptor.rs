use crate::role::ElementRole;
use core_types::ElementId;
use serde::{Deserialize, Serialize};

/// One catalog entry describing a user-editable node.
///
/// `original_text` is what detection found; `current_text` tracks in-session
/// edits. Descriptors are the single source of truth for edits until the
/// host regenerates a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditableElementDescriptor {
    pub id: ElementId,
    pub role: ElementRole,
    pub original_text: String,
    pub current_text: String,
    /// Position in catalog order (post heading prioritization).
    pub order: usize,
    /// False once the backing DOM node is gone (session torn down).
    pub attached: bool,
}

impl EditableElementDescriptor {
    pub fn is_dirty(&self) -> bool {
        self.current_text != self.original_text
    }
}
