//! Deterministic element detection and the per-session editable-element
//! catalog.
//!
//! One catalog exists per render session. It is rebuilt wholesale whenever
//! the sanitized content changes — never mutated to track a new document —
//! so descriptor ids can never refer across sessions.

mod descriptor;
mod detect;
mod options;
mod role;

pub use descriptor::EditableElementDescriptor;
pub use detect::{ELEMENT_ID_ATTR, detect};
pub use options::DetectOptions;
pub use role::{ElementRole, classify};

use core_types::ElementId;
use std::collections::HashMap;

/// Ordered, addressable collection of editable-element descriptors.
#[derive(Clone, Debug, Default)]
pub struct ElementCatalog {
    entries: Vec<EditableElementDescriptor>,
    by_id: HashMap<ElementId, usize>,
}

impl ElementCatalog {
    pub fn new(entries: Vec<EditableElementDescriptor>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(index, d)| (d.id, index))
            .collect();
        Self { entries, by_id }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&EditableElementDescriptor> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut EditableElementDescriptor> {
        self.by_id.get(&id).map(|&i| &mut self.entries[i])
    }

    /// Descriptors in catalog order.
    pub fn entries(&self) -> &[EditableElementDescriptor] {
        &self.entries
    }

    /// Ids in catalog order, for keyboard navigation.
    pub fn ids(&self) -> Vec<ElementId> {
        self.entries.iter().map(|d| d.id).collect()
    }

    /// Mark every descriptor detached (backing DOM is gone).
    pub fn detach_all(&mut self) {
        for entry in &mut self.entries {
            entry.attached = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::{build_dom, tokenize};

    fn catalog_for(input: &str) -> ElementCatalog {
        let mut dom = build_dom(&tokenize(input));
        ElementCatalog::new(detect(&mut dom, &DetectOptions::default()))
    }

    #[test]
    fn lookup_by_id_matches_order() {
        let catalog = catalog_for("<h1>A</h1><p>B</p>");
        assert_eq!(catalog.len(), 2);
        let ids = catalog.ids();
        assert_eq!(catalog.get(ids[0]).unwrap().original_text, "A");
        assert_eq!(catalog.get(ids[1]).unwrap().original_text, "B");
        assert!(!catalog.contains(core_types::ElementId::from_raw(0)));
    }

    #[test]
    fn detach_all_marks_every_entry() {
        let mut catalog = catalog_for("<p>a</p><p>b</p>");
        catalog.detach_all();
        assert!(catalog.entries().iter().all(|d| !d.attached));
    }
}
