//! The isolated render boundary.
//!
//! Sanitized content is mounted into a private document under the fixed
//! [`Capabilities`] contract. Replacement is always full teardown-and-remount:
//! the previous document is dropped wholesale before the new one exists, so
//! no script state from one untrusted document can survive into the next.
//! The cost is a re-mount instead of a patch; the benefit is a hard reset
//! guarantee, which is the point.

mod capabilities;

pub use capabilities::Capabilities;

use html::{Node, build_dom, tokenize};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundaryError {
    /// No document context could be obtained from the content.
    #[error("no document context could be obtained")]
    NoDocument,
}

/// Lifecycle notifications for the host.
#[derive(Debug, PartialEq, Eq)]
pub enum BoundaryEvent {
    Mounted { generation: u64 },
    Replaced { generation: u64 },
}

/// Marker attribute on the injected affordance `<style>` element, so the
/// block can be removed atomically without touching content styles.
pub const AFFORDANCE_STYLE_ATTR: &str = "data-gb-affordance";

/// Hover/selection affordances for cataloged elements. Injected and removed
/// as one block, keyed off the identifying attribute, never merged into the
/// content's own styles.
const AFFORDANCE_CSS: &str = "\
[data-gb-id]{cursor:pointer}\
[data-gb-id]:hover{outline:2px dashed #6b7280;outline-offset:2px}\
[data-gb-id][data-gb-selected]{outline:2px solid #2563eb;outline-offset:2px}";

#[derive(Debug, Default)]
pub struct RenderBoundary {
    document: Option<Node>,
    generation: u64,
    edit_mode: bool,
    capabilities: Capabilities,
}

impl RenderBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Monotonic mount counter. Results computed against an older generation
    /// must be discarded by the caller.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mount sanitized content, replacing any previous document wholesale.
    ///
    /// Content that parses to no element at all counts as "no document":
    /// the boundary cannot host it and the host should surface a render
    /// error rather than an empty frame.
    pub fn mount(&mut self, sanitized_html: &str) -> Result<BoundaryEvent, BoundaryError> {
        let dom = build_dom(&tokenize(sanitized_html));
        if !dom.children().iter().any(|c| matches!(c, Node::Element { .. })) {
            return Err(BoundaryError::NoDocument);
        }

        // Teardown before remount: the old document is gone before the new
        // one is observable, and edit-mode affordances never carry over.
        self.document = None;
        self.edit_mode = false;

        self.document = Some(dom);
        self.generation += 1;
        debug!("boundary mounted generation {}", self.generation);

        if self.generation == 1 {
            Ok(BoundaryEvent::Mounted {
                generation: self.generation,
            })
        } else {
            Ok(BoundaryEvent::Replaced {
                generation: self.generation,
            })
        }
    }

    /// Drop the mounted document entirely.
    pub fn teardown(&mut self) {
        self.document = None;
        self.edit_mode = false;
    }

    pub fn document(&self) -> Option<&Node> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Node> {
        self.document.as_mut()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Toggle edit affordances. The style block is injected or removed as a
    /// single atomic unit tied to this flag.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.edit_mode == enabled {
            return;
        }
        self.edit_mode = enabled;
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        if enabled {
            inject_affordance_block(doc);
        } else {
            remove_affordance_block(doc);
        }
    }
}

fn inject_affordance_block(doc: &mut Node) {
    let style = Node::Element {
        id: html::Id(0),
        name: "style".to_string(),
        attributes: vec![(AFFORDANCE_STYLE_ATTR.to_string(), Some(String::new()))],
        children: vec![Node::Text {
            id: html::Id(0),
            text: AFFORDANCE_CSS.to_string(),
        }],
    };
    if let Some(children) = doc.children_mut() {
        children.insert(0, style);
    }
}

fn remove_affordance_block(doc: &mut Node) {
    if let Some(children) = doc.children_mut() {
        children.retain(|c| !c.has_attr(AFFORDANCE_STYLE_ATTR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_then_replace_emits_distinct_events() {
        let mut boundary = RenderBoundary::new();
        assert_eq!(
            boundary.mount("<p>one</p>"),
            Ok(BoundaryEvent::Mounted { generation: 1 })
        );
        assert_eq!(
            boundary.mount("<p>two</p>"),
            Ok(BoundaryEvent::Replaced { generation: 2 })
        );
    }

    #[test]
    fn empty_content_is_no_document() {
        let mut boundary = RenderBoundary::new();
        assert_eq!(boundary.mount(""), Err(BoundaryError::NoDocument));
        assert_eq!(boundary.mount("   \n"), Err(BoundaryError::NoDocument));
        assert_eq!(boundary.mount("just text"), Err(BoundaryError::NoDocument));
        assert!(boundary.document().is_none());
    }

    #[test]
    fn remount_replaces_document_wholesale() {
        let mut boundary = RenderBoundary::new();
        boundary.mount("<p>old</p>").unwrap();
        boundary.set_edit_mode(true);
        boundary.mount("<h1>new</h1>").unwrap();

        let doc = boundary.document().unwrap();
        assert_eq!(html::dom_utils::node_text(doc), "new");
        assert!(!boundary.edit_mode(), "edit mode does not survive a remount");
        assert!(
            html::traverse::find_element_by_attr(doc, AFFORDANCE_STYLE_ATTR, "").is_none(),
            "affordance block does not survive a remount"
        );
    }

    #[test]
    fn affordance_block_toggles_atomically() {
        let mut boundary = RenderBoundary::new();
        boundary.mount("<p>x</p>").unwrap();

        boundary.set_edit_mode(true);
        let doc = boundary.document().unwrap();
        assert!(html::traverse::find_element_by_attr(doc, AFFORDANCE_STYLE_ATTR, "").is_some());

        boundary.set_edit_mode(false);
        let doc = boundary.document().unwrap();
        assert!(html::traverse::find_element_by_attr(doc, AFFORDANCE_STYLE_ATTR, "").is_none());
    }

    #[test]
    fn set_edit_mode_is_idempotent() {
        let mut boundary = RenderBoundary::new();
        boundary.mount("<p>x</p>").unwrap();
        boundary.set_edit_mode(true);
        boundary.set_edit_mode(true);
        let doc = boundary.document().unwrap();
        let styles = doc
            .children()
            .iter()
            .filter(|c| c.has_attr(AFFORDANCE_STYLE_ATTR))
            .count();
        assert_eq!(styles, 1);
    }

    #[test]
    fn generation_increments_per_mount() {
        let mut boundary = RenderBoundary::new();
        assert_eq!(boundary.generation(), 0);
        boundary.mount("<p>a</p>").unwrap();
        boundary.mount("<p>b</p>").unwrap();
        assert_eq!(boundary.generation(), 2);
    }
}
