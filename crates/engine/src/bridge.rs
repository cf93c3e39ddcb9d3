//! Content sync bridge: applies saved edits to the catalog and the mounted
//! document, and reports them to the host.
//!
//! Descriptors are the single source of truth for in-session edits. A commit
//! never touches the session's `sanitized_content`; the host owns merging
//! changes into the authoritative document and deciding whether that calls
//! for a whole new session.

use bus::{Envelope, Message};
use catalog::{ELEMENT_ID_ATTR, ElementCatalog};
use core_types::{ElementId, SessionId};
use html::Node;
use html::dom_utils::set_element_text;
use html::traverse::find_element_by_attr_mut;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Emitted to the host for every applied commit or revert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub element_id: ElementId,
    pub old_text: String,
    pub new_text: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied(ChangeEvent),
    /// The id is not in the current catalog. Reported, never thrown.
    Stale,
}

pub struct ContentSyncBridge {
    origin: String,
    to_host: Sender<Envelope>,
}

impl ContentSyncBridge {
    pub fn new(origin: &str, to_host: Sender<Envelope>) -> Self {
        Self {
            origin: origin.to_string(),
            to_host,
        }
    }

    /// Apply `new_text` to the descriptor and its mounted node.
    pub fn commit(
        &self,
        session: SessionId,
        catalog: &mut ElementCatalog,
        document: Option<&mut Node>,
        id: ElementId,
        new_text: &str,
    ) -> CommitOutcome {
        let Some(descriptor) = catalog.get_mut(id) else {
            warn!("discarding stale edit for {id}: not in current catalog");
            return CommitOutcome::Stale;
        };

        let old_text = std::mem::replace(&mut descriptor.current_text, new_text.to_string());
        apply_to_document(document, id, new_text);

        let event = ChangeEvent {
            element_id: id,
            old_text,
            new_text: new_text.to_string(),
        };
        debug!("commit applied to {id}");
        self.notify(session, &event);
        CommitOutcome::Applied(event)
    }

    /// Reset the descriptor to its original text and re-apply.
    pub fn revert(
        &self,
        session: SessionId,
        catalog: &mut ElementCatalog,
        document: Option<&mut Node>,
        id: ElementId,
    ) -> CommitOutcome {
        let Some(descriptor) = catalog.get_mut(id) else {
            warn!("discarding stale revert for {id}: not in current catalog");
            return CommitOutcome::Stale;
        };

        let original = descriptor.original_text.clone();
        let old_text = std::mem::replace(&mut descriptor.current_text, original.clone());
        apply_to_document(document, id, &original);

        let event = ChangeEvent {
            element_id: id,
            old_text,
            new_text: original,
        };
        self.notify(session, &event);
        CommitOutcome::Applied(event)
    }

    fn notify(&self, session: SessionId, event: &ChangeEvent) {
        // A disconnected host just means nobody is listening anymore.
        let _ = self.to_host.send(Envelope::new(
            &self.origin,
            session,
            Message::ContentChanged {
                id: event.element_id,
                old_text: event.old_text.clone(),
                new_text: event.new_text.clone(),
            },
        ));
    }
}

/// Address the mounted node through the identifying attribute and replace
/// its text. A missing node is tolerated: the descriptor still carries the
/// edit, and the next session rebuilds the document anyway.
fn apply_to_document(document: Option<&mut Node>, id: ElementId, text: &str) {
    let Some(doc) = document else {
        return;
    };
    match find_element_by_attr_mut(doc, ELEMENT_ID_ATTR, &id.to_string()) {
        Some(node) => {
            set_element_text(node, text);
        }
        None => warn!("no mounted node carries {ELEMENT_ID_ATTR}={id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{DetectOptions, detect};
    use html::dom_utils::node_text;
    use html::{build_dom, tokenize};
    use std::sync::mpsc::channel;

    fn setup(input: &str) -> (ElementCatalog, Node) {
        let mut dom = build_dom(&tokenize(input));
        let catalog = ElementCatalog::new(detect(&mut dom, &DetectOptions::default()));
        (catalog, dom)
    }

    #[test]
    fn commit_updates_descriptor_document_and_host() {
        let (tx, rx) = channel();
        let bridge = ContentSyncBridge::new("glassbox", tx);
        let (mut catalog, mut dom) = setup("<h1>Old</h1>");
        let id = catalog.ids()[0];

        let outcome = bridge.commit(
            SessionId::from_raw(1),
            &mut catalog,
            Some(&mut dom),
            id,
            "New",
        );
        assert_eq!(
            outcome,
            CommitOutcome::Applied(ChangeEvent {
                element_id: id,
                old_text: "Old".to_string(),
                new_text: "New".to_string(),
            })
        );
        assert_eq!(catalog.get(id).unwrap().current_text, "New");
        assert_eq!(catalog.get(id).unwrap().original_text, "Old");
        assert_eq!(node_text(&dom), "New");

        let envelope = rx.recv().unwrap();
        assert!(matches!(
            envelope.message,
            Message::ContentChanged { id: eid, ref new_text, .. }
                if eid == id && new_text == "New"
        ));
    }

    #[test]
    fn stale_commit_is_a_reported_no_op() {
        let (tx, rx) = channel();
        let bridge = ContentSyncBridge::new("glassbox", tx);
        let (mut catalog, mut dom) = setup("<h1>Old</h1>");

        let ghost = ElementId::from_raw(0xdead);
        let outcome = bridge.commit(
            SessionId::from_raw(1),
            &mut catalog,
            Some(&mut dom),
            ghost,
            "x",
        );
        assert_eq!(outcome, CommitOutcome::Stale);
        assert_eq!(node_text(&dom), "Old", "document untouched");
        assert!(rx.try_recv().is_err(), "no event emitted");
    }

    #[test]
    fn commits_to_distinct_ids_do_not_interfere() {
        let (tx, _rx) = channel();
        let bridge = ContentSyncBridge::new("glassbox", tx);
        let (mut catalog, mut dom) = setup("<p>a</p><p>b</p>");
        let ids = catalog.ids();

        bridge.commit(SessionId::from_raw(1), &mut catalog, Some(&mut dom), ids[0], "A2");
        bridge.commit(SessionId::from_raw(1), &mut catalog, Some(&mut dom), ids[1], "B2");

        assert_eq!(catalog.get(ids[0]).unwrap().current_text, "A2");
        assert_eq!(catalog.get(ids[1]).unwrap().current_text, "B2");
        // Adjacent block siblings concatenate without a separator.
        assert_eq!(node_text(&dom), "A2B2");
    }

    #[test]
    fn revert_restores_original_text() {
        let (tx, _rx) = channel();
        let bridge = ContentSyncBridge::new("glassbox", tx);
        let (mut catalog, mut dom) = setup("<p>orig</p>");
        let id = catalog.ids()[0];

        bridge.commit(SessionId::from_raw(1), &mut catalog, Some(&mut dom), id, "edited");
        let outcome = bridge.revert(SessionId::from_raw(1), &mut catalog, Some(&mut dom), id);
        assert!(matches!(outcome, CommitOutcome::Applied(ev) if ev.new_text == "orig"));
        assert_eq!(catalog.get(id).unwrap().current_text, "orig");
        assert_eq!(node_text(&dom), "orig");
    }
}
