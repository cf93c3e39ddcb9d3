//! Deterministic editable-element detection.
//!
//! `detect` walks the mounted document in document order, classifies each
//! candidate into a role, derives a structural id, and stamps the node with
//! the identifying attribute the rest of the system addresses it by.
//!
//! Determinism contract: an identical DOM snapshot with identical options
//! yields an identical ordered descriptor list with identical ids. Ids are
//! derived from the structural path only, so a content-preserving re-render
//! (same structure, same or edited text) keeps every id valid. Structural
//! edits change paths and therefore rebuild the catalog with fresh ids.

use crate::descriptor::EditableElementDescriptor;
use crate::options::DetectOptions;
use crate::role::{ElementRole, classify};
use core_types::ElementId;
use html::dom_utils::own_text;
use html::Node;
use log::debug;

/// The dedicated identifying attribute stamped on every cataloged node.
/// Detection, highlighting, and commit application all address nodes
/// through this attribute and nothing else.
pub const ELEMENT_ID_ATTR: &str = "data-gb-id";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Derive the element id from its structural path: tag names and element
/// sibling indexes from the root down, e.g. `div.0/h1.0`.
fn derive_id(path: &str) -> ElementId {
    ElementId::from_raw(fnv1a(path.as_bytes()))
}

/// Detect editable elements and stamp each with [`ELEMENT_ID_ATTR`].
///
/// Returns an empty list when the document holds no element at all; callers
/// must treat empty as "not ready" and re-invoke on the next mount signal,
/// never as "nothing editable".
pub fn detect(root: &mut Node, options: &DetectOptions) -> Vec<EditableElementDescriptor> {
    if !root.children().iter().any(|c| matches!(c, Node::Element { .. })) {
        debug!("detect: document not ready, returning empty catalog");
        return Vec::new();
    }

    let mut found: Vec<(ElementRole, String, ElementId)> = Vec::new();
    let mut stamps: Vec<(ElementId, String)> = Vec::new();

    walk(root, "", false, options, &mut found, &mut stamps);

    // Stamp after the walk so the identifying attribute itself can never
    // influence candidate selection or id derivation.
    for (id, path) in &stamps {
        stamp_by_path(root, path, *id);
    }

    if options.prioritize_headings {
        // Stable partition: headings first, original order within groups.
        let (headings, rest): (Vec<_>, Vec<_>) =
            found.into_iter().partition(|(role, _, _)| role.is_heading());
        found = headings.into_iter().chain(rest).collect();
    }

    found
        .into_iter()
        .enumerate()
        .map(|(order, (role, text, id))| EditableElementDescriptor {
            id,
            role,
            original_text: text.clone(),
            current_text: text,
            order,
            attached: true,
        })
        .collect()
}

fn walk(
    node: &Node,
    path: &str,
    ancestor_selected: bool,
    options: &DetectOptions,
    found: &mut Vec<(ElementRole, String, ElementId)>,
    stamps: &mut Vec<(ElementId, String)>,
) {
    let mut element_index = 0usize;
    for child in node.children() {
        let Node::Element { name, .. } = child else {
            continue;
        };
        let child_path = if path.is_empty() {
            format!("{name}.{element_index}")
        } else {
            format!("{path}/{name}.{element_index}")
        };
        element_index += 1;

        let mut selected = false;
        if !(options.skip_nested && ancestor_selected)
            && options.tag_considered(name)
            && let Some(role) = classify(name)
        {
            let text = own_text(child);
            if text.len() >= options.min_text_len && text.len() <= options.max_text_len {
                let id = derive_id(&child_path);
                found.push((role, text, id));
                stamps.push((id, child_path.clone()));
                selected = true;
            }
        }

        walk(
            child,
            &child_path,
            ancestor_selected || selected,
            options,
            found,
            stamps,
        );
    }
}

/// Re-resolve a structural path and set the identifying attribute.
fn stamp_by_path(root: &mut Node, path: &str, id: ElementId) {
    fn resolve<'a>(node: &'a mut Node, segments: &[(&str, usize)]) -> Option<&'a mut Node> {
        let Some(((tag, index), rest)) = segments.split_first() else {
            return Some(node);
        };
        let mut element_index = 0usize;
        let children = node.children_mut()?;
        for child in children {
            if !matches!(child, Node::Element { .. }) {
                continue;
            }
            if element_index == *index {
                if child.name() != Some(*tag) {
                    return None;
                }
                return resolve(child, rest);
            }
            element_index += 1;
        }
        None
    }

    let segments: Vec<(&str, usize)> = path
        .split('/')
        .filter_map(|seg| {
            let (tag, idx) = seg.rsplit_once('.')?;
            Some((tag, idx.parse().ok()?))
        })
        .collect();

    if let Some(node) = resolve(root, &segments) {
        node.set_attr(ELEMENT_ID_ATTR, &id.to_string());
    }
}
