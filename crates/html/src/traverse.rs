use crate::types::{Id, Node};

/// Assign sequential node ids in document order, skipping nodes that
/// already have one.
pub fn assign_node_ids(root: &mut Node) {
    fn walk(node: &mut Node, next: &mut u32) {
        if node.id() == Id(0) {
            let id = Id(*next);
            *next = next.wrapping_add(1);
            node.set_id(id);
        }
        if let Some(children) = node.children_mut() {
            for c in children {
                walk(c, next);
            }
        }
    }

    let mut next = 1;
    walk(root, &mut next);
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    for c in node.children() {
        if let Some(found) = find_node_by_id(c, id) {
            return Some(found);
        }
    }
    None
}

/// First element (document order) whose attribute `key` equals `value`.
pub fn find_element_by_attr<'a>(node: &'a Node, key: &str, value: &str) -> Option<&'a Node> {
    if matches!(node, Node::Element { .. }) && node.attr(key) == Some(value) {
        return Some(node);
    }
    for c in node.children() {
        if let Some(found) = find_element_by_attr(c, key, value) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_element_by_attr`].
pub fn find_element_by_attr_mut<'a>(
    node: &'a mut Node,
    key: &str,
    value: &str,
) -> Option<&'a mut Node> {
    if matches!(node, Node::Element { .. }) && node.attr(key) == Some(value) {
        return Some(node);
    }
    if let Some(children) = node.children_mut() {
        for c in children {
            if let Some(found) = find_element_by_attr_mut(c, key, value) {
                return Some(found);
            }
        }
    }
    None
}
