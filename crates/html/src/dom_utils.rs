use crate::types::Node;

/// Concatenated descendant text with runs of whitespace collapsed to a
/// single space and the result trimmed.
pub fn node_text(node: &Node) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    collapse_whitespace(&out)
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text, .. } => out.push_str(text),
        Node::Element { children, .. } | Node::Document { children, .. } => {
            for c in children {
                collect_text(c, out);
            }
        }
        _ => {}
    }
}

/// Text belonging directly to this element: its own text children plus text
/// inside pure inline formatting descendants (`b`, `i`, `em`, `strong`,
/// `span`, `code`, `small`, `sub`, `sup`, `u`, `a`). Text inside block-level
/// descendants is *not* included, so a `<div>` wrapping paragraphs reports
/// no own text.
pub fn own_text(node: &Node) -> String {
    let mut out = String::new();
    fn walk(node: &Node, out: &mut String) {
        for c in node.children() {
            match c {
                Node::Text { text, .. } => out.push_str(text),
                Node::Element { name, .. } if is_inline_formatting(name) => walk(c, out),
                _ => {}
            }
        }
    }
    walk(node, &mut out);
    collapse_whitespace(&out)
}

fn is_inline_formatting(name: &str) -> bool {
    matches!(
        name,
        "b" | "i" | "em" | "strong" | "span" | "code" | "small" | "sub" | "sup" | "u" | "a"
    )
}

pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            in_ws = true;
            continue;
        }
        if in_ws && !out.is_empty() {
            out.push(' ');
        }
        in_ws = false;
        out.push(ch);
    }
    out
}

/// Replace all text content of an element with a single text node,
/// preserving the element itself and its attributes. Returns false on
/// non-element nodes.
pub fn set_element_text(node: &mut Node, new_text: &str) -> bool {
    match node {
        Node::Element { children, .. } => {
            children.clear();
            children.push(Node::Text {
                id: crate::types::Id(0),
                text: new_text.to_string(),
            });
            true
        }
        _ => false,
    }
}
