//! DOM → HTML string serialization.
//!
//! The output is the canonical form the sanitizer emits: lowercase tag names,
//! double-quoted attributes, text and attribute values re-escaped. Parsing the
//! output and serializing it again yields the same string, which is what makes
//! the sanitizer idempotent.

use crate::tokenizer::is_void_element;
use crate::types::Node;

/// Escape text-node content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value for a double-quoted position.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize a DOM subtree to an HTML string.
pub fn serialize(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(dt) = doctype {
                out.push_str("<!");
                out.push_str(dt);
                out.push('>');
            }
            for child in children {
                write_node(child, out);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                if let Some(v) = value {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            if name == "script" || name == "style" {
                // Rawtext bodies are emitted verbatim; the sanitizer has
                // already decided whether this element may exist at all.
                for child in children {
                    if let Node::Text { text, .. } = child {
                        out.push_str(text);
                    }
                }
            } else {
                for child in children {
                    write_node(child, out);
                }
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text, .. } => {
            out.push_str(&escape_text(text));
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom_builder::build_dom;
    use crate::tokenizer::tokenize;

    fn roundtrip(input: &str) -> String {
        serialize(&build_dom(&tokenize(input)))
    }

    #[test]
    fn serializes_simple_tree() {
        assert_eq!(
            roundtrip("<div class=\"a\"><p>hi</p></div>"),
            "<div class=\"a\"><p>hi</p></div>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let html = roundtrip("<p title=\"a &amp; b\">1 &lt; 2</p>");
        assert_eq!(html, "<p title=\"a &amp; b\">1 &lt; 2</p>");
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        assert_eq!(roundtrip("<p><br></p>"), "<p><br></p>");
        assert_eq!(roundtrip("<img src=\"x\">"), "<img src=\"x\">");
    }

    #[test]
    fn serialized_output_is_a_fixed_point() {
        let once = roundtrip("<DIV ID=a>x &amp; <B>y</B><br></DIV>");
        let twice = roundtrip(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn valueless_attribute_keeps_bare_form() {
        assert_eq!(roundtrip("<p hidden>x</p>"), "<p hidden>x</p>");
    }

    #[test]
    fn doctype_preserved() {
        let html = roundtrip("<!DOCTYPE html><p>x</p>");
        assert_eq!(html, "<!DOCTYPE html><p>x</p>");
    }
}
