//! Interaction roles for editable elements.
//!
//! A node is classified into exactly one role at detection time; every later
//! decision (affordances, keyboard behavior, highlighting) dispatches on the
//! role instead of re-inspecting tag names.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementRole {
    Heading,
    Paragraph,
    Button,
    Link,
    ListItem,
    Caption,
    Label,
    Text,
}

/// Classify a (lowercase) tag name into a role, or `None` for tags that are
/// never editable.
pub fn classify(tag: &str) -> Option<ElementRole> {
    let role = match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => ElementRole::Heading,
        "p" | "blockquote" | "pre" => ElementRole::Paragraph,
        "button" => ElementRole::Button,
        "a" => ElementRole::Link,
        "li" | "dt" | "dd" => ElementRole::ListItem,
        "caption" | "figcaption" => ElementRole::Caption,
        "label" => ElementRole::Label,
        "span" | "div" | "td" | "th" | "em" | "strong" | "b" | "i" | "code" | "mark"
        | "small" => ElementRole::Text,
        _ => return None,
    };
    Some(role)
}

impl ElementRole {
    pub fn is_heading(self) -> bool {
        matches!(self, ElementRole::Heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_classify_for_all_levels() {
        for tag in ["h1", "h2", "h3", "h4", "h5", "h6"] {
            assert_eq!(classify(tag), Some(ElementRole::Heading));
        }
    }

    #[test]
    fn structural_tags_are_not_editable() {
        for tag in ["html", "body", "ul", "table", "tr", "img", "br", "style"] {
            assert_eq!(classify(tag), None, "{tag} must not classify");
        }
    }
}
