//! Allow-list sanitization policy.
//!
//! A policy is built once per session and never mutated afterwards. The
//! allow-list is the authoritative security gate: a tag or attribute that is
//! not explicitly permitted does not survive sanitization.

use std::collections::{HashMap, HashSet};

/// Immutable per-session sanitization policy.
#[derive(Clone, Debug)]
pub struct SanitizationPolicy {
    allowed_tags: HashSet<&'static str>,
    /// Per-tag attribute allow-list, on top of [`Self::global_attributes`].
    allowed_attributes: HashMap<&'static str, HashSet<&'static str>>,
    global_attributes: HashSet<&'static str>,
    /// Tags removed outright. Membership in `forbidden_keep_content` decides
    /// whether their children are unwrapped into the parent or dropped too.
    forbidden_tags: HashSet<&'static str>,
    forbidden_keep_content: HashSet<&'static str>,
    /// Attribute-name patterns stripped everywhere. A trailing `*` makes the
    /// pattern a prefix match; otherwise the match is exact.
    forbidden_attribute_patterns: Vec<&'static str>,
}

const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "html", "head", "body", "title", "style", // document scaffolding
    "div", "section", "article", "header", "footer", "main", "nav", "aside",
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "blockquote", "pre", "hr", "br",
    "ul", "ol", "li", "dl", "dt", "dd",
    "table", "thead", "tbody", "tfoot", "tr", "th", "td", "caption", "colgroup", "col",
    "a", "b", "i", "em", "strong", "span", "code", "small", "sub", "sup", "u", "mark",
    "img", "figure", "figcaption", "button", "label",
    "svg", "path", "circle", "rect", "line", "polyline", "polygon", "g", "text",
];

const DEFAULT_GLOBAL_ATTRIBUTES: &[&str] = &[
    "id", "class", "style", "title", "lang", "dir", "role", "tabindex",
    "aria-label", "aria-hidden", "aria-describedby", "data-gb-id",
];

const DEFAULT_FORBIDDEN_TAGS: &[&str] = &[
    "script", "iframe", "object", "embed", "applet", "base", "meta", "link",
    "form", "input", "textarea", "select", "option", "frame", "frameset",
];

/// Forbidden tags whose children survive (the wrapper is unwrapped).
/// Executable or document-controlling containers are never in this set.
const DEFAULT_FORBIDDEN_KEEP_CONTENT: &[&str] = &["form"];

const DEFAULT_FORBIDDEN_ATTRIBUTE_PATTERNS: &[&str] = &["on*", "srcdoc", "formaction"];

impl Default for SanitizationPolicy {
    fn default() -> Self {
        let mut allowed_attributes: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        allowed_attributes.insert("a", ["href", "target", "rel", "name"].into());
        allowed_attributes.insert("img", ["src", "alt", "width", "height", "loading"].into());
        allowed_attributes.insert("th", ["colspan", "rowspan", "scope"].into());
        allowed_attributes.insert("td", ["colspan", "rowspan"].into());
        allowed_attributes.insert("ol", ["start", "type", "reversed"].into());
        allowed_attributes.insert("button", ["type", "disabled"].into());
        allowed_attributes.insert("label", ["for"].into());
        allowed_attributes.insert("col", ["span"].into());
        allowed_attributes.insert(
            "svg",
            ["viewbox", "width", "height", "fill", "stroke", "xmlns"].into(),
        );
        for shape in ["path", "circle", "rect", "line", "polyline", "polygon", "g", "text"] {
            allowed_attributes.insert(
                shape,
                [
                    "d", "cx", "cy", "r", "rx", "ry", "x", "y", "x1", "y1", "x2", "y2",
                    "points", "width", "height", "fill", "stroke", "stroke-width",
                    "transform", "font-size",
                ]
                .into(),
            );
        }

        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().copied().collect(),
            allowed_attributes,
            global_attributes: DEFAULT_GLOBAL_ATTRIBUTES.iter().copied().collect(),
            forbidden_tags: DEFAULT_FORBIDDEN_TAGS.iter().copied().collect(),
            forbidden_keep_content: DEFAULT_FORBIDDEN_KEEP_CONTENT.iter().copied().collect(),
            forbidden_attribute_patterns: DEFAULT_FORBIDDEN_ATTRIBUTE_PATTERNS.to_vec(),
        }
    }
}

impl SanitizationPolicy {
    pub fn is_tag_allowed(&self, name: &str) -> bool {
        self.allowed_tags.contains(name)
    }

    pub fn is_tag_forbidden(&self, name: &str) -> bool {
        self.forbidden_tags.contains(name)
    }

    /// For a forbidden tag: should its children be unwrapped into the parent?
    pub fn keeps_content(&self, name: &str) -> bool {
        self.forbidden_keep_content.contains(name)
    }

    pub fn is_attr_allowed(&self, tag: &str, attr: &str) -> bool {
        if self.attr_matches_forbidden_pattern(attr) {
            return false;
        }
        if self.global_attributes.contains(attr) {
            return true;
        }
        self.allowed_attributes
            .get(tag)
            .is_some_and(|set| set.contains(attr))
    }

    pub fn attr_matches_forbidden_pattern(&self, attr: &str) -> bool {
        self.forbidden_attribute_patterns.iter().any(|pat| {
            if let Some(prefix) = pat.strip_suffix('*') {
                attr.len() > prefix.len() && attr.starts_with(prefix)
            } else {
                attr == *pat
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_forbids_executable_tags() {
        let policy = SanitizationPolicy::default();
        for tag in ["script", "iframe", "object", "embed", "applet"] {
            assert!(policy.is_tag_forbidden(tag), "{tag} must be forbidden");
            assert!(!policy.is_tag_allowed(tag));
        }
    }

    #[test]
    fn event_handler_attributes_match_forbidden_pattern() {
        let policy = SanitizationPolicy::default();
        assert!(policy.attr_matches_forbidden_pattern("onclick"));
        assert!(policy.attr_matches_forbidden_pattern("onerror"));
        assert!(!policy.attr_matches_forbidden_pattern("on"), "bare prefix is not a handler");
        assert!(!policy.is_attr_allowed("img", "onerror"));
    }

    #[test]
    fn per_tag_attributes_do_not_leak_across_tags() {
        let policy = SanitizationPolicy::default();
        assert!(policy.is_attr_allowed("a", "href"));
        assert!(!policy.is_attr_allowed("p", "href"));
        assert!(policy.is_attr_allowed("p", "class"), "global attrs apply everywhere");
    }

    #[test]
    fn form_unwraps_but_script_does_not() {
        let policy = SanitizationPolicy::default();
        assert!(policy.keeps_content("form"));
        assert!(!policy.keeps_content("script"));
        assert!(!policy.keeps_content("iframe"));
    }
}
