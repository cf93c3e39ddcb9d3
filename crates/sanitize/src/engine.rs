//! Allow-list sanitization pipeline.
//!
//! Order is load-bearing:
//! 1. normalization (tokenizer entity decoding + tabulated attribute repair) —
//!    best-effort, non-authoritative;
//! 2. allow-list filtering over the parsed tree — the authoritative gate;
//! 3. serialization back to HTML.
//!
//! The repair pass exists to salvage slightly malformed generator output. It
//! must never be relied on for safety: anything it fails to normalize is
//! still subject to the allow-list, which drops what it does not recognize.

use crate::policy::SanitizationPolicy;
use html::{Id, Node, Token, build_dom, serialize, tokenize};
use log::warn;
use std::collections::HashMap;
use url::Url;

/// Substituted wholesale when sanitization itself faults. Must be a fixed
/// point of `sanitize` under the default policy.
pub const SAFE_PLACEHOLDER: &str = "<p>[content unavailable]</p>";

/// Inputs larger than this are refused outright rather than parsed.
const MAX_INPUT_LEN: usize = 4 * 1024 * 1024;

/// Deeper trees than this are treated as hostile.
const MAX_DEPTH: usize = 256;

/// Attributes whose values are URLs and need scheme screening.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "poster", "xlink:href"];

/// Replacement for a neutralized URL value. Never the original.
const NEUTRALIZED_URL: &str = "#";

#[derive(Debug, PartialEq, Eq)]
enum SanitizeFault {
    InputTooLarge(usize),
    TreeTooDeep,
}

/// Sanitize raw HTML against the policy.
///
/// Never panics outward: an internal fault substitutes [`SAFE_PLACEHOLDER`]
/// and logs a warning. Idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str, policy: &SanitizationPolicy) -> String {
    match sanitize_inner(raw, policy) {
        Ok(clean) => clean,
        Err(fault) => {
            warn!("sanitization fault, substituting placeholder: {fault:?}");
            SAFE_PLACEHOLDER.to_string()
        }
    }
}

fn sanitize_inner(raw: &str, policy: &SanitizationPolicy) -> Result<String, SanitizeFault> {
    if raw.len() > MAX_INPUT_LEN {
        return Err(SanitizeFault::InputTooLarge(raw.len()));
    }

    let mut tokens = tokenize(raw);
    repair_tokens(&mut tokens);

    // Depth is capped on the token stream, before any tree exists: the
    // builder, the filter walk, and the tree's drop all recurse per nesting
    // level, so a tree deeper than the cap must never be constructed.
    if max_open_depth(&tokens) > MAX_DEPTH {
        return Err(SanitizeFault::TreeTooDeep);
    }

    let dom = build_dom(&tokens);

    let filtered = filter_node(&dom, policy)
        .pop()
        .unwrap_or(Node::Document {
            id: Id(0),
            doctype: None,
            children: Vec::new(),
        });
    Ok(serialize(&filtered))
}

/// Tabulated, best-effort attribute repair. Exactly two transformations:
/// value whitespace/stray-quote trimming and first-wins duplicate collapse.
/// Anything else the generator got wrong is left for the allow-list.
fn repair_tokens(tokens: &mut [Token]) {
    for token in tokens {
        let Token::StartTag { attributes, .. } = token else {
            continue;
        };
        for (_, value) in attributes.iter_mut() {
            if let Some(v) = value {
                let trimmed = v.trim().trim_matches(|c| c == '"' || c == '\'').trim();
                if trimmed != v {
                    *value = Some(trimmed.to_string());
                }
            }
        }
        let mut seen: Vec<String> = Vec::new();
        attributes.retain(|(k, _)| {
            if seen.iter().any(|s| s == k) {
                false
            } else {
                seen.push(k.clone());
                true
            }
        });
    }
}

/// Deepest open-element nesting the token stream would build, computed with
/// the same end-tag matching rules as the DOM builder: an end tag pops to the
/// nearest matching open element and is ignored when nothing matches, so
/// stray end tags cannot understate the depth. Open-name counts keep the
/// membership check constant-time on adversarial streams.
fn max_open_depth(tokens: &[Token]) -> usize {
    let mut open: Vec<&str> = Vec::new();
    let mut open_counts: HashMap<&str, usize> = HashMap::new();
    let mut deepest = 0;
    for token in tokens {
        match token {
            Token::StartTag {
                name, self_closing, ..
            } if !*self_closing => {
                open.push(name);
                *open_counts.entry(name).or_insert(0) += 1;
                deepest = deepest.max(open.len());
            }
            Token::EndTag(name) => {
                if open_counts.get(name.as_str()).copied().unwrap_or(0) > 0 {
                    while let Some(popped) = open.pop() {
                        if let Some(count) = open_counts.get_mut(popped) {
                            *count -= 1;
                        }
                        if popped == name.as_str() {
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    deepest
}

/// The authoritative allow-list walk. Returns the surviving replacement
/// nodes for `node` (empty = dropped, multiple = unwrapped children).
fn filter_node(node: &Node, policy: &SanitizationPolicy) -> Vec<Node> {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            let filtered = children
                .iter()
                .flat_map(|c| filter_node(c, policy))
                .collect();
            vec![Node::Document {
                id: Id(0),
                doctype: doctype.clone(),
                children: filtered,
            }]
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            if policy.is_tag_forbidden(name) {
                return if policy.keeps_content(name) {
                    children
                        .iter()
                        .flat_map(|c| filter_node(c, policy))
                        .collect()
                } else {
                    Vec::new()
                };
            }
            if !policy.is_tag_allowed(name) {
                // Unknown tag: unwrap, keeping the children.
                return children
                    .iter()
                    .flat_map(|c| filter_node(c, policy))
                    .collect();
            }

            let mut kept_attributes: Vec<(String, Option<String>)> = Vec::new();
            for (key, value) in attributes {
                if !policy.is_attr_allowed(name, key) {
                    continue;
                }
                let value = match value {
                    Some(v) if is_url_attribute(key) && is_dangerous_url(v) => {
                        Some(NEUTRALIZED_URL.to_string())
                    }
                    other => other.clone(),
                };
                kept_attributes.push((key.clone(), value));
            }

            let filtered_children = children
                .iter()
                .flat_map(|c| filter_node(c, policy))
                .collect();

            let mut element = Node::Element {
                id: Id(0),
                name: name.clone(),
                attributes: kept_attributes,
                children: filtered_children,
            };
            if name == "a" {
                harden_external_link(&mut element);
            }
            vec![element]
        }
        Node::Text { text, .. } => vec![Node::Text {
            id: Id(0),
            text: text.clone(),
        }],
        // Comments carry no renderable content and are a classic smuggling
        // channel; they do not survive the allow-list.
        Node::Comment { .. } => Vec::new(),
    }
}

fn is_url_attribute(key: &str) -> bool {
    URL_ATTRIBUTES.contains(&key)
}

/// Scheme screening on a URL value. Whitespace and ASCII control characters
/// are removed before inspection so `java\nscript:` cannot slip through.
fn is_dangerous_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if compact.starts_with("javascript:") || compact.starts_with("vbscript:") {
        return true;
    }
    compact.starts_with("data:") && compact.contains("text/html")
}

/// Add `rel="noopener noreferrer"` to absolute http(s) links lacking it.
fn harden_external_link(element: &mut Node) {
    let Some(href) = element.attr("href") else {
        return;
    };
    let is_external = Url::parse(href)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !is_external {
        return;
    }
    let mut tokens: Vec<String> = element
        .attr("rel")
        .map(|rel| rel.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    for required in ["noopener", "noreferrer"] {
        if !tokens.iter().any(|t| t.eq_ignore_ascii_case(required)) {
            tokens.push(required.to_string());
        }
    }
    element.set_attr("rel", &tokens.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clean(raw: &str) -> String {
        sanitize(raw, &SanitizationPolicy::default())
    }

    #[test]
    fn drops_script_keeps_siblings() {
        assert_eq!(
            clean("<div><script>alert(1)</script><h1>Hi</h1></div>"),
            "<div><h1>Hi</h1></div>"
        );
    }

    #[test]
    fn strips_event_handler_attributes() {
        assert_eq!(
            clean("<img src=\"x.png\" onerror=\"alert(1)\">"),
            "<img src=\"x.png\">"
        );
        assert_eq!(clean("<p onclick=\"x()\">hi</p>"), "<p>hi</p>");
    }

    #[test]
    fn neutralizes_javascript_urls() {
        let out = clean("<a href=\"javascript:alert(1)\">x</a>");
        assert!(!out.contains("javascript:"), "got: {out}");
        assert_eq!(out, "<a href=\"#\">x</a>");
    }

    #[test]
    fn neutralizes_obfuscated_javascript_scheme() {
        let out = clean("<a href=\"java\tscript:alert(1)\">x</a>");
        assert_eq!(out, "<a href=\"#\">x</a>");
    }

    #[test]
    fn neutralizes_data_text_html_urls() {
        let out = clean("<a href=\"data:text/html,<script>1</script>\">x</a>");
        assert_eq!(out, "<a href=\"#\">x</a>");
    }

    #[test]
    fn allows_plain_data_image_urls() {
        let out = clean("<img src=\"data:image/png;base64,AAAA\">");
        assert!(out.contains("data:image/png"), "got: {out}");
    }

    #[test]
    fn hardens_external_links() {
        assert_eq!(
            clean("<a href=\"https://example.com\">x</a>"),
            "<a href=\"https://example.com\" rel=\"noopener noreferrer\">x</a>"
        );
    }

    #[test]
    fn keeps_existing_rel_tokens() {
        let out = clean("<a href=\"https://example.com\" rel=\"external\">x</a>");
        assert_eq!(
            out,
            "<a href=\"https://example.com\" rel=\"external noopener noreferrer\">x</a>"
        );
    }

    #[test]
    fn relative_links_are_not_hardened() {
        assert_eq!(clean("<a href=\"/about\">x</a>"), "<a href=\"/about\">x</a>");
    }

    #[test]
    fn unknown_tags_unwrap_keeping_children() {
        assert_eq!(clean("<widget><p>kept</p></widget>"), "<p>kept</p>");
    }

    #[test]
    fn forbidden_containers_drop_content_forms_unwrap() {
        assert_eq!(clean("<iframe><p>gone</p></iframe>"), "");
        assert_eq!(clean("<form><p>kept</p></form>"), "<p>kept</p>");
    }

    #[test]
    fn strips_comments() {
        assert_eq!(clean("<p>a</p><!-- hidden -->"), "<p>a</p>");
    }

    #[test]
    fn repairs_stray_quotes_and_duplicate_attributes() {
        assert_eq!(
            clean("<p class=\" lead' \" class=\"second\">x</p>"),
            "<p class=\"lead\">x</p>"
        );
    }

    #[test]
    fn idempotent_over_adversarial_corpus() {
        let corpus = [
            "<div><script>alert(1)</script><h1>Hi</h1></div>",
            "<a href=\"javascript:alert(1)\" onclick=x>x</a>",
            "<a href=\"https://example.com\">x</a>",
            "plain text & ampersand < bracket",
            "<widget><b>deep</b></widget>",
            "<IMG SRC=x ONERROR=alert(1)>",
            "<p>café ☕</p>",
            "<style>h1{color:red}</style><h1>t</h1>",
            SAFE_PLACEHOLDER,
        ];
        let policy = SanitizationPolicy::default();
        for raw in corpus {
            let once = sanitize(raw, &policy);
            let twice = sanitize(&once, &policy);
            assert_eq!(once, twice, "not idempotent for input: {raw}");
        }
    }

    #[test]
    fn placeholder_is_a_fixed_point() {
        assert_eq!(clean(SAFE_PLACEHOLDER), SAFE_PLACEHOLDER);
    }

    #[test]
    fn oversized_input_yields_placeholder() {
        let big = "x".repeat(MAX_INPUT_LEN + 1);
        assert_eq!(clean(&big), SAFE_PLACEHOLDER);
    }

    #[test]
    fn pathological_nesting_yields_placeholder() {
        let mut raw = String::new();
        for _ in 0..400 {
            raw.push_str("<div>");
        }
        raw.push('x');
        assert_eq!(clean(&raw), SAFE_PLACEHOLDER);
    }

    #[test]
    fn extreme_nesting_is_refused_before_tree_construction() {
        // Far past any recursion the process could survive; must be caught
        // on the token stream, not after building the tree.
        let raw = "<i>".repeat(200_000);
        assert_eq!(clean(&raw), SAFE_PLACEHOLDER);
    }

    #[test]
    fn stray_end_tags_do_not_understate_nesting_depth() {
        // Each </b> matches nothing, so the builder would keep every <i>
        // open; the depth guard must count the same way.
        let raw = "<i></b>".repeat(200_000);
        assert_eq!(clean(&raw), SAFE_PLACEHOLDER);
    }

    #[test]
    fn never_emits_forbidden_markup() {
        let inputs = [
            "<script src=\"evil.js\"></script>",
            "<iframe srcdoc=\"<script>1</script>\"></iframe>",
            "<object data=\"x\"></object>",
            "<embed src=\"x\">",
            "<applet code=\"x\"></applet>",
            "<p onmouseover=\"x\">t</p>",
        ];
        let policy = SanitizationPolicy::default();
        for raw in inputs {
            let out = sanitize(raw, &policy);
            for marker in ["<script", "<iframe", "<object", "<embed", "<applet", "onmouseover"] {
                assert!(
                    !html::contains_ignore_ascii_case(&out, marker.as_bytes()),
                    "{marker} leaked from {raw}: {out}"
                );
            }
        }
    }
}
