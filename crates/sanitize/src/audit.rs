//! Advisory security audit of raw, unsanitized HTML.
//!
//! The auditor is a pure pattern scan used for user-facing warnings. It is
//! never the enforcement mechanism — the allow-list sanitizer is — so a
//! false positive here costs a warning banner, not a rendering failure.

use html::contains_ignore_ascii_case;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    Script,
    EventHandler,
    JsUrl,
    DataUrlHtml,
    IframeTag,
    ObjectEmbed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityViolation {
    pub kind: ViolationKind,
    pub message: String,
    pub severity: Severity,
}

/// Result of auditing one raw HTML payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditReport {
    pub is_secure: bool,
    pub violations: Vec<SecurityViolation>,
}

impl AuditReport {
    fn from_violations(violations: Vec<SecurityViolation>) -> Self {
        Self {
            is_secure: violations.is_empty(),
            violations,
        }
    }
}

/// Scan raw HTML for known-dangerous patterns. Pure and side-effect-free.
pub fn audit(raw: &str) -> AuditReport {
    let mut violations = Vec::new();

    let mut record = |kind: ViolationKind, message: &str, severity: Severity| {
        violations.push(SecurityViolation {
            kind,
            message: message.to_string(),
            severity,
        });
    };

    if contains_ignore_ascii_case(raw, b"<script") {
        record(ViolationKind::Script, "Script tags detected", Severity::Error);
    }
    if has_event_handler_attribute(raw) {
        record(
            ViolationKind::EventHandler,
            "Inline event handlers detected",
            Severity::Error,
        );
    }
    if contains_ignore_ascii_case(raw, b"javascript:") {
        record(ViolationKind::JsUrl, "javascript: URLs detected", Severity::Error);
    }
    if contains_ignore_ascii_case(raw, b"data:text/html") {
        record(
            ViolationKind::DataUrlHtml,
            "data:text/html URLs detected",
            Severity::Error,
        );
    }
    if contains_ignore_ascii_case(raw, b"<iframe") {
        record(ViolationKind::IframeTag, "Iframe tags detected", Severity::Warning);
    }
    if contains_ignore_ascii_case(raw, b"<object")
        || contains_ignore_ascii_case(raw, b"<embed")
        || contains_ignore_ascii_case(raw, b"<applet")
    {
        record(
            ViolationKind::ObjectEmbed,
            "Object/embed tags detected",
            Severity::Warning,
        );
    }

    AuditReport::from_violations(violations)
}

/// Heuristic match for `on<name>=` inline handlers: `on` followed by at least
/// one ASCII letter, optional whitespace, then `=`. Case-insensitive.
fn has_event_handler_attribute(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i + 3 < bytes.len() {
        if bytes[i..i + 2].eq_ignore_ascii_case(b"on") {
            // Must start an attribute name, not continue a word like "season".
            let boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
            if boundary {
                let mut j = i + 2;
                let name_start = j;
                while j < bytes.len() && bytes[j].is_ascii_alphabetic() {
                    j += 1;
                }
                if j > name_start {
                    let mut k = j;
                    while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                        k += 1;
                    }
                    if k < bytes.len() && bytes[k] == b'=' {
                        return true;
                    }
                }
            }
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_input_is_secure() {
        let report = audit("<h1>Hello</h1><p>world</p>");
        assert!(report.is_secure);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn detects_script_tags() {
        let report = audit("<div><SCRIPT>alert(1)</SCRIPT></div>");
        assert!(!report.is_secure);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::Script && v.message == "Script tags detected"));
    }

    #[test]
    fn detects_event_handlers() {
        for raw in ["<img onerror=alert(1)>", "<p ONCLICK = \"x\">", "<a onmouseover=f>"] {
            let report = audit(raw);
            assert!(
                report.violations.iter().any(|v| v.kind == ViolationKind::EventHandler),
                "missed handler in {raw}"
            );
        }
    }

    #[test]
    fn word_containing_on_is_not_a_handler() {
        let report = audit("<p>the season=winter</p>");
        assert!(!report.violations.iter().any(|v| v.kind == ViolationKind::EventHandler));
    }

    #[test]
    fn detects_js_and_data_urls() {
        let report = audit("<a href=\"JaVaScRiPt:x\">a</a><a href=\"data:text/html,x\">b</a>");
        assert!(report.violations.iter().any(|v| v.kind == ViolationKind::JsUrl));
        assert!(report.violations.iter().any(|v| v.kind == ViolationKind::DataUrlHtml));
    }

    #[test]
    fn detects_embedding_tags() {
        assert!(audit("<iframe src=x>").violations.iter().any(|v| v.kind == ViolationKind::IframeTag));
        assert!(audit("<embed src=x>").violations.iter().any(|v| v.kind == ViolationKind::ObjectEmbed));
        assert!(audit("<applet>").violations.iter().any(|v| v.kind == ViolationKind::ObjectEmbed));
    }

    #[test]
    fn is_secure_tracks_violation_count() {
        for raw in ["safe", "<script>", "<iframe>", "<p onload=x>"] {
            let report = audit(raw);
            assert_eq!(report.is_secure, report.violations.is_empty(), "for {raw}");
        }
    }
}
