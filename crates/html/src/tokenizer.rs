//! Simplified HTML tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`. Attribute
//! names use the same class. Tag and attribute names are lowercased on emit.
//!
//! This is not a full HTML5 tokenizer/state machine. The constraint is
//! intentional: generated markup from the upstream pipeline is regular enough
//! that spec-grade parse-error recovery buys nothing here, and the sanitizer
//! drops anything the allow-list does not recognize anyway.
//!
//! Known limitations (intentional):
//! - No HTML5 parse-error recovery paths.
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>`.

use crate::entities::decode_entities;
use crate::types::Token;
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Find `</script …>` / `</style …>` case-insensitively, allowing only ASCII
/// whitespace between the name and `>`. Returns (start, end-after-`>`).
fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let len = bytes.len();
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &bytes[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if bytes[i + 1] == b'/' && starts_with_ignore_ascii_case_at(bytes, i, close_tag) {
            let mut k = i + n;
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Tokenize an HTML fragment or document.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    // We scan by byte, but slice endpoints are always ASCII structural bytes
    // or positions reached by scanning ASCII-only runs, so they remain valid
    // UTF-8 boundaries.
    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            let decoded = decode_entities(&input[start..i]);
            if !decoded.is_empty() {
                out.push(Token::Text(decoded));
            }
            continue;
        }

        if input[i..].starts_with(COMMENT_START) {
            let body_start = i + COMMENT_START.len();
            if let Some(end) = input[body_start..].find(COMMENT_END) {
                out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                i = body_start + end + COMMENT_END.len();
            } else {
                out.push(Token::Comment(input[body_start..].to_string()));
                break;
            }
            continue;
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            if let Some(end) = rest.find('>') {
                out.push(Token::Doctype(rest[..end].trim().to_string()));
                i += 2 + end + 1;
                continue;
            }
            break;
        }

        // End tag.
        if i + 2 <= bytes.len() && bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < bytes.len() && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            while j < bytes.len() && bytes[j] != b'>' {
                j += 1;
            }
            if j < bytes.len() {
                j += 1;
            }
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            i = j;
            continue;
        }

        // Start tag.
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && is_name_byte(bytes[j]) {
            j += 1;
        }
        if j == start {
            // A lone '<' that opens nothing: treat as text.
            out.push(Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let name = input[start..j].to_ascii_lowercase();

        let len = bytes.len();
        let mut k = j;
        let mut attributes: Vec<(String, Option<String>)> = Vec::new();
        let mut self_closing = false;

        loop {
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k >= len {
                break;
            }
            if bytes[k] == b'>' {
                k += 1;
                break;
            }
            if bytes[k] == b'/' {
                if k + 1 < len && bytes[k + 1] == b'>' {
                    self_closing = true;
                    k += 2;
                    break;
                }
                k += 1;
                continue;
            }

            let name_start = k;
            while k < len && is_name_byte(bytes[k]) {
                k += 1;
            }
            if name_start == k {
                k += 1;
                continue;
            }
            let attr_name = input[name_start..k].to_ascii_lowercase();

            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }

            let value: Option<String> = if k < len && bytes[k] == b'=' {
                k += 1;
                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    k += 1;
                    let vstart = k;
                    while k < len && bytes[k] != quote {
                        k += 1;
                    }
                    let raw = &input[vstart..k];
                    if k < len {
                        k += 1;
                    }
                    Some(decode_entities(raw))
                } else {
                    let vstart = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                            break;
                        }
                        k += 1;
                    }
                    Some(decode_entities(&input[vstart..k]))
                }
            } else {
                None
            };

            attributes.push((attr_name, value));
        }

        let self_closing = self_closing || is_void_element(&name);

        if k < len && bytes[k] == b'>' {
            k += 1;
        }
        let content_start = k;

        let is_rawtext = (name == "script" || name == "style") && !self_closing;
        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        if is_rawtext {
            let close_tag = if name == "script" {
                SCRIPT_CLOSE_TAG
            } else {
                STYLE_CLOSE_TAG
            };
            if let Some((rel_start, rel_end)) = find_rawtext_close_tag(&input[k..], close_tag) {
                let raw = &input[k..k + rel_start];
                if !raw.is_empty() {
                    out.push(Token::Text(raw.to_string()));
                }
                out.push(Token::EndTag(name));
                i = k + rel_end;
            } else {
                // Missing close tag: emit the remainder as rawtext and an
                // implicit end tag.
                let raw = &input[k..];
                if !raw.is_empty() {
                    out.push(Token::Text(raw.to_string()));
                }
                out.push(Token::EndTag(name));
                break;
            }
            continue;
        }

        i = content_start;
    }

    log::trace!(target: "html.tokenizer", "tokenized {} bytes into {} tokens", input.len(), out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_element() {
        let tokens = tokenize("<p class=\"x\">hi</p>");
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "p".to_string(),
                    attributes: vec![("class".to_string(), Some("x".to_string()))],
                    self_closing: false,
                },
                Token::Text("hi".to_string()),
                Token::EndTag("p".to_string()),
            ]
        );
    }

    #[test]
    fn lowercases_tag_and_attribute_names() {
        let tokens = tokenize("<DiV ID=one></DIV>");
        assert!(matches!(
            &tokens[0],
            Token::StartTag { name, attributes, .. }
                if name == "div" && attributes[0].0 == "id"
        ));
        assert!(matches!(&tokens[1], Token::EndTag(n) if n == "div"));
    }

    #[test]
    fn script_body_is_rawtext_case_insensitive_close() {
        let tokens = tokenize("<script>let x = 1 < 2;</ScRiPt>");
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "script".to_string(),
                    attributes: vec![],
                    self_closing: false,
                },
                Token::Text("let x = 1 < 2;".to_string()),
                Token::EndTag("script".to_string()),
            ]
        );
    }

    #[test]
    fn rawtext_near_match_does_not_close() {
        let tokens = tokenize("<script>ok</scriptx >no</script >");
        assert!(matches!(
            &tokens[1],
            Token::Text(t) if t == "ok</scriptx >no"
        ));
    }

    #[test]
    fn rawtext_without_close_tag_gets_implicit_end() {
        let tokens = tokenize("<script>alert(1)");
        assert!(matches!(&tokens[2], Token::EndTag(n) if n == "script"));
    }

    #[test]
    fn void_elements_self_close() {
        let tokens = tokenize("<br><img src=x>");
        assert!(matches!(
            &tokens[0],
            Token::StartTag { self_closing: true, .. }
        ));
        assert!(matches!(
            &tokens[1],
            Token::StartTag { name, self_closing: true, .. } if name == "img"
        ));
    }

    #[test]
    fn comments_and_doctype() {
        let tokens = tokenize("<!DOCTYPE html><!-- note -->");
        assert!(matches!(&tokens[0], Token::Doctype(d) if d == "DOCTYPE html"));
        assert!(matches!(&tokens[1], Token::Comment(c) if c == " note "));
    }

    #[test]
    fn text_entities_decode() {
        let tokens = tokenize("<p>a &amp; b</p>");
        assert!(matches!(&tokens[1], Token::Text(t) if t == "a & b"));
    }

    #[test]
    fn unquoted_attribute_value() {
        let tokens = tokenize("<a href=/x>go</a>");
        assert!(matches!(
            &tokens[0],
            Token::StartTag { attributes, .. }
                if attributes[0] == ("href".to_string(), Some("/x".to_string()))
        ));
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        let tokens = tokenize("1 < 2");
        let joined: String = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(joined, "1 < 2");
    }

    #[test]
    fn preserves_utf8_text() {
        let tokens = tokenize("é<b>ï</b>ö");
        assert!(matches!(&tokens[0], Token::Text(t) if t == "é"));
        assert!(matches!(&tokens[2], Token::Text(t) if t == "ï"));
        assert!(matches!(&tokens[4], Token::Text(t) if t == "ö"));
    }

    #[test]
    fn handles_many_simple_tags_linearly() {
        let mut input = String::new();
        for _ in 0..20_000 {
            input.push_str("<a></a>");
        }
        let tokens = tokenize(&input);
        assert_eq!(tokens.len(), 40_000);
    }
}
