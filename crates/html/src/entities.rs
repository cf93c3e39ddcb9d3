/// Decode a minimal, explicitly limited subset of HTML entities.
///
/// Contract:
/// - Named entities decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
/// - Numeric entities decoded only when well-formed and semicolon-terminated:
///   `&#123;` (decimal) and `&#x1F4A9;` (hex).
/// - Only valid Unicode scalar values decode; invalid scalars pass through unchanged.
/// - Missing semicolons, unknown names, malformed numerics, or overlong digit runs
///   are left unchanged.
///
/// This is intentionally not HTML5-spec-complete. Keep the behavior narrow and stable.
pub(crate) fn decode_entities(s: &str) -> String {
    const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
    const MAX_DEC_DIGITS: usize = 7; // 1114111

    const NAMED: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{a0}'),
    ];

    // Bounded digit scan so adversarial input cannot turn this quadratic.
    fn scan_digits(bytes: &[u8], start: usize, max: usize, hex: bool) -> Option<usize> {
        let mut j = start;
        let mut digits = 0usize;
        while j < bytes.len() {
            let b = bytes[j];
            if b == b';' {
                return (digits > 0).then_some(j);
            }
            if digits == max {
                return None;
            }
            let ok = if hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            };
            if !ok {
                return None;
            }
            digits += 1;
            j += 1;
        }
        None
    }

    if !s.contains('&') {
        return s.to_string();
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    'outer: while i < bytes.len() {
        if bytes[i] != b'&' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'&' {
                i += 1;
            }
            out.push_str(&s[start..i]);
            continue;
        }

        for (pat, ch) in NAMED {
            if s[i..].starts_with(pat) {
                out.push(ch);
                i += pat.len();
                continue 'outer;
            }
        }

        if s[i..].starts_with("&#x") || s[i..].starts_with("&#X") {
            if let Some(end) = scan_digits(bytes, i + 3, MAX_HEX_DIGITS, true) {
                if let Some(ch) = u32::from_str_radix(&s[i + 3..end], 16)
                    .ok()
                    .and_then(char::from_u32)
                {
                    out.push(ch);
                    i = end + 1;
                    continue;
                }
            }
        } else if s[i..].starts_with("&#") {
            if let Some(end) = scan_digits(bytes, i + 2, MAX_DEC_DIGITS, false) {
                if let Some(ch) = s[i + 2..end].parse::<u32>().ok().and_then(char::from_u32) {
                    out.push(ch);
                    i = end + 1;
                    continue;
                }
            }
        }

        // Malformed or unknown: pass the ampersand through unchanged.
        out.push('&');
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_subset() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&quot;x&apos;"), "\"x'");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn decodes_numeric_forms() {
        assert_eq!(decode_entities("&#65;"), "A");
        assert_eq!(decode_entities("&#x41;"), "A");
        assert_eq!(decode_entities("&#x1F4A9;"), "\u{1F4A9}");
    }

    #[test]
    fn leaves_malformed_entities_unchanged() {
        assert_eq!(decode_entities("&amp x"), "&amp x");
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn rejects_overlong_digit_runs() {
        assert_eq!(decode_entities("&#99999999;"), "&#99999999;");
        assert_eq!(decode_entities("&#x1234567;"), "&#x1234567;");
    }

    #[test]
    fn invalid_scalar_passes_through() {
        // Surrogate range is not a valid scalar value.
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
    }
}
