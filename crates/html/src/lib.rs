//! Minimal HTML substrate for the glassbox engine: tokenizer, DOM tree,
//! builder, serializer, and traversal utilities.
//!
//! This is deliberately not a spec-complete HTML5 parser. The input is
//! machine-generated markup that passes through an allow-list sanitizer
//! immediately after parsing; anything the parser mishandles is dropped by
//! the sanitizer rather than rendered.

pub mod dom_utils;
pub mod serialize;
pub mod traverse;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

use memchr::{memchr, memchr2};

pub use crate::dom_builder::build_dom;
pub use crate::serialize::{escape_attr, escape_text, serialize};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Id, Node, NodeId, Token};

/// Case-insensitive substring search, accelerated by scanning for the first
/// needle byte with memchr. `needle` must be ASCII.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &[u8]) -> bool {
    let hay = haystack.as_bytes();
    let n = needle.len();
    if n == 0 {
        return true;
    }
    let hay_len = hay.len();
    if hay_len < n {
        return false;
    }
    let first = needle[0];
    let (a, b) = if first.is_ascii_alphabetic() {
        (first.to_ascii_lowercase(), first.to_ascii_uppercase())
    } else {
        (first, first)
    };
    let mut i = 0;
    while i + n <= hay_len {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let Some(rel) = rel else {
            return false;
        };
        let pos = i + rel;
        if pos + n <= hay_len && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return true;
        }
        i = pos + 1;
    }
    false
}
