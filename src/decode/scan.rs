use memchr::{memchr, memchr_iter};

use crate::constants::{KEY_VALUE_SEPARATOR, PAIR_SEPARATOR};

/// One raw `key[=value]` span of a body, still percent-encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawPair<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

/// Split a body on `&`, then each pair on its first `=`. Empty spans are
/// skipped.
pub fn scan_pairs(input: &str) -> Vec<RawPair<'_>> {
    let bytes = input.as_bytes();
    let mut pairs = Vec::new();
    let mut start = 0;
    for idx in memchr_iter(PAIR_SEPARATOR, bytes) {
        push_pair(&mut pairs, &input[start..idx]);
        start = idx + 1;
    }
    push_pair(&mut pairs, &input[start..]);
    pairs
}

fn push_pair<'a>(pairs: &mut Vec<RawPair<'a>>, span: &'a str) {
    if span.is_empty() {
        return;
    }
    let pair = match memchr(KEY_VALUE_SEPARATOR, span.as_bytes()) {
        Some(idx) => RawPair {
            key: &span[..idx],
            value: Some(&span[idx + 1..]),
        },
        None => RawPair {
            key: span,
            value: None,
        },
    };
    pairs.push(pair);
}
