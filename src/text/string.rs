use std::borrow::Cow;

use memchr::{memchr, memchr2};
use percent_encoding::percent_decode_str;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Escape a string for canonical text output (without surrounding quotes).
///
/// # Examples
/// ```
/// use serde_form_tree::escape_string;
///
/// assert_eq!(escape_string("a/b\n"), "a\\/b\\u000a");
/// ```
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_string_into(&mut out, value, true);
    out
}

pub fn escape_string_into(out: &mut String, value: &str, escape_solidus: bool) {
    let bytes = value.as_bytes();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        let (code, width) = match byte {
            b'"' | b'\\' | 0x00..=0x1f | 0x7f => (byte, 1),
            b'/' if escape_solidus => (byte, 1),
            // C1 controls are encoded as C2 80..=C2 9F.
            0xc2 if matches!(bytes.get(idx + 1), Some(0x80..=0x9f)) => (bytes[idx + 1], 2),
            _ => {
                idx += 1;
                continue;
            }
        };
        if start < idx {
            out.push_str(&value[start..idx]);
        }
        match code {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'/' => out.push_str("\\/"),
            control => {
                out.push_str("\\u00");
                out.push(HEX_DIGITS[usize::from(control >> 4)] as char);
                out.push(HEX_DIGITS[usize::from(control & 0x0f)] as char);
            }
        }
        idx += width;
        start = idx;
    }
    if start < value.len() {
        out.push_str(&value[start..]);
    }
}

/// `+` to space, then `%XX` decoding. Invalid UTF-8 is replaced lossily.
pub fn decode_component(raw: &str) -> Cow<'_, str> {
    if memchr2(b'+', b'%', raw.as_bytes()).is_none() {
        return Cow::Borrowed(raw);
    }
    let spaced: Cow<'_, str> = if memchr(b'+', raw.as_bytes()).is_some() {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
}

/// Form-urlencode one component (space becomes `+`).
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Form-urlencode a bracket-path key, leaving the brackets readable.
pub fn encode_key(key: &str) -> String {
    let encoded = encode_component(key);
    if memchr(b'%', encoded.as_bytes()).is_none() {
        return encoded;
    }
    encoded.replace("%5B", "[").replace("%5D", "]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("hello", "hello")]
    #[case("say \"hi\"", "say \\\"hi\\\"")]
    #[case("back\\slash", "back\\\\slash")]
    #[case("a/b", "a\\/b")]
    #[case("\u{0}", "\\u0000")]
    #[case("tab\there", "tab\\u0009here")]
    #[case("\u{1b}[0m", "\\u001b[0m")]
    #[case("\u{7f}", "\\u007f")]
    #[case("\u{80}", "\\u0080")]
    #[case("next\u{85}line", "next\\u0085line")]
    #[case("\u{9f}", "\\u009f")]
    #[case("\u{a0}\u{c2}", "\u{a0}\u{c2}")]
    #[case("héllo ☃", "héllo ☃")]
    fn test_escape_string(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_string(input), expected);
    }

    #[rstest::rstest]
    fn test_escape_without_solidus() {
        let mut out = String::new();
        escape_string_into(&mut out, "a/b", false);
        assert_eq!(out, "a/b");
    }

    #[rstest::rstest]
    #[case("plain", "plain")]
    #[case("a+b", "a b")]
    #[case("a%2Bb", "a+b")]
    #[case("%5B%5D", "[]")]
    #[case("caf%C3%A9", "café")]
    #[case("bad%FF", "bad\u{fffd}")]
    #[case("100%", "100%")]
    fn test_decode_component(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(decode_component(raw), expected);
    }

    #[rstest::rstest]
    fn test_decode_component_borrows_plain_input() {
        assert!(matches!(decode_component("plain"), Cow::Borrowed(_)));
    }

    #[rstest::rstest]
    #[case("a b&c=d", "a+b%26c%3Dd")]
    #[case("café", "caf%C3%A9")]
    fn test_encode_component(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(encode_component(raw), expected);
    }

    #[rstest::rstest]
    fn test_encode_key_keeps_brackets() {
        assert_eq!(encode_key("a[first name][]"), "a[first+name][]");
    }
}
