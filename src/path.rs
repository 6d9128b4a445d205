//! Bracket-path keys.
//!
//! A key is a bare name followed by zero or more bracket groups:
//! `user[address][lines][]`. Each group is empty (append), a canonical
//! decimal index, or a literal member name.

use std::fmt;

use memchr::memchr2;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::{Error, Result};

/// One addressing step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A member name (`a` or `[a]`).
    Name(SmolStr),
    /// An explicit integer index (`[3]`).
    Index(usize),
    /// The append marker `[]`.
    Append,
}

impl Segment {
    fn classify(content: &str) -> Self {
        if content.is_empty() {
            return Segment::Append;
        }
        match parse_index(content) {
            Some(index) => Segment::Index(index),
            None => Segment::Name(SmolStr::new(content)),
        }
    }
}

/// A tokenized key. The first segment is always a [`Segment::Name`] and an
/// [`Segment::Append`] can only appear last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: SmallVec<[Segment; 4]>,
}

impl KeyPath {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The leading bare name.
    pub fn root(&self) -> &str {
        match self.segments.first() {
            Some(Segment::Name(name)) => name.as_str(),
            _ => "",
        }
    }

    /// `true` when the key carries no bracket groups at all.
    pub fn is_bare(&self) -> bool {
        self.segments.len() == 1
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_path(&self.segments))
    }
}

/// Tokenize a decoded key.
///
/// # Examples
/// ```
/// use serde_form_tree::{parse_key, Segment};
///
/// let path = parse_key("a[x][2][]").unwrap();
/// assert_eq!(
///     path.segments(),
///     &[
///         Segment::Name("a".into()),
///         Segment::Name("x".into()),
///         Segment::Index(2),
///         Segment::Append,
///     ]
/// );
/// ```
pub fn parse_key(key: &str) -> Result<KeyPath> {
    parse_key_with_depth(key, None)
}

pub(crate) fn parse_key_with_depth(key: &str, max_depth: Option<usize>) -> Result<KeyPath> {
    let bytes = key.as_bytes();
    let name_end = memchr2(b'[', b']', bytes).unwrap_or(bytes.len());
    if name_end < bytes.len() && bytes[name_end] == b']' {
        return Err(Error::malformed(key, &[], "unexpected `]`"));
    }
    if name_end == 0 {
        return Err(Error::empty_root(key));
    }

    let mut segments: SmallVec<[Segment; 4]> = SmallVec::new();
    segments.push(Segment::Name(SmolStr::new(&key[..name_end])));

    let mut pos = name_end;
    while pos < bytes.len() {
        if matches!(segments.last(), Some(Segment::Append)) {
            return Err(Error::malformed(
                key,
                &segments,
                "nothing may follow an append marker",
            ));
        }
        match bytes[pos] {
            b'[' => {}
            b']' => return Err(Error::malformed(key, &segments, "unexpected `]`")),
            _ => {
                return Err(Error::malformed(
                    key,
                    &segments,
                    "expected `[` after a closing `]`",
                ))
            }
        }

        let open = pos + 1;
        let close = match memchr2(b'[', b']', &bytes[open..]) {
            Some(offset) if bytes[open + offset] == b']' => open + offset,
            Some(0) => {
                return Err(Error::malformed(
                    key,
                    &segments,
                    "`[` immediately followed by `[`",
                ))
            }
            _ => return Err(Error::malformed(key, &segments, "unmatched `[`")),
        };

        segments.push(Segment::classify(&key[open..close]));
        if let Some(max_depth) = max_depth {
            if segments.len() > max_depth {
                return Err(Error::limit(
                    Some(key),
                    format!("key `{key}` exceeds the maximum depth of {max_depth} segments"),
                ));
            }
        }
        pos = close + 1;
    }

    Ok(KeyPath { segments })
}

/// Canonical decimal only: `0` or digits without a leading zero, within
/// `usize`. Anything else stays a name so it round-trips verbatim.
fn parse_index(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    content.parse().ok()
}

/// Render segments back into bracket notation (`a[x][0][]`).
pub fn render_path(segments: &[Segment]) -> String {
    let mut out = String::new();
    write_path(&mut out, segments);
    out
}

pub(crate) fn write_path(out: &mut String, segments: &[Segment]) {
    let mut index_buf = itoa::Buffer::new();
    for (idx, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Name(name) if idx == 0 => out.push_str(name),
            Segment::Name(name) => {
                out.push('[');
                out.push_str(name);
                out.push(']');
            }
            Segment::Index(index) => {
                out.push('[');
                out.push_str(index_buf.format(*index));
                out.push(']');
            }
            Segment::Append => out.push_str("[]"),
        }
    }
}
