use crate::path::{render_path, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedBracketSyntax,
    EmptyRootSegment,
    ScalarContainerConflict,
    ContainerKindConflict,
    DuplicateAssignment,
    BareBracketMixConflict,
    LimitExceeded,
    Decode,
    Serialize,
    Deserialize,
}

impl ErrorKind {
    /// Returns `true` for the structural errors raised while folding pairs
    /// into a tree, as opposed to syntax, limit or I/O failures.
    pub fn is_conflict(self) -> bool {
        matches!(
            self,
            ErrorKind::ScalarContainerConflict
                | ErrorKind::ContainerKindConflict
                | ErrorKind::DuplicateAssignment
                | ErrorKind::BareBracketMixConflict
        )
    }
}

/// Failure raised by any codec operation.
///
/// `path` holds the structured address of the offending node (empty when
/// the error is not tied to one) and `key` the decoded key that triggered
/// it. `message` is the rendered form shown by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub key: Option<String>,
    pub path: Vec<Segment>,
    pub message: String,
}

impl Error {
    fn at(kind: ErrorKind, key: &str, path: Vec<Segment>, message: String) -> Self {
        Self {
            kind,
            key: Some(key.to_string()),
            path,
            message,
        }
    }

    fn bare(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            key: None,
            path: Vec::new(),
            message,
        }
    }

    pub fn malformed(key: &str, path: &[Segment], detail: &str) -> Self {
        let message = if path.is_empty() {
            format!("malformed bracket syntax in key `{key}`: {detail}")
        } else {
            format!(
                "malformed bracket syntax in key `{key}` after `{}`: {detail}",
                render_path(path)
            )
        };
        Self::at(ErrorKind::MalformedBracketSyntax, key, path.to_vec(), message)
    }

    pub fn empty_root(key: &str) -> Self {
        Self::at(
            ErrorKind::EmptyRootSegment,
            key,
            Vec::new(),
            format!("key `{key}` has no leading name"),
        )
    }

    pub fn scalar_conflict(key: &str, path: Vec<Segment>) -> Self {
        let message = format!(
            "`{}` is used both as a value and as a container (key `{key}`)",
            render_path(&path)
        );
        Self::at(ErrorKind::ScalarContainerConflict, key, path, message)
    }

    pub fn kind_conflict(key: &str, path: Vec<Segment>) -> Self {
        let message = format!(
            "`{}` mixes named and indexed members (key `{key}`)",
            render_path(&path)
        );
        Self::at(ErrorKind::ContainerKindConflict, key, path, message)
    }

    pub fn duplicate(key: &str, path: Vec<Segment>) -> Self {
        let message = format!(
            "`{}` is assigned more than once (key `{key}`)",
            render_path(&path)
        );
        Self::at(ErrorKind::DuplicateAssignment, key, path, message)
    }

    pub fn bare_mix(key: &str, name: &str) -> Self {
        Self::at(
            ErrorKind::BareBracketMixConflict,
            key,
            vec![Segment::Name(name.into())],
            format!("`{name}` is used both with and without brackets (key `{key}`)"),
        )
    }

    pub fn limit(key: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::LimitExceeded,
            key: key.map(str::to_string),
            path: Vec::new(),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::bare(ErrorKind::Decode, message.into())
    }

    pub fn serialize(message: impl Into<String>) -> Self {
        Self::bare(ErrorKind::Serialize, message.into())
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Self::bare(ErrorKind::Deserialize, message.into())
    }

    /// The offending path rendered back into bracket notation.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }
}
