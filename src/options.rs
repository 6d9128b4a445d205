use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAIRS, DEPTH_CEILING};

/// Limits applied while decoding a body.
///
/// # Examples
/// ```
/// use serde_form_tree::DecodeOptions;
///
/// let opts = DecodeOptions::new().with_max_pairs(Some(64));
/// assert_eq!(opts.max_pairs, Some(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of segments in one key, the leading name included.
    /// Never exceeds [`DEPTH_CEILING`], even when `None`.
    pub max_depth: Option<usize>,
    /// Maximum number of pairs in one body.
    pub max_pairs: Option<usize>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// No pair limit; key depth is only bounded by [`DEPTH_CEILING`].
    pub fn unlimited() -> Self {
        Self {
            max_depth: None,
            max_pairs: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_pairs(mut self, max_pairs: Option<usize>) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// The depth limit actually enforced.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth
            .map_or(DEPTH_CEILING, |max_depth| max_depth.min(DEPTH_CEILING))
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_pairs: Some(DEFAULT_MAX_PAIRS),
        }
    }
}

/// Options shared by the canonical text writer and the form encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write `/` as `\/` in canonical text.
    pub escape_solidus: bool,
    /// Emit scalar array elements as `a[]` rather than `a[0]`.
    pub append_scalars: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape_solidus(mut self, escape_solidus: bool) -> Self {
        self.escape_solidus = escape_solidus;
        self
    }

    pub fn with_append_scalars(mut self, append_scalars: bool) -> Self {
        self.append_scalars = append_scalars;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            escape_solidus: true,
            append_scalars: true,
        }
    }
}
