/// Default cap on the number of segments in one key path.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Hard cap on the number of segments in one key path. It applies even
/// when `max_depth` is `None` or set higher, since building, finalizing and
/// writing a tree recurse once per segment.
pub const DEPTH_CEILING: usize = 512;

/// Default cap on the number of pairs in one body.
pub const DEFAULT_MAX_PAIRS: usize = 1000;

pub(crate) const PAIR_SEPARATOR: u8 = b'&';

pub(crate) const KEY_VALUE_SEPARATOR: u8 = b'=';
