mod scan;

use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::text::string::decode_component;
use crate::tree::TreeBuilder;
use crate::{DecodeOptions, Error, Result};

pub use scan::{scan_pairs, RawPair};

/// Decode a form body into a value. The whole body is rejected on the
/// first error; nothing is returned partially.
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    let mut builder = TreeBuilder::new(options);
    for raw in scan_pairs(input) {
        let key = decode_component(raw.key);
        let value = raw.value.map(|value| decode_component(value).into_owned());
        if let Err(err) = builder.push(&key, value) {
            debug!(
                kind = ?err.kind,
                key = %key,
                pair = builder.pair_count(),
                "rejected form body"
            );
            return Err(err);
        }
    }
    debug!(pairs = builder.pair_count(), "decoded form body");
    Ok(builder.finish())
}

pub fn from_str<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> Result<T> {
    let value = decode(input, options)?;
    serde_json::from_value(value)
        .map_err(|err| Error::deserialize(format!("deserialize failed: {err}")))
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8], options: &DecodeOptions) -> Result<T> {
    let text =
        std::str::from_utf8(input).map_err(|err| Error::decode(format!("invalid utf-8: {err}")))?;
    from_str(text, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(
    mut reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|err| Error::decode(format!("read failed: {err}")))?;
    from_str(&buf, options)
}

pub fn validate_str(input: &str, options: &DecodeOptions) -> Result<()> {
    decode(input, options).map(|_| ())
}
