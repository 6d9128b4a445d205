//! Bracket-path `application/x-www-form-urlencoded` bodies to JSON value
//! trees and back.
//!
//! Keys such as `a[x][]` address into nested structures. Decoding folds all
//! pairs of a body into one tree, rejects ambiguous input, and only then
//! decides whether each indexed group is an array (keys exactly `0..n`) or
//! an object keyed by the decimal index.
//!
//! ```
//! use serde_json::json;
//!
//! let value = serde_form_tree::decode("a[x][0]=0&a[x][1]=1&b[2]=hello&flag").unwrap();
//! assert_eq!(
//!     value,
//!     json!({"a": {"x": ["0", "1"]}, "b": {"2": "hello"}, "flag": null})
//! );
//! assert_eq!(
//!     serde_form_tree::encode(&value),
//!     r#"{"a":{"x":["0","1"]},"b":{"2":"hello"},"flag":null}"#
//! );
//! ```

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod path;
pub mod text;
pub mod tree;

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use crate::encode::FormPair;
pub use crate::error::{Error, ErrorKind};
pub use crate::options::{DecodeOptions, EncodeOptions};
pub use crate::path::{parse_key, render_path, KeyPath, Segment};
pub use crate::text::string::escape_string;
pub use crate::tree::TreeBuilder;

pub type Result<T> = std::result::Result<T, Error>;

/// Decode a form body with default limits.
pub fn decode(input: &str) -> Result<Value> {
    decode_with_options(input, &DecodeOptions::default())
}

pub fn decode_with_options(input: &str, options: &DecodeOptions) -> Result<Value> {
    decode::decode(input, options)
}

/// Render a value as canonical text.
pub fn encode(value: &Value) -> String {
    encode_with_options(value, &EncodeOptions::default())
}

pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> String {
    encode::to_canonical(value, options)
}

/// Render a value as a form body, the inverse of [`decode`].
pub fn to_form(value: &Value) -> Result<String> {
    to_form_with_options(value, &EncodeOptions::default())
}

pub fn to_form_with_options(value: &Value, options: &EncodeOptions) -> Result<String> {
    encode::to_form(value, options)
}

/// The decoded `(key, value)` pairs [`to_form`] would write.
pub fn form_pairs(value: &Value) -> Result<Vec<FormPair>> {
    encode::form_pairs(value, &EncodeOptions::default())
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, &DecodeOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_str(input, options)
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_slice_with_options(input, &DecodeOptions::default())
}

pub fn from_slice_with_options<T: DeserializeOwned>(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_slice(input, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_reader_with_options(reader, &DecodeOptions::default())
}

pub fn from_reader_with_options<T: DeserializeOwned, R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_reader(reader, options)
}

/// Serialize into a form body.
pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    to_string_with_options(value, &EncodeOptions::default())
}

pub fn to_string_with_options<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    to_form_with_options(&to_value(value)?, options)
}

/// Serialize into canonical text.
pub fn to_canonical_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(encode(&to_value(value)?))
}

pub fn validate_str(input: &str) -> Result<()> {
    validate_str_with_options(input, &DecodeOptions::default())
}

pub fn validate_str_with_options(input: &str, options: &DecodeOptions) -> Result<()> {
    decode::validate_str(input, options)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| Error::serialize(format!("serialize failed: {err}")))
}
