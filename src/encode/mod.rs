mod form;
mod writer;

use serde_json::Value;

use crate::{EncodeOptions, Result};

pub use form::{form_pairs, write_pairs, FormPair};

/// Render `value` as canonical text.
pub fn to_canonical(value: &Value, options: &EncodeOptions) -> String {
    let mut writer = writer::Writer::new(*options);
    writer.write_value(value);
    writer.finish()
}

/// Render `value` as a form body.
pub fn to_form(value: &Value, options: &EncodeOptions) -> Result<String> {
    let pairs = form_pairs(value, options)?;
    tracing::trace!(pairs = pairs.len(), "encoded form body");
    Ok(write_pairs(&pairs))
}
