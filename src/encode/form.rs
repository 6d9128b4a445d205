use serde_json::Value;

use crate::text::string::{encode_component, encode_key};
use crate::{EncodeOptions, Error, Result};

/// One bracket-path pair; `None` is written as a key without `=`.
pub type FormPair = (String, Option<String>);

/// Walk `value` and emit the pairs that decode back into it.
///
/// The root must be an object with non-empty member names. Empty arrays
/// and objects have no form representation and produce no pairs.
pub fn form_pairs(value: &Value, options: &EncodeOptions) -> Result<Vec<FormPair>> {
    let Value::Object(members) = value else {
        return Err(Error::serialize("form body root must be an object"));
    };
    let mut collector = PairCollector {
        pairs: Vec::new(),
        options,
        index_buf: itoa::Buffer::new(),
    };
    let mut prefix = String::new();
    for (name, member) in members {
        if name.is_empty() {
            return Err(Error::serialize("form body member names must not be empty"));
        }
        prefix.clear();
        prefix.push_str(name);
        collector.collect(&mut prefix, member);
    }
    Ok(collector.pairs)
}

/// Render pairs as an `application/x-www-form-urlencoded` body.
pub fn write_pairs(pairs: &[FormPair]) -> String {
    let mut out = String::new();
    for (idx, (key, value)) in pairs.iter().enumerate() {
        if idx > 0 {
            out.push('&');
        }
        out.push_str(&encode_key(key));
        if let Some(value) = value {
            out.push('=');
            out.push_str(&encode_component(value));
        }
    }
    out
}

struct PairCollector<'o> {
    pairs: Vec<FormPair>,
    options: &'o EncodeOptions,
    index_buf: itoa::Buffer,
}

impl PairCollector<'_> {
    fn collect(&mut self, prefix: &mut String, value: &Value) {
        match value {
            Value::Null => self.pairs.push((prefix.clone(), None)),
            Value::String(text) => self.pairs.push((prefix.clone(), Some(text.clone()))),
            Value::Bool(_) | Value::Number(_) => {
                self.pairs.push((prefix.clone(), Some(value.to_string())))
            }
            Value::Array(items) => {
                // Appends only stay unambiguous while no explicit index precedes them.
                let append = self.options.append_scalars && !items.iter().any(is_container);
                for (index, item) in items.iter().enumerate() {
                    let mark = prefix.len();
                    if append {
                        prefix.push_str("[]");
                    } else {
                        prefix.push('[');
                        prefix.push_str(self.index_buf.format(index));
                        prefix.push(']');
                    }
                    self.collect(prefix, item);
                    prefix.truncate(mark);
                }
            }
            Value::Object(members) => {
                for (name, member) in members {
                    let mark = prefix.len();
                    prefix.push('[');
                    prefix.push_str(name);
                    prefix.push(']');
                    self.collect(prefix, member);
                    prefix.truncate(mark);
                }
            }
        }
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn pairs(value: Value) -> Vec<FormPair> {
        form_pairs(&value, &EncodeOptions::default()).unwrap()
    }

    fn pair(key: &str, value: Option<&str>) -> FormPair {
        (key.to_string(), value.map(str::to_string))
    }

    #[rstest]
    fn test_scalar_array_uses_append() {
        assert_eq!(
            pairs(json!({"z": ["9", null]})),
            vec![pair("z[]", Some("9")), pair("z[]", None)]
        );
    }

    #[rstest]
    fn test_nested_containers_use_indices() {
        assert_eq!(
            pairs(json!({"a": [["1", "2"], {"x": "3"}]})),
            vec![
                pair("a[0][]", Some("1")),
                pair("a[0][]", Some("2")),
                pair("a[1][x]", Some("3")),
            ]
        );
    }

    #[rstest]
    fn test_mixed_array_uses_indices_throughout() {
        assert_eq!(
            pairs(json!({"a": [{"x": "1"}, "2"]})),
            vec![pair("a[0][x]", Some("1")), pair("a[1]", Some("2"))]
        );
    }

    #[rstest]
    fn test_explicit_indices_option() {
        let options = EncodeOptions::new().with_append_scalars(false);
        assert_eq!(
            form_pairs(&json!({"a": ["x", "y"]}), &options).unwrap(),
            vec![pair("a[0]", Some("x")), pair("a[1]", Some("y"))]
        );
    }

    #[rstest]
    fn test_literals_become_text() {
        assert_eq!(
            pairs(json!({"n": 1.5, "b": false})),
            vec![pair("n", Some("1.5")), pair("b", Some("false"))]
        );
    }

    #[rstest]
    fn test_empty_containers_vanish() {
        assert!(pairs(json!({"a": [], "b": {}})).is_empty());
    }

    #[rstest]
    #[case(json!(["x"]))]
    #[case(json!("x"))]
    #[case(json!({"": "x"}))]
    fn test_unrepresentable_roots(#[case] value: Value) {
        let err = form_pairs(&value, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialize);
    }

    #[rstest]
    fn test_write_pairs() {
        let body = write_pairs(&[
            pair("a[first name]", Some("Ada Lovelace")),
            pair("flag", None),
            pair("q", Some("1&2=3")),
        ]);
        assert_eq!(body, "a[first+name]=Ada+Lovelace&flag&q=1%262%3D3");
    }
}
