use serde_json::Value;

use crate::text::string::escape_string_into;
use crate::EncodeOptions;

/// Canonical text writer: compact JSON with every string escaped the way
/// form-body clients expect (`\/`, `\u00xx` for controls).
pub(crate) struct Writer {
    buffer: String,
    options: EncodeOptions,
}

impl Writer {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            buffer: String::new(),
            options,
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.buffer.push_str("null"),
            Value::Bool(true) => self.buffer.push_str("true"),
            Value::Bool(false) => self.buffer.push_str("false"),
            Value::Number(number) => self.buffer.push_str(&number.to_string()),
            Value::String(text) => self.write_string(text),
            Value::Array(items) => {
                self.buffer.push('[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        self.buffer.push(',');
                    }
                    self.write_value(item);
                }
                self.buffer.push(']');
            }
            Value::Object(members) => {
                self.buffer.push('{');
                for (idx, (name, member)) in members.iter().enumerate() {
                    if idx > 0 {
                        self.buffer.push(',');
                    }
                    self.write_string(name);
                    self.buffer.push(':');
                    self.write_value(member);
                }
                self.buffer.push('}');
            }
        }
    }

    fn write_string(&mut self, text: &str) {
        self.buffer.push('"');
        escape_string_into(&mut self.buffer, text, self.options.escape_solidus);
        self.buffer.push('"');
    }
}
