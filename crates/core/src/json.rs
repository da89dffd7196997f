//! Canonical-form JSON comparison used by the finalize diff.

use serde_json::Value;

/// A JSON object keyed by field name, the shape of every `params` map.
pub type JsonObject = serde_json::Map<String, Value>;

/// Structural equality between two JSON values.
///
/// Object keys are compared order-insensitively at every nesting level;
/// array element order and every scalar value remain significant. This is
/// what decides whether a mutable turn section gets echoed back.
pub fn is_json_equal(a: &Value, b: &Value) -> bool {
    canonical_string(a) == canonical_string(b)
}

/// Serializes a value with object keys sorted alphabetically at every level.
pub fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
