//! Wire cleanup of edited request bodies.
//!
//! Forms are full of placeholders: every attribute of the skeleton is
//! present, every list ends with an empty slot for new input. Before a form
//! is sent, [`to_wire_json`] strips everything the operator did not fill in.

use serde_json::Value;

/// Strip placeholders from an edited request body.
///
/// 1. The trailing placeholder slots of every list are dropped, innermost
///    lists first.
/// 2. Attributes and list items whose value is `null`, `""` or `[]` are
///    removed, recursively.
/// 3. Objects left empty are removed as well.
///
/// A placeholder is `null`, `""`, or a list or object holding only
/// placeholders. Numbers and booleans are always kept, `0` and `false`
/// included.
///
/// ```
/// use onem2m_console::edit::to_wire_json;
/// use serde_json::json;
///
/// let form = json!({
///     "op": 1, "to": "InCSE1", "rqet": null,
///     "pc": { "m2m:cnt": { "rn": "temp", "lbl": ["a", null], "acpi": [null], "mni": 0 } },
///     "rt": { "rtv": null, "nu": [null] }
/// });
/// assert_eq!(
///     to_wire_json(form),
///     json!({ "op": 1, "to": "InCSE1", "pc": { "m2m:cnt": { "rn": "temp", "lbl": ["a"], "mni": 0 } } })
/// );
/// ```
pub fn to_wire_json(mut value: Value) -> Value {
    trim_trailing(&mut value);
    prune(&mut value);
    value
}

fn trim_trailing(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for item in items.iter_mut() {
                trim_trailing(item);
            }
            while items.last().is_some_and(is_placeholder) {
                items.pop();
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                trim_trailing(item);
            }
        }
        _ => {}
    }
}

fn prune(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for item in items.iter_mut() {
                prune(item);
            }
            items.retain(|item| !is_blank(item));
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                prune(item);
            }
            map.retain(|_, item| !is_blank(item));
        }
        _ => {}
    }
}

/// Carries no operator input.
fn is_placeholder(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.iter().all(is_placeholder),
        Value::Object(map) => map.values().all(is_placeholder),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Left empty after pruning.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
