//! Flattening of nested response payloads into node records.
//!
//! A retrieve with `rcn=4` answers with the target resource and its children
//! embedded under `ch`, each child wrapped the same way as the parent:
//!
//! ```text
//! { "m2m:ae": { "ri": "ae1", "ch": [ { "m2m:cnt": { "ri": "c1", ... } } ] } }
//! ```
//!
//! [`flatten`] walks the payload depth-first and emits one record per
//! resource, children before their parent, with `ch` removed from every
//! record. Arrays are walked element by element. Values that are neither
//! arrays nor objects are ignored.

use crate::store::NodeRecord;
use serde_json::Value;

/// Key of the embedded child collection.
pub const CHILDREN_KEY: &str = "ch";

/// Flatten a payload into records, children first.
///
/// ```
/// use onem2m_console::store::flatten;
/// use serde_json::json;
///
/// let payload = json!({
///     "m2m:ae": { "ri": "ae1", "ch": [ { "m2m:cnt": { "ri": "c1", "pi": "/InCSE1/ae1" } } ] }
/// });
/// let records = flatten(&payload);
/// let ids: Vec<_> = records.iter().map(|r| r.id.as_deref().unwrap()).collect();
/// assert_eq!(ids, ["c1", "ae1"]);
/// assert!(!records[1].attributes.contains_key("ch"));
/// ```
pub fn flatten(payload: &Value) -> Vec<NodeRecord> {
    let mut records = Vec::new();
    visit(payload, &mut records);
    records
}

/// Identifier of the outermost resource in a payload, which is the last
/// record [`flatten`] emits for it. For an array, the first element counts.
pub fn top_level_id(payload: &Value) -> Option<String> {
    match payload {
        Value::Array(items) => items.first().and_then(top_level_id),
        Value::Object(map) => {
            let (key, attributes) = map.iter().next()?;
            let attributes = attributes.as_object()?.clone();
            NodeRecord::new(key.clone(), attributes).id
        }
        _ => None,
    }
}

fn visit(value: &Value, records: &mut Vec<NodeRecord>) {
    match value {
        Value::Array(items) => {
            for item in items {
                visit(item, records);
            }
        }
        Value::Object(map) => {
            let Some((key, inner)) = map.iter().next() else {
                return;
            };
            let Some(inner) = inner.as_object() else {
                tracing::warn!(key = %key, "ignoring wrapper whose content is not an object");
                return;
            };

            let mut attributes = inner.clone();
            if let Some(children) = attributes.remove(CHILDREN_KEY) {
                visit(&children, records);
            }
            records.push(NodeRecord::new(key.clone(), attributes));
        }
        _ => {}
    }
}
