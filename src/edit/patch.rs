//! Update patches and template seeding.

use crate::client::wrapper_key;
use serde_json::{Map, Value};

/// Attributes of `edited` that differ from `pristine`, under `edited`'s
/// wrapper key.
///
/// Comparison is structural. An attribute that exists only in `pristine` is
/// never part of the patch: updates overwrite attributes, they do not
/// delete them.
///
/// ```
/// use onem2m_console::edit::diff;
/// use serde_json::json;
///
/// let pristine = json!({ "m2m:cnt": { "mni": 10, "lbl": ["a", null], "or": null } });
/// let edited = json!({ "m2m:cnt": { "mni": 20, "lbl": ["a", null], "or": null } });
/// assert_eq!(diff(&edited, &pristine), json!({ "m2m:cnt": { "mni": 20 } }));
/// ```
pub fn diff(edited: &Value, pristine: &Value) -> Value {
    let Some(key) = wrapper_key(edited) else {
        return Value::Object(Map::new());
    };
    let baseline = pristine.get(key).and_then(Value::as_object);

    let mut changed = Map::new();
    if let Some(attributes) = edited.get(key).and_then(Value::as_object) {
        for (name, value) in attributes {
            if baseline.and_then(|b| b.get(name)) != Some(value) {
                changed.insert(name.clone(), value.clone());
            }
        }
    }

    let mut patch = Map::new();
    patch.insert(key.to_string(), Value::Object(changed));
    Value::Object(patch)
}

/// Fill a request-body skeleton with the live attributes of a resource.
///
/// Only the skeleton's keys are visited. For each of them:
///
/// - a live list expands the skeleton's single slot into one copy of the
///   slot per live item, followed by a fresh slot for new input. Object
///   items are seeded into their copy, other items are taken as they are.
/// - a live object is seeded into an object slot, or replaces a scalar slot.
/// - a live scalar replaces the placeholder.
/// - a missing or `null` live value leaves the placeholder.
///
/// Every copy is independent of the skeleton and of the other copies.
///
/// ```
/// use onem2m_console::edit::seed_template;
/// use serde_json::json;
///
/// let template = json!({ "nu": [null], "bn": { "num": null, "dur": null }, "nct": null });
/// let live = json!({ "nu": ["http://a", "http://b"], "bn": { "num": 3 }, "ri": "sub1" });
/// assert_eq!(
///     seed_template(&template, &live),
///     json!({ "nu": ["http://a", "http://b", null], "bn": { "num": 3, "dur": null }, "nct": null })
/// );
/// ```
pub fn seed_template(template: &Value, live: &Value) -> Value {
    let (Some(slots), Some(values)) = (template.as_object(), live.as_object()) else {
        return template.clone();
    };

    let mut seeded = Map::new();
    for (key, slot) in slots {
        let value = match values.get(key) {
            Some(live) => seed_slot(slot, live),
            None => slot.clone(),
        };
        seeded.insert(key.clone(), value);
    }
    Value::Object(seeded)
}

fn seed_slot(slot: &Value, live: &Value) -> Value {
    match live {
        Value::Null => slot.clone(),
        Value::Array(items) => {
            let Some(prototype) = slot.as_array().and_then(|s| s.first()) else {
                return live.clone();
            };
            let mut seeded: Vec<Value> = items
                .iter()
                .map(|item| {
                    if item.is_object() && prototype.is_object() {
                        seed_template(prototype, item)
                    } else {
                        item.clone()
                    }
                })
                .collect();
            seeded.push(prototype.clone());
            Value::Array(seeded)
        }
        Value::Object(_) if slot.is_object() => seed_template(slot, live),
        _ => live.clone(),
    }
}
