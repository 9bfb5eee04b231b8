//! Request-body skeletons per resource type and operation.
//!
//! A skeleton lists the attributes that are legal for a resource type under a
//! given operation, keyed by short name. Leaves are `null` placeholders. A
//! list-valued attribute holds exactly one placeholder slot; when the slot is
//! an object it is the prototype for one list item.
//!
//! Every call builds a fresh value, so callers own and may mutate the result.
//!
//! | Resource type | Create | Update |
//! |---------------|--------|--------|
//! | accessControlPolicy | yes | yes |
//! | AE | yes | yes |
//! | container | yes | yes |
//! | contentInstance | yes | no |
//! | group | yes | yes |
//! | node | yes | yes |
//! | subscription | yes | yes |
//!
//! ```
//! use onem2m_console::protocol::{template_for, Operation, ResourceType};
//!
//! let template = template_for(ResourceType::Container, Operation::Create).unwrap();
//! assert!(template["m2m:cnt"]["mni"].is_null());
//! assert_eq!(template["m2m:cnt"]["lbl"], serde_json::json!([null]));
//! assert!(template_for(ResourceType::ContentInstance, Operation::Update).is_none());
//! ```

use crate::protocol::{Operation, ResourceType};
use serde_json::{json, Map, Value};

/// Wrapped skeleton `{ "m2m:<short>": { ... } }` for a resource type and
/// operation, or `None` if the pair has no skeleton.
pub fn template_for(resource_type: ResourceType, operation: Operation) -> Option<Value> {
    let skeleton = resource_skeleton(resource_type, operation)?;
    let key = resource_type.wrapper_key()?;
    let mut wrapped = Map::new();
    wrapped.insert(key, skeleton);
    Some(Value::Object(wrapped))
}

/// Unwrapped attribute skeleton for a resource type and operation.
pub fn resource_skeleton(resource_type: ResourceType, operation: Operation) -> Option<Value> {
    match (resource_type, operation) {
        (ResourceType::AccessControlPolicy, Operation::Create) => Some(json!({
            "rn": null,
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "pv": privileges(),
            "pvs": privileges()
        })),
        (ResourceType::AccessControlPolicy, Operation::Update) => Some(json!({
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "pv": privileges(),
            "pvs": privileges()
        })),
        (ResourceType::Ae, Operation::Create) => Some(json!({
            "rn": null,
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "apn": null,
            "api": null,
            "poa": [null],
            "or": null,
            "rr": null
        })),
        (ResourceType::Ae, Operation::Update) => Some(json!({
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "apn": null,
            "poa": [null],
            "or": null
        })),
        (ResourceType::Container, Operation::Create) => Some(json!({
            "rn": null,
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "cr": null,
            "mni": null,
            "mbs": null,
            "mia": null,
            "li": null,
            "or": null
        })),
        (ResourceType::Container, Operation::Update) => Some(json!({
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "mni": null,
            "mbs": null,
            "mia": null,
            "li": null,
            "or": null
        })),
        (ResourceType::ContentInstance, Operation::Create) => Some(json!({
            "rn": null,
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "cr": null,
            "cnf": null,
            "cs": null,
            "or": null,
            "con": null
        })),
        (ResourceType::Node, Operation::Create) => Some(json!({
            "rn": null,
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "ni": null,
            "hcl": null
        })),
        (ResourceType::Node, Operation::Update) => Some(json!({
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "ni": null
        })),
        (ResourceType::Group, Operation::Create) => Some(json!({
            "rn": null,
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "cr": null,
            "mt": null,
            "mnm": null,
            "mid": [null],
            "macp": [null],
            "csy": null,
            "gn": null
        })),
        (ResourceType::Group, Operation::Update) => Some(json!({
            "acpi": [null],
            "et": null,
            "lbl": [null],
            "at": [null],
            "aa": [null],
            "mnm": null,
            "mid": [null],
            "macp": [null],
            "gn": null
        })),
        (ResourceType::Subscription, Operation::Create) => {
            let mut sub = subscription_common();
            if let Value::Object(map) = &mut sub {
                map.insert("rn".into(), Value::Null);
                map.insert("psn".into(), Value::Null);
                map.insert("cr".into(), Value::Null);
                map.insert("su".into(), Value::Null);
            }
            Some(sub)
        }
        (ResourceType::Subscription, Operation::Update) => Some(subscription_common()),
        _ => None,
    }
}

/// Request envelope skeleton for an operation.
///
/// Notify has no envelope; the console never issues notifications.
pub fn request_primitive(operation: Operation) -> Option<Value> {
    let mut envelope = json!({
        "op": operation.code(),
        "to": null,
        "fr": null,
        "rqi": null
    });
    let map = envelope.as_object_mut()?;

    match operation {
        Operation::Create => {
            map.insert("ty".into(), Value::Null);
            map.insert("pc".into(), Value::Null);
        }
        Operation::Update => {
            map.insert("pc".into(), Value::Null);
        }
        Operation::Retrieve | Operation::Delete => {}
        Operation::Notify => return None,
    }

    for key in ["rol", "ot", "rqet", "rset", "oet"] {
        map.insert(key.into(), Value::Null);
    }
    map.insert("rt".into(), json!({ "rtv": null, "nu": [null] }));
    for key in ["rp", "rcn", "ec", "da", "gid"] {
        map.insert(key.into(), Value::Null);
    }
    if operation != Operation::Create {
        map.insert("fc".into(), filter_criteria());
    }
    if operation == Operation::Retrieve {
        map.insert("drt".into(), Value::Null);
    }

    Some(envelope)
}

fn filter_criteria() -> Value {
    json!({
        "crb": null,
        "cra": null,
        "ms": null,
        "us": null,
        "sts": null,
        "stb": null,
        "exb": null,
        "exa": null,
        "lbl": [null],
        "ty": null,
        "sza": null,
        "szb": null,
        "cty": [null],
        "atr": [{ "nm": null, "val": null }],
        "fu": null,
        "lim": null
    })
}

fn privileges() -> Value {
    json!({
        "acr": [{
            "acor": [null],
            "acop": null,
            "acco": [{
                "actw": [null],
                "acip": {
                    "ipv4": [null],
                    "ipv6": [null]
                },
                "aclr": {
                    "accc": [null],
                    "accr": [null]
                }
            }]
        }]
    })
}

fn subscription_common() -> Value {
    json!({
        "acpi": [null],
        "et": null,
        "lbl": [null],
        "enc": {
            "crb": null,
            "cra": null,
            "ms": null,
            "us": null,
            "sts": null,
            "stb": null,
            "exb": null,
            "exa": null,
            "sza": null,
            "szb": null,
            "om": [null],
            "atr": [{ "nm": null, "val": null }],
            "net": [null]
        },
        "exc": null,
        "nu": [null],
        "gpi": null,
        "nfu": null,
        "bn": { "num": null, "dur": null },
        "rl": { "mnn": null, "tww": null },
        "pn": null,
        "nsp": null,
        "ln": null,
        "nct": null,
        "nec": null
    })
}
