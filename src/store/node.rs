//! Cached resource nodes.

use crate::protocol::ResourceType;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Weak};

/// Shared handle to a cached node.
///
/// The handle stays valid while the node is merged, so a UI can hold on to
/// "the selected node" across refreshes.
pub type NodeRef = Arc<RwLock<Node>>;

/// A resource in the client-side mirror of the resource tree.
#[derive(Debug)]
pub struct Node {
    /// Wrapper key the resource arrived under (`m2m:cnt`)
    pub key: String,
    /// Resource identifier (`ri`)
    pub id: String,
    /// Identifier of the parent, derived from `pi`; `None` for the root
    pub parent_id: Option<String>,
    /// Resource type (`ty`), if the server sent one
    pub resource_type: Option<ResourceType>,
    /// Attributes by short name, without the embedded `ch` collection
    pub attributes: Map<String, Value>,
    children: Option<Vec<NodeRef>>,
    parent: Option<Weak<RwLock<Node>>>,
}

impl Node {
    pub(crate) fn from_record(record: NodeRecord, id: String) -> Self {
        Node {
            key: record.key,
            id,
            parent_id: record.parent_id,
            resource_type: record.resource_type,
            attributes: record.attributes,
            children: None,
            parent: None,
        }
    }

    /// Child nodes in attachment order.
    pub fn children(&self) -> &[NodeRef] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Whether any child is attached. A node whose last child was removed
    /// has no children list at all.
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Identifiers of the attached children.
    pub fn child_ids(&self) -> Vec<String> {
        self.children().iter().map(|c| c.read().id.clone()).collect()
    }

    /// The parent node, while it is cached and attached.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Resource name (`rn`).
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("rn").and_then(Value::as_str)
    }

    /// Attribute by short name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The node as a wire payload: `{ key: attributes }`.
    pub fn to_value(&self) -> Value {
        let mut wrapped = Map::new();
        wrapped.insert(self.key.clone(), Value::Object(self.attributes.clone()));
        Value::Object(wrapped)
    }

    pub(crate) fn merge(&mut self, attributes: Map<String, Value>) {
        for (k, v) in attributes {
            self.attributes.insert(k, v);
        }
        self.refresh_derived();
    }

    pub(crate) fn replace(&mut self, key: String, attributes: Map<String, Value>) {
        self.key = key;
        self.attributes = attributes;
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        if let Some(ty) = self.attributes.get("ty").and_then(resource_type_of) {
            self.resource_type = Some(ty);
        }
    }

    pub(crate) fn attach_child(&mut self, child: &NodeRef) {
        let children = self.children.get_or_insert_with(Vec::new);
        if !children.iter().any(|c| Arc::ptr_eq(c, child)) {
            children.push(Arc::clone(child));
        }
    }

    /// Detach `child`; drops the children list when it becomes empty.
    pub(crate) fn detach_child(&mut self, child: &NodeRef) -> bool {
        let Some(children) = self.children.as_mut() else {
            return false;
        };
        let before = children.len();
        children.retain(|c| !Arc::ptr_eq(c, child));
        let removed = children.len() != before;
        if children.is_empty() {
            self.children = None;
        }
        removed
    }

    pub(crate) fn take_children(&mut self) -> Vec<NodeRef> {
        self.children.take().unwrap_or_default()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<&NodeRef>) {
        self.parent = parent.map(Arc::downgrade);
    }
}

/// One resource extracted from a response payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    /// Wrapper key (`m2m:ae`)
    pub key: String,
    /// Resource identifier, `None` if the payload had no usable `ri`
    pub id: Option<String>,
    /// Parent identifier derived from `pi`
    pub parent_id: Option<String>,
    /// Resource type from `ty`
    pub resource_type: Option<ResourceType>,
    /// Attributes without the embedded `ch` collection
    pub attributes: Map<String, Value>,
}

impl NodeRecord {
    /// Record for a wrapper key and its attribute map.
    pub fn new(key: impl Into<String>, attributes: Map<String, Value>) -> Self {
        NodeRecord {
            key: key.into(),
            id: attributes.get("ri").and_then(scalar_text),
            parent_id: attributes
                .get("pi")
                .and_then(Value::as_str)
                .and_then(parent_id_from_path),
            resource_type: attributes.get("ty").and_then(resource_type_of),
            attributes,
        }
    }
}

/// Link from a child to its parent, keyed by the child id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Child id
    pub source: String,
    /// Parent id
    pub target: String,
}

/// Parent id from a structured `pi` path.
///
/// The parent id is the second non-empty segment (`/InCSE1/ae1` gives
/// `ae1`). A path with a single segment is the parent id itself. An empty
/// path means no parent. Empty segments are skipped on purpose, so an
/// absolute `//sp/InCSE1/ae1` path yields `InCSE1` rather than a blank id.
///
/// ```
/// use onem2m_console::store::parent_id_from_path;
///
/// assert_eq!(parent_id_from_path("/InCSE1/ae1").as_deref(), Some("ae1"));
/// assert_eq!(parent_id_from_path("InCSE1").as_deref(), Some("InCSE1"));
/// assert_eq!(parent_id_from_path("/"), None);
/// assert_eq!(parent_id_from_path("//sp/InCSE1/ae1").as_deref(), Some("InCSE1"));
/// ```
pub fn parent_id_from_path(pi: &str) -> Option<String> {
    let mut segments = pi.split('/').filter(|s| !s.is_empty());
    let first = segments.next()?;
    Some(segments.next().unwrap_or(first).to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn resource_type_of(value: &Value) -> Option<ResourceType> {
    let code = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    code.map(ResourceType::from_code)
}
