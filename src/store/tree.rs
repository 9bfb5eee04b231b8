//! The client-side mirror of a CSE's resource tree.
//!
//! [`ResourceTree`] indexes cached [`Node`]s by resource id, keeps a link
//! index from child id to parent id, and tracks the root. Every mutation
//! takes a payload as received from the server and flattens it first, so a
//! retrieve with embedded children lands as one node per resource.
//!
//! # Ordering
//!
//! Responses complete in whatever order the network delivers them. A
//! [`Ticket`] taken with [`ResourceTree::begin`] when a request is issued
//! orders its result against every other write: a write whose ticket is
//! older than the node's last write, or than the node's removal, is
//! reported as `Stale` and not applied. [`ResourceTree::reset`] retires
//! every ticket issued before it.
//!
//! A ticket from [`ResourceTree::begin`] stays in flight until a write
//! carrying it is applied or [`ResourceTree::finish`] is called. Removal
//! tombstones are kept only while some in-flight ticket is older than them,
//! so the tombstone table is bounded by the removals made since the oldest
//! outstanding request was issued.
//!
//! # Locking
//!
//! The tree state lock is taken before any node lock, and at most one node
//! lock is held at a time.

use crate::store::flattener::{flatten, top_level_id};
use crate::store::{Edge, Node, NodeRecord, NodeRef};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Sequence number ordering a write against the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw sequence number.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Where an added node ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The node is the root. `replaced` is set when an existing root took
    /// over the record's attributes.
    Root {
        /// Whether a previous root was overwritten
        replaced: bool,
    },
    /// Attached to a cached parent.
    Linked {
        /// Parent id
        parent: String,
    },
    /// The parent is not cached yet; the node is attached when it arrives.
    Deferred {
        /// Parent id
        parent: String,
    },
}

/// Result of adding one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The record was stored.
    Added {
        /// Resource id
        id: String,
        /// Whether an existing node absorbed the attributes
        merged: bool,
        /// Where the node sits in the tree
        placement: Placement,
    },
    /// The record had no usable `ri`.
    Skipped {
        /// Wrapper key of the record
        key: String,
    },
    /// A newer write or removal already touched this id.
    Stale {
        /// Resource id
        id: String,
    },
}

/// Result of updating one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Attributes were merged into the cached node.
    Merged {
        /// Resource id
        id: String,
    },
    /// No cached node has this id; nothing changed.
    Unknown {
        /// Resource id
        id: String,
    },
    /// The record had no usable `ri`.
    Skipped {
        /// Wrapper key of the record
        key: String,
    },
    /// A newer write or removal already touched this id.
    Stale {
        /// Resource id
        id: String,
    },
}

/// Result of a removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The node and its descendants were removed.
    Removed {
        /// Id of the removed subtree's top
        id: String,
        /// Number of nodes removed, the top included
        count: usize,
    },
    /// Nothing was cached under the id.
    Unchanged,
    /// A newer write already touched this id.
    Stale {
        /// Resource id
        id: String,
    },
}

/// Read-only view of the tree at the time of the call.
#[derive(Clone, Debug, Default)]
pub struct TreeSnapshot {
    /// Cached nodes in insertion order
    pub nodes: Vec<NodeRef>,
    /// Child to parent links
    pub links: Vec<Edge>,
    /// The root, if one is cached
    pub root: Option<NodeRef>,
}

impl TreeSnapshot {
    /// Ids of the cached nodes.
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.read().id.clone()).collect()
    }
}

#[derive(Default)]
struct TreeState {
    nodes: IndexMap<String, NodeRef>,
    links: IndexMap<String, Edge>,
    root: Option<NodeRef>,
    /// parent id -> ids of cached children waiting for it
    deferred: IndexMap<String, Vec<String>>,
    written: HashMap<String, u64>,
    tombstones: HashMap<String, u64>,
    in_flight: BTreeSet<u64>,
    next_ticket: u64,
    floor: u64,
}

/// Shared cache of the resource tree.
///
/// Clones share state, so the console and a renderer can hold the same tree.
///
/// # Examples
///
/// ```
/// use onem2m_console::store::{AddOutcome, Placement, ResourceTree};
/// use serde_json::json;
///
/// let tree = ResourceTree::new();
/// tree.add_node(&json!({ "m2m:cb": { "ri": "InCSE1", "rn": "InCSE1" } }));
/// let outcomes = tree.add_node(&json!({ "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1" } }));
///
/// assert!(matches!(
///     &outcomes[0],
///     AddOutcome::Added { placement: Placement::Linked { parent }, .. } if parent == "InCSE1"
/// ));
/// let root = tree.root().unwrap();
/// assert_eq!(root.read().child_ids(), ["ae1"]);
/// ```
#[derive(Clone, Default)]
pub struct ResourceTree {
    inner: Arc<RwLock<TreeState>>,
}

impl ResourceTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a request about to be sent.
    ///
    /// The ticket is spent by the first `*_at` write that carries it. A
    /// request that fails without a result must hand it back with
    /// [`finish`](Self::finish).
    pub fn begin(&self) -> Ticket {
        let mut state = self.inner.write();
        let ticket = state.issue();
        state.in_flight.insert(ticket.0);
        ticket
    }

    /// Retire a ticket whose request produced nothing to apply.
    pub fn finish(&self, ticket: Ticket) {
        self.inner.write().complete(ticket);
    }

    // ========== Mutations ==========

    /// Add every resource in `payload`, stamped with a fresh ticket.
    pub fn add_node(&self, payload: &Value) -> Vec<AddOutcome> {
        let mut state = self.inner.write();
        let ticket = state.issue();
        state.add_all(flatten(payload), ticket)
    }

    /// Add every resource in `payload` with the ticket of the request that
    /// produced it.
    pub fn add_node_at(&self, payload: &Value, ticket: Ticket) -> Vec<AddOutcome> {
        let mut state = self.inner.write();
        let outcomes = state.add_all(flatten(payload), ticket);
        state.complete(ticket);
        outcomes
    }

    /// Merge attributes into cached nodes, stamped with a fresh ticket.
    /// Records for unknown ids change nothing.
    pub fn update_node(&self, payload: &Value) -> Vec<UpdateOutcome> {
        let mut state = self.inner.write();
        let ticket = state.issue();
        state.update_all(flatten(payload), ticket)
    }

    /// [`update_node`](Self::update_node) with the ticket of the request
    /// that produced the payload.
    pub fn update_node_at(&self, payload: &Value, ticket: Ticket) -> Vec<UpdateOutcome> {
        let mut state = self.inner.write();
        let outcomes = state.update_all(flatten(payload), ticket);
        state.complete(ticket);
        outcomes
    }

    /// Remove the resource `payload` describes, with all its descendants.
    ///
    /// The target is the outermost resource of the payload.
    pub fn remove_node(&self, payload: &Value) -> RemoveOutcome {
        let ticket = self.begin();
        self.remove_node_at(payload, ticket)
    }

    /// [`remove_node`](Self::remove_node) with the ticket of the request
    /// that produced the payload.
    pub fn remove_node_at(&self, payload: &Value, ticket: Ticket) -> RemoveOutcome {
        match top_level_id(payload) {
            Some(id) => self.remove_node_by_id_at(&id, ticket),
            None => {
                tracing::warn!("removal payload carries no resource id");
                self.finish(ticket);
                RemoveOutcome::Unchanged
            }
        }
    }

    /// Remove a cached resource and its descendants by id.
    pub fn remove_node_by_id(&self, id: &str) -> RemoveOutcome {
        let ticket = self.begin();
        self.remove_node_by_id_at(id, ticket)
    }

    /// [`remove_node_by_id`](Self::remove_node_by_id) with a request's ticket.
    ///
    /// The id is tombstoned even when nothing is cached under it, so an
    /// older response cannot bring it back.
    pub fn remove_node_by_id_at(&self, id: &str, ticket: Ticket) -> RemoveOutcome {
        let mut state = self.inner.write();
        let outcome = state.remove_subtree(id, ticket);
        state.complete(ticket);
        outcome
    }

    /// Drop everything and retire all outstanding tickets.
    pub fn reset(&self) {
        let mut state = self.inner.write();
        let next_ticket = state.next_ticket;
        *state = TreeState {
            next_ticket,
            floor: next_ticket + 1,
            ..TreeState::default()
        };
        tracing::debug!("resource tree reset");
    }

    // ========== Queries ==========

    /// The cached node with this id.
    pub fn retrieve_node(&self, id: &str) -> Option<NodeRef> {
        self.inner.read().nodes.get(id).cloned()
    }

    /// The root node.
    pub fn root(&self) -> Option<NodeRef> {
        self.inner.read().root.clone()
    }

    /// The cached link from `id` to its parent.
    pub fn link(&self, id: &str) -> Option<Edge> {
        self.inner.read().links.get(id).cloned()
    }

    /// Ids of cached nodes still waiting for their parent.
    pub fn deferred_ids(&self) -> Vec<String> {
        self.inner.read().deferred.values().flatten().cloned().collect()
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.inner.read().nodes.is_empty()
    }

    /// Current nodes, links and root.
    pub fn snapshot(&self) -> TreeSnapshot {
        let state = self.inner.read();
        TreeSnapshot {
            nodes: state.nodes.values().cloned().collect(),
            links: state.links.values().cloned().collect(),
            root: state.root.clone(),
        }
    }
}

impl std::fmt::Debug for ResourceTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("ResourceTree")
            .field("nodes", &state.nodes.len())
            .field("links", &state.links.len())
            .field("root", &state.root.as_ref().map(|r| r.read().id.clone()))
            .finish()
    }
}

impl TreeState {
    fn issue(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Drop the ticket from the in-flight set and forget tombstones no
    /// outstanding ticket can be older than.
    fn complete(&mut self, ticket: Ticket) {
        self.in_flight.remove(&ticket.0);
        let horizon = self.in_flight.first().copied().unwrap_or(self.next_ticket);
        self.tombstones.retain(|_, removed_at| *removed_at > horizon);
    }

    fn removed_after(&self, id: &str, ticket: Ticket) -> bool {
        ticket.0 < self.floor || self.tombstones.get(id).is_some_and(|r| *r > ticket.0)
    }

    fn is_stale(&self, id: &str, ticket: Ticket) -> bool {
        self.removed_after(id, ticket) || self.written.get(id).is_some_and(|w| *w > ticket.0)
    }

    fn add_all(&mut self, records: Vec<NodeRecord>, ticket: Ticket) -> Vec<AddOutcome> {
        let stale = self.stale_records(&records, ticket);
        records
            .into_iter()
            .map(|record| match record.id.as_deref() {
                Some(id) if stale.contains(id) => {
                    tracing::warn!(id = %id, ticket = ticket.0, "ignoring stale add");
                    AddOutcome::Stale { id: id.to_string() }
                }
                _ => self.add_record(record, ticket),
            })
            .collect()
    }

    /// Ids in `records` that must not be applied: stale themselves, or
    /// below a parent that was removed after the ticket was issued.
    ///
    /// A parent that is stale only because of a newer write keeps its
    /// children. Records arrive children first, so they are walked in
    /// reverse to see every parent before its children.
    fn stale_records(&self, records: &[NodeRecord], ticket: Ticket) -> HashSet<String> {
        let mut stale = HashSet::new();
        let mut gone = HashSet::new();
        for record in records.iter().rev() {
            let Some(id) = record.id.as_deref() else {
                continue;
            };
            let parent_gone = record
                .parent_id
                .as_deref()
                .is_some_and(|parent| gone.contains(parent) || self.removed_after(parent, ticket));
            if parent_gone || self.removed_after(id, ticket) {
                gone.insert(id.to_string());
                stale.insert(id.to_string());
            } else if self.is_stale(id, ticket) {
                stale.insert(id.to_string());
            }
        }
        stale
    }

    fn add_record(&mut self, record: NodeRecord, ticket: Ticket) -> AddOutcome {
        let Some(id) = record.id.clone() else {
            tracing::warn!(key = %record.key, "skipping record without resource id");
            return AddOutcome::Skipped { key: record.key };
        };
        self.written.insert(id.clone(), ticket.0);

        let parent_id = record.parent_id.clone().filter(|p| *p != id);
        let (node, merged, placement) = match parent_id {
            None => self.place_root(record, &id),
            Some(parent) => {
                let (node, merged) = self.upsert(record, &id);
                let placement = self.place_child(&node, &id, parent);
                (node, merged, placement)
            }
        };
        self.adopt_deferred(&node, &id);

        tracing::debug!(id = %id, merged, placement = ?placement, "node added");
        AddOutcome::Added {
            id,
            merged,
            placement,
        }
    }

    fn update_all(&mut self, records: Vec<NodeRecord>, ticket: Ticket) -> Vec<UpdateOutcome> {
        records
            .into_iter()
            .map(|record| {
                let Some(id) = record.id else {
                    tracing::warn!(key = %record.key, "skipping update without resource id");
                    return UpdateOutcome::Skipped { key: record.key };
                };
                let Some(node) = self.nodes.get(&id).cloned() else {
                    tracing::warn!(id = %id, "update for uncached id");
                    return UpdateOutcome::Unknown { id };
                };
                if self.is_stale(&id, ticket) {
                    tracing::warn!(id = %id, ticket = ticket.0, "ignoring stale update");
                    return UpdateOutcome::Stale { id };
                }
                self.written.insert(id.clone(), ticket.0);
                node.write().merge(record.attributes);
                tracing::debug!(id = %id, "node updated");
                UpdateOutcome::Merged { id }
            })
            .collect()
    }

    /// Merge into the cached node with this id, or insert a new one.
    fn upsert(&mut self, record: NodeRecord, id: &str) -> (NodeRef, bool) {
        match self.nodes.get(id) {
            Some(node) => {
                node.write().merge(record.attributes);
                (Arc::clone(node), true)
            }
            None => {
                let node = Arc::new(RwLock::new(Node::from_record(record, id.to_string())));
                self.nodes.insert(id.to_string(), Arc::clone(&node));
                (node, false)
            }
        }
    }

    fn place_root(&mut self, record: NodeRecord, id: &str) -> (NodeRef, bool, Placement) {
        let Some(root) = self.root.clone() else {
            let (node, merged) = self.upsert(record, id);
            self.unlink(&node, id);
            self.root = Some(Arc::clone(&node));
            return (node, merged, Placement::Root { replaced: false });
        };

        let old_id = root.read().id.clone();
        if old_id != id {
            if self.nodes.contains_key(id) {
                self.drop_subtree(id);
            }
            self.nodes.shift_remove(&old_id);
            self.written.remove(&old_id);
            self.nodes.insert(id.to_string(), Arc::clone(&root));
            self.reparent_waiting(&root, &old_id, id);
        }
        {
            let mut node = root.write();
            node.id = id.to_string();
            node.parent_id = None;
            node.replace(record.key, record.attributes);
        }
        (root, old_id == id, Placement::Root { replaced: true })
    }

    /// Point the children of a re-keyed root at its new id.
    fn reparent_waiting(&mut self, root: &NodeRef, old_id: &str, new_id: &str) {
        let children = root.read().children().to_vec();
        for child in children {
            let mut child = child.write();
            child.parent_id = Some(new_id.to_string());
            if let Some(edge) = self.links.get_mut(&child.id) {
                edge.target = new_id.to_string();
            }
        }
        if let Some(waiting) = self.deferred.shift_remove(old_id) {
            self.deferred.entry(new_id.to_string()).or_default().extend(waiting);
        }
    }

    fn place_child(&mut self, node: &NodeRef, id: &str, parent_id: String) -> Placement {
        let previous = node.read().parent_id.clone();
        if previous.as_deref() != Some(parent_id.as_str()) {
            self.unlink(node, id);
        }
        if self.root.as_ref().is_some_and(|r| Arc::ptr_eq(r, node)) {
            self.root = None;
        }

        node.write().parent_id = Some(parent_id.clone());
        self.links.insert(
            id.to_string(),
            Edge {
                source: id.to_string(),
                target: parent_id.clone(),
            },
        );

        match self.nodes.get(&parent_id).cloned() {
            Some(parent) => {
                parent.write().attach_child(node);
                node.write().set_parent(Some(&parent));
                Placement::Linked { parent: parent_id }
            }
            None => {
                let waiting = self.deferred.entry(parent_id.clone()).or_default();
                if !waiting.iter().any(|w| w == id) {
                    waiting.push(id.to_string());
                }
                tracing::debug!(id = %id, parent = %parent_id, "parent not cached, attachment deferred");
                Placement::Deferred { parent: parent_id }
            }
        }
    }

    /// Detach a node from its current parent, link and deferred entry.
    fn unlink(&mut self, node: &NodeRef, id: &str) {
        let (parent, parent_id) = {
            let n = node.read();
            (n.parent(), n.parent_id.clone())
        };
        if let Some(parent) = parent {
            parent.write().detach_child(node);
        }
        if let Some(parent_id) = parent_id {
            if let Some(waiting) = self.deferred.get_mut(&parent_id) {
                waiting.retain(|w| w != id);
                if waiting.is_empty() {
                    self.deferred.shift_remove(&parent_id);
                }
            }
        }
        self.links.shift_remove(id);
        let mut n = node.write();
        n.parent_id = None;
        n.set_parent(None);
    }

    fn adopt_deferred(&mut self, node: &NodeRef, id: &str) {
        let Some(waiting) = self.deferred.shift_remove(id) else {
            return;
        };
        for child_id in waiting {
            let Some(child) = self.nodes.get(&child_id).cloned() else {
                continue;
            };
            if child.read().parent_id.as_deref() != Some(id) {
                continue;
            }
            node.write().attach_child(&child);
            child.write().set_parent(Some(node));
            tracing::debug!(id = %child_id, parent = %id, "deferred child attached");
        }
    }

    fn remove_subtree(&mut self, id: &str, ticket: Ticket) -> RemoveOutcome {
        if self.is_stale(id, ticket) {
            tracing::warn!(id = %id, ticket = ticket.0, "ignoring stale removal");
            return RemoveOutcome::Stale { id: id.to_string() };
        }
        self.tombstones.insert(id.to_string(), ticket.0);

        if !self.nodes.contains_key(id) {
            tracing::debug!(id = %id, "removal of uncached id");
            return RemoveOutcome::Unchanged;
        }

        let removed = self.drop_subtree(id);
        for removed_id in &removed {
            self.tombstones.insert(removed_id.clone(), ticket.0);
        }
        tracing::debug!(id = %id, count = removed.len(), "subtree removed");
        RemoveOutcome::Removed {
            id: id.to_string(),
            count: removed.len(),
        }
    }

    /// Remove a node and its descendants from every index and detach it from
    /// its parent. Returns the removed ids.
    fn drop_subtree(&mut self, id: &str) -> Vec<String> {
        let Some(target) = self.nodes.get(id).cloned() else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut stack = vec![Arc::clone(&target)];
        while let Some(node) = stack.pop() {
            let (node_id, children) = {
                let mut n = node.write();
                (n.id.clone(), n.take_children())
            };
            self.nodes.shift_remove(&node_id);
            self.links.shift_remove(&node_id);
            self.deferred.shift_remove(&node_id);
            self.written.remove(&node_id);
            removed.push(node_id);
            stack.extend(children);
        }

        let gone: HashSet<&str> = removed.iter().map(String::as_str).collect();
        self.deferred.retain(|_, waiting| {
            waiting.retain(|w| !gone.contains(w.as_str()));
            !waiting.is_empty()
        });

        let parent = target.read().parent();
        if let Some(parent) = parent {
            parent.write().detach_child(&target);
        }
        target.write().set_parent(None);
        if self.root.as_ref().is_some_and(|r| Arc::ptr_eq(r, &target)) {
            self.root = None;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cse() -> Value {
        json!({ "m2m:cb": { "ri": "InCSE1", "rn": "InCSE1", "ty": 5 } })
    }

    fn ae(id: &str) -> Value {
        json!({ "m2m:ae": { "ri": id, "rn": id, "pi": "/InCSE1/InCSE1", "ty": 2 } })
    }

    fn cnt(id: &str, parent: &str) -> Value {
        json!({ "m2m:cnt": { "ri": id, "rn": id, "pi": format!("/InCSE1/{parent}"), "ty": 3 } })
    }

    #[test]
    fn test_add_then_retrieve_same_attributes() {
        let tree = ResourceTree::new();
        let payload = json!({ "m2m:cnt": { "ri": "c1", "mni": 10, "lbl": ["a", "b"] } });
        tree.add_node(&payload);
        let node = tree.retrieve_node("c1").unwrap();
        assert_eq!(Value::Object(node.read().attributes.clone()), payload["m2m:cnt"]);
    }

    #[test]
    fn test_root_then_child_then_remove() {
        let tree = ResourceTree::new();
        tree.add_node(&json!({ "m2m:cb": { "ri": "A", "pi": null } }));
        tree.add_node(&json!({ "m2m:ae": { "ri": "B", "pi": "/InCSE1/A" } }));

        let a = tree.retrieve_node("A").unwrap();
        assert_eq!(a.read().child_ids(), ["B"]);

        let outcome = tree.remove_node(&json!({ "m2m:cb": { "ri": "A" } }));
        assert_eq!(outcome, RemoveOutcome::Removed { id: "A".into(), count: 2 });
        assert!(tree.retrieve_node("A").is_none());
        assert!(tree.retrieve_node("B").is_none());
        assert!(tree.snapshot().links.is_empty());
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_remove_subtree_counts() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));
        tree.add_node(&cnt("c1", "ae1"));
        tree.add_node(&cnt("c2", "ae1"));
        tree.add_node(&cnt("c3", "c1"));
        tree.add_node(&ae("ae2"));
        assert_eq!(tree.snapshot().links.len(), 5);

        let outcome = tree.remove_node(&ae("ae1"));
        assert_eq!(outcome, RemoveOutcome::Removed { id: "ae1".into(), count: 4 });
        for id in ["ae1", "c1", "c2", "c3"] {
            assert!(tree.retrieve_node(id).is_none(), "{id} still cached");
        }
        assert_eq!(tree.snapshot().links.len(), 1);
        assert_eq!(tree.root().unwrap().read().child_ids(), ["ae2"]);
    }

    #[test]
    fn test_remove_last_child_drops_children_list() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));
        tree.remove_node_by_id("ae1");
        assert!(!tree.root().unwrap().read().has_children());
    }

    #[test]
    fn test_remove_unknown_is_unchanged() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        assert_eq!(tree.remove_node(&ae("nope")), RemoveOutcome::Unchanged);
        assert_eq!(tree.remove_node(&json!(null)), RemoveOutcome::Unchanged);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_update_touches_only_patched_attribute() {
        let tree = ResourceTree::new();
        tree.add_node(&json!({ "m2m:cnt": { "ri": "c1", "mni": 1, "mbs": 100, "lbl": ["x"] } }));
        let outcomes = tree.update_node(&json!({ "m2m:cnt": { "ri": "c1", "mni": 7 } }));
        assert_eq!(outcomes, [UpdateOutcome::Merged { id: "c1".into() }]);

        let node = tree.retrieve_node("c1").unwrap();
        let node = node.read();
        assert_eq!(node.attributes["mni"], json!(7));
        assert_eq!(node.attributes["mbs"], json!(100));
        assert_eq!(node.attributes["lbl"], json!(["x"]));
    }

    #[test]
    fn test_update_unknown_inserts_nothing() {
        let tree = ResourceTree::new();
        let outcomes = tree.update_node(&cnt("c9", "ae1"));
        assert_eq!(outcomes, [UpdateOutcome::Unknown { id: "c9".into() }]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_merge_preserves_identity() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));
        let selected = tree.retrieve_node("ae1").unwrap();

        let outcomes = tree.add_node(&json!({ "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1", "lbl": ["new"] } }));
        assert!(matches!(&outcomes[0], AddOutcome::Added { merged: true, .. }));
        assert!(Arc::ptr_eq(&selected, &tree.retrieve_node("ae1").unwrap()));
        assert_eq!(selected.read().attributes["lbl"], json!(["new"]));
        assert_eq!(selected.read().name(), Some("ae1"));
        assert_eq!(tree.root().unwrap().read().children().len(), 1);
    }

    #[test]
    fn test_deferred_parent_resolution() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        let outcomes = tree.add_node(&cnt("c1", "ae1"));
        assert_eq!(
            outcomes,
            [AddOutcome::Added {
                id: "c1".into(),
                merged: false,
                placement: Placement::Deferred { parent: "ae1".into() },
            }]
        );
        assert_eq!(tree.deferred_ids(), ["c1"]);
        assert_eq!(tree.link("c1").unwrap().target, "ae1");

        tree.add_node(&ae("ae1"));
        let ae1 = tree.retrieve_node("ae1").unwrap();
        assert_eq!(ae1.read().child_ids(), ["c1"]);
        let c1 = tree.retrieve_node("c1").unwrap();
        assert!(Arc::ptr_eq(&c1.read().parent().unwrap(), &ae1));
        assert!(tree.deferred_ids().is_empty());
    }

    #[test]
    fn test_expand_payload_links_children() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&json!({
            "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1", "ch": [
                { "m2m:cnt": { "ri": "c1", "pi": "/InCSE1/ae1" } },
                { "m2m:cnt": { "ri": "c2", "pi": "/InCSE1/ae1" } }
            ] }
        }));
        let ae1 = tree.retrieve_node("ae1").unwrap();
        assert_eq!(ae1.read().child_ids(), ["c1", "c2"]);
        assert!(!ae1.read().attributes.contains_key("ch"));
        assert!(tree.deferred_ids().is_empty());
    }

    #[test]
    fn test_record_without_id_skipped() {
        let tree = ResourceTree::new();
        let outcomes = tree.add_node(&json!({ "m2m:cnt": { "rn": "anonymous" } }));
        assert_eq!(outcomes, [AddOutcome::Skipped { key: "m2m:cnt".into() }]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_second_root_replaces_attributes() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));
        let root = tree.root().unwrap();

        let outcomes = tree.add_node(&json!({ "m2m:cb": { "ri": "InCSE1", "csi": "/InCSE1" } }));
        assert!(matches!(
            &outcomes[0],
            AddOutcome::Added { placement: Placement::Root { replaced: true }, .. }
        ));
        assert!(Arc::ptr_eq(&root, &tree.root().unwrap()));
        assert_eq!(root.read().attribute("rn"), None);
        assert_eq!(root.read().attribute("csi"), Some(&json!("/InCSE1")));
        assert_eq!(root.read().child_ids(), ["ae1"]);
    }

    #[test]
    fn test_reparented_node_moves() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));
        tree.add_node(&ae("ae2"));
        tree.add_node(&cnt("c1", "ae1"));
        tree.add_node(&cnt("c1", "ae2"));

        assert!(!tree.retrieve_node("ae1").unwrap().read().has_children());
        assert_eq!(tree.retrieve_node("ae2").unwrap().read().child_ids(), ["c1"]);
        assert_eq!(tree.link("c1").unwrap().target, "ae2");
    }

    #[test]
    fn test_stale_add_after_removal() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));

        let retrieve = tree.begin();
        let delete = tree.begin();
        tree.remove_node_by_id_at("ae1", delete);

        let outcomes = tree.add_node_at(&ae("ae1"), retrieve);
        assert_eq!(outcomes, [AddOutcome::Stale { id: "ae1".into() }]);
        assert!(tree.retrieve_node("ae1").is_none());

        let outcomes = tree.add_node(&ae("ae1"));
        assert!(matches!(&outcomes[0], AddOutcome::Added { merged: false, .. }));
    }

    #[test]
    fn test_late_expand_of_removed_node() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));

        let expand = tree.begin();
        tree.remove_node_by_id("ae1");

        let outcomes = tree.add_node_at(
            &json!({ "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1", "ch": [
                { "m2m:cnt": { "ri": "c1", "pi": "/InCSE1/ae1", "ch": [
                    { "m2m:cin": { "ri": "i1", "pi": "/InCSE1/c1" } }
                ] } }
            ] } }),
            expand,
        );
        assert_eq!(
            outcomes,
            [
                AddOutcome::Stale { id: "i1".into() },
                AddOutcome::Stale { id: "c1".into() },
                AddOutcome::Stale { id: "ae1".into() },
            ]
        );
        assert_eq!(tree.len(), 1);
        assert!(tree.deferred_ids().is_empty());
    }

    #[test]
    fn test_late_expand_keeps_children_of_edited_node() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));

        let expand = tree.begin();
        tree.update_node(&json!({ "m2m:ae": { "ri": "ae1", "lbl": ["new"] } }));

        let outcomes = tree.add_node_at(
            &json!({ "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1", "lbl": ["old"], "ch": [
                { "m2m:cnt": { "ri": "c1", "pi": "/InCSE1/ae1" } },
                { "m2m:cnt": { "ri": "c2", "pi": "/InCSE1/ae1" } }
            ] } }),
            expand,
        );
        let linked = Placement::Linked { parent: "ae1".into() };
        assert_eq!(
            outcomes,
            [
                AddOutcome::Added { id: "c1".into(), merged: false, placement: linked.clone() },
                AddOutcome::Added { id: "c2".into(), merged: false, placement: linked },
                AddOutcome::Stale { id: "ae1".into() },
            ]
        );
        let ae1 = tree.retrieve_node("ae1").unwrap();
        assert_eq!(ae1.read().child_ids(), ["c1", "c2"]);
        assert_eq!(ae1.read().attributes["lbl"], json!(["new"]));
    }

    #[test]
    fn test_tombstones_kept_while_older_request_in_flight() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));
        tree.add_node(&ae("ae2"));

        let slow = tree.begin();
        tree.remove_node_by_id("ae1");
        assert_eq!(tree.inner.read().tombstones.len(), 1);

        tree.add_node_at(&cse(), slow);
        assert!(tree.inner.read().tombstones.is_empty());

        tree.remove_node_by_id("ae2");
        assert!(tree.inner.read().tombstones.is_empty());
    }

    #[test]
    fn test_finish_releases_tombstones() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        tree.add_node(&ae("ae1"));

        let older = tree.begin();
        let newer = tree.begin();
        tree.remove_node_by_id("ae1");

        tree.finish(newer);
        assert_eq!(tree.inner.read().tombstones.len(), 1);
        assert!(matches!(&tree.add_node_at(&ae("ae1"), older)[0], AddOutcome::Stale { .. }));
        assert!(tree.inner.read().tombstones.is_empty());
    }

    #[test]
    fn test_stale_removal_after_newer_write() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        let delete = tree.begin();
        tree.add_node(&ae("ae1"));

        assert_eq!(
            tree.remove_node_by_id_at("ae1", delete),
            RemoveOutcome::Stale { id: "ae1".into() }
        );
        assert!(tree.retrieve_node("ae1").is_some());
    }

    #[test]
    fn test_stale_update() {
        let tree = ResourceTree::new();
        tree.add_node(&json!({ "m2m:cnt": { "ri": "c1", "mni": 1 } }));
        let old = tree.begin();
        tree.update_node(&json!({ "m2m:cnt": { "ri": "c1", "mni": 2 } }));

        let outcomes = tree.update_node_at(&json!({ "m2m:cnt": { "ri": "c1", "mni": 3 } }), old);
        assert_eq!(outcomes, [UpdateOutcome::Stale { id: "c1".into() }]);
        assert_eq!(tree.retrieve_node("c1").unwrap().read().attributes["mni"], json!(2));
    }

    #[test]
    fn test_reset_retires_tickets() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        let before = tree.begin();
        tree.reset();

        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert!(matches!(&tree.add_node_at(&cse(), before)[0], AddOutcome::Stale { .. }));
        assert!(matches!(&tree.add_node(&cse())[0], AddOutcome::Added { .. }));
    }

    #[test]
    fn test_snapshot_reflects_current_state() {
        let tree = ResourceTree::new();
        tree.add_node(&cse());
        let first = tree.snapshot();
        tree.add_node(&ae("ae1"));
        let second = tree.snapshot();

        assert_eq!(first.node_ids(), ["InCSE1"]);
        assert_eq!(second.node_ids(), ["InCSE1", "ae1"]);
        assert_eq!(
            second.links,
            [Edge { source: "ae1".into(), target: "InCSE1".into() }]
        );
        assert!(second.root.is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let tree = ResourceTree::new();
        let view = tree.clone();
        tree.add_node(&cse());
        assert_eq!(view.len(), 1);
    }
}
