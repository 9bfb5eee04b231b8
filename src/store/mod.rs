//! Client-side cache of the resource tree.
//!
//! ```text
//! store/
//! ├── flattener - nested payload -> NodeRecord list (children first)
//! ├── node    - Node, NodeRecord, Edge
//! └── tree    - ResourceTree: id index, link index, root, tickets
//! ```

mod flattener;
mod node;
mod tree;

pub use flattener::{flatten, top_level_id, CHILDREN_KEY};
pub use node::{parent_id_from_path, Edge, Node, NodeRecord, NodeRef};
pub use tree::{
    AddOutcome, Placement, RemoveOutcome, ResourceTree, Ticket, TreeSnapshot, UpdateOutcome,
};
