//! The console: a client bound to a CSE plus the cached tree of its
//! resources.
//!
//! Every operation sends one request and folds the result into the
//! [`ResourceTree`]. The tree ticket is taken when the request is issued, so
//! results applied out of order cannot undo a newer write.
//!
//! ```ignore
//! use onem2m_console::{ClientConfig, Console};
//!
//! #[tokio::main]
//! async fn main() -> onem2m_console::Result<()> {
//!     let console = Console::new(ClientConfig::default())?;
//!     console.connect("localhost", 8282, "InCSE1", false).await?;
//!     console.expand("InCSE1").await?;
//!     for node in console.tree().snapshot().nodes {
//!         println!("{}", node.read().id);
//!     }
//!     Ok(())
//! }
//! ```

use crate::client::{ClientConfig, Onem2mClient};
use crate::edit::{RequestForm, RetrieveMode};
use crate::error::{ConsoleError, Result};
use crate::protocol::{AttributeDictionary, Operation, ResourceType};
use crate::store::{AddOutcome, RemoveOutcome, ResourceTree, UpdateOutcome};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// What a submitted form did to the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// Create or retrieve results were added.
    Added(Vec<AddOutcome>),
    /// Update results were merged.
    Updated(Vec<UpdateOutcome>),
    /// The deleted subtree was removed.
    Removed(RemoveOutcome),
}

/// A client and the resource tree it has fetched so far.
pub struct Console {
    client: RwLock<Onem2mClient>,
    tree: ResourceTree,
}

impl Console {
    /// Console with the reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_client(Onem2mClient::new(config)?))
    }

    /// Console around an existing client.
    pub fn with_client(client: Onem2mClient) -> Self {
        Console {
            client: RwLock::new(client),
            tree: ResourceTree::new(),
        }
    }

    /// The client currently in use.
    pub fn client(&self) -> Onem2mClient {
        self.client.read().clone()
    }

    /// The cached tree. Clones of it stay in sync with the console.
    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    /// Load a CSE: its base resource, or with `all_descendants` everything a
    /// discovery below the base address returns.
    ///
    /// On success the console targets `host:port` from then on and the tree
    /// holds only the result. On failure nothing changes.
    pub async fn connect(
        &self,
        host: &str,
        port: u16,
        cse_base: &str,
        all_descendants: bool,
    ) -> Result<Vec<AddOutcome>> {
        let client = self.client().retarget(host, port)?;
        let content = if all_descendants {
            client.discovery().await?
        } else {
            client.retrieve_cse(cse_base).await?
        };

        *self.client.write() = client;
        self.tree.reset();
        let outcomes = self.tree.add_node(&content);
        tracing::info!(host, port, cse_base, nodes = self.tree.len(), "connected");
        Ok(outcomes)
    }

    /// Fetch a node's direct children into the tree.
    pub async fn expand(&self, node_id: &str) -> Result<Vec<AddOutcome>> {
        let client = self.client();
        let ticket = self.tree.begin();
        let content = match client.retrieve_children(node_id).await {
            Ok(content) => content,
            Err(err) => {
                self.tree.finish(ticket);
                return Err(err);
            }
        };
        Ok(self.tree.add_node_at(&content, ticket))
    }

    /// Send a form and apply the result: deletes remove the target subtree,
    /// updates merge, everything else adds.
    pub async fn submit(&self, form: &RequestForm) -> Result<Applied> {
        let request = form.wire_request()?;
        let op = request.op;
        let target = request.to.clone();

        let client = self.client();
        let ticket = self.tree.begin();
        let content = match client.send(request).await {
            Ok(content) => content,
            Err(err) => {
                self.tree.finish(ticket);
                return Err(err);
            }
        };

        let applied = match op {
            Operation::Delete => Applied::Removed(self.tree.remove_node_by_id_at(&target, ticket)),
            Operation::Update => Applied::Updated(self.tree.update_node_at(&content, ticket)),
            _ => Applied::Added(self.tree.add_node_at(&content, ticket)),
        };
        tracing::debug!(op = %op, target = %target, applied = ?applied, "form applied");
        Ok(applied)
    }

    /// Attribute descriptions for a cached node's resource type.
    pub fn describe(&self, node_id: &str) -> Option<BTreeMap<String, String>> {
        let node = self.tree.retrieve_node(node_id)?;
        let resource_type = node.read().resource_type.unwrap_or(ResourceType::Unknown(0));
        Some(AttributeDictionary::standard().describe(resource_type))
    }

    // ========== Forms ==========

    /// Create form for a child of `target_id`.
    pub fn create_form(&self, target_id: &str, resource_type: ResourceType) -> Result<RequestForm> {
        let client = self.client();
        RequestForm::create(target_id, resource_type, &client.config().origin, client.request_ids())
    }

    /// Retrieve form for `target_id`.
    pub fn retrieve_form(&self, target_id: &str, mode: RetrieveMode) -> RequestForm {
        let client = self.client();
        RequestForm::retrieve(target_id, mode, &client.config().origin, client.request_ids())
    }

    /// Update form seeded with the cached node's attributes.
    pub fn update_form(&self, node_id: &str) -> Result<RequestForm> {
        let node = self
            .tree
            .retrieve_node(node_id)
            .ok_or_else(|| ConsoleError::Form(format!("{} is not cached", node_id)))?;
        let client = self.client();
        let node = node.read();
        RequestForm::update(&node, &client.config().origin, client.request_ids())
    }

    /// Delete form for `target_id`.
    pub fn delete_form(&self, target_id: &str, advanced: bool) -> RequestForm {
        let client = self.client();
        RequestForm::delete(target_id, advanced, &client.config().origin, client.request_ids())
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("client", &*self.client.read())
            .field("tree", &self.tree)
            .finish()
    }
}
