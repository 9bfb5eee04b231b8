//! Editable request forms.
//!
//! A [`RequestForm`] holds a request envelope as plain JSON so an operator
//! can fill it in field by field, addressed with JSON pointers
//! (`/pc/m2m:cnt/mni`). Every attribute the operation allows is present
//! up front as a placeholder; [`RequestForm::wire_request`] strips what was
//! left untouched and produces the [`RequestPrimitive`] to send.
//!
//! | Form | Starts from |
//! |------|-------------|
//! | create | full create envelope, `pc` = create skeleton of the chosen type |
//! | retrieve | minimal envelope per [`RetrieveMode`] |
//! | update | full update envelope, `pc` = update skeleton seeded with the node |
//! | delete | minimal envelope, or the full one in advanced mode |
//!
//! An update form keeps a pristine copy of itself, and only the attributes
//! the operator changed are sent.

use crate::client::RequestIds;
use crate::edit::{diff, seed_template, to_wire_json};
use crate::error::{ConsoleError, Result};
use crate::protocol::{
    request_primitive, AttributeDictionary, FilterUsage, Operation, ResourceType, ResultContent,
};
use crate::store::Node;
use crate::types::RequestPrimitive;
use serde_json::{json, Map, Value};

/// How a retrieve form is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrieveMode {
    /// The target with its direct children (`rcn=4`)
    #[default]
    Children,
    /// Discovery of every descendant (`fc.fu=1`)
    Descendants,
    /// The full retrieve envelope, to be filled in by hand
    Custom,
}

/// A request envelope under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestForm {
    operation: Operation,
    resource_type: Option<ResourceType>,
    request: Value,
    pristine: Option<Value>,
}

impl RequestForm {
    /// Form creating a resource of `resource_type` below `target_id`.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::UnsupportedTemplate`] if the type cannot be created
    /// from the console.
    pub fn create(
        target_id: &str,
        resource_type: ResourceType,
        origin: &str,
        ids: &RequestIds,
    ) -> Result<Self> {
        let mut request = envelope(Operation::Create, true, target_id, origin, ids)?;
        request["ty"] = json!(resource_type.code());
        request["pc"] = AttributeDictionary::standard().template_for(resource_type, Operation::Create)?;
        Ok(RequestForm {
            operation: Operation::Create,
            resource_type: Some(resource_type),
            request,
            pristine: None,
        })
    }

    /// Form retrieving `target_id`.
    pub fn retrieve(target_id: &str, mode: RetrieveMode, origin: &str, ids: &RequestIds) -> Self {
        let custom = mode == RetrieveMode::Custom;
        let mut request = envelope(Operation::Retrieve, custom, target_id, origin, ids)
            .unwrap_or_else(|_| minimal(Operation::Retrieve, target_id, origin, ids));
        match mode {
            RetrieveMode::Children => {
                request["rcn"] = json!(ResultContent::AttributesAndChildResources.code());
            }
            RetrieveMode::Descendants => {
                request["fc"] = json!({ "fu": FilterUsage::DiscoveryCriteria.code() });
            }
            RetrieveMode::Custom => {}
        }
        RequestForm {
            operation: Operation::Retrieve,
            resource_type: None,
            request,
            pristine: None,
        }
    }

    /// Form updating a cached node, seeded with its current attributes.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Form`] if the node's resource type is unknown, and
    /// [`ConsoleError::UnsupportedTemplate`] if the type cannot be updated.
    pub fn update(node: &Node, origin: &str, ids: &RequestIds) -> Result<Self> {
        let resource_type = node
            .resource_type
            .ok_or_else(|| ConsoleError::Form(format!("resource type of {} is unknown", node.id)))?;
        let template = AttributeDictionary::standard().template_for(resource_type, Operation::Update)?;

        let mut live = Map::new();
        if let Some(key) = template.as_object().and_then(|t| t.keys().next()) {
            live.insert(key.clone(), Value::Object(node.attributes.clone()));
        }

        let mut request = envelope(Operation::Update, true, &node.id, origin, ids)?;
        request["pc"] = seed_template(&template, &Value::Object(live));
        Ok(RequestForm {
            operation: Operation::Update,
            resource_type: Some(resource_type),
            pristine: Some(request.clone()),
            request,
        })
    }

    /// Form deleting `target_id`. Advanced mode exposes the full envelope.
    pub fn delete(target_id: &str, advanced: bool, origin: &str, ids: &RequestIds) -> Self {
        let request = envelope(Operation::Delete, advanced, target_id, origin, ids)
            .unwrap_or_else(|_| minimal(Operation::Delete, target_id, origin, ids));
        RequestForm {
            operation: Operation::Delete,
            resource_type: None,
            request,
            pristine: None,
        }
    }

    /// Operation of the form.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Resource type of a create or update form.
    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type
    }

    /// Target id (`to`).
    pub fn target(&self) -> Option<&str> {
        self.request.get("to").and_then(Value::as_str)
    }

    /// The envelope as currently edited.
    pub fn request(&self) -> &Value {
        &self.request
    }

    /// The envelope as it was seeded, for update forms.
    pub fn pristine(&self) -> Option<&Value> {
        self.pristine.as_ref()
    }

    /// Value at a JSON pointer.
    pub fn value_at(&self, pointer: &str) -> Option<&Value> {
        self.request.pointer(pointer)
    }

    /// Mutable value at a JSON pointer.
    pub fn value_at_mut(&mut self, pointer: &str) -> Option<&mut Value> {
        self.request.pointer_mut(pointer)
    }

    /// Overwrite the value at a JSON pointer.
    pub fn set(&mut self, pointer: &str, value: impl Into<Value>) -> Result<()> {
        let slot = self
            .value_at_mut(pointer)
            .ok_or_else(|| ConsoleError::Form(format!("no field at {}", pointer)))?;
        *slot = value.into();
        Ok(())
    }

    /// Switch a create form to another resource type, replacing `pc` with
    /// that type's skeleton.
    pub fn set_resource_type(&mut self, resource_type: ResourceType) -> Result<()> {
        if self.operation != Operation::Create {
            return Err(ConsoleError::Form(format!(
                "resource type is fixed for {} forms",
                self.operation
            )));
        }
        let template = AttributeDictionary::standard().template_for(resource_type, Operation::Create)?;
        self.request["ty"] = json!(resource_type.code());
        self.request["pc"] = template;
        self.resource_type = Some(resource_type);
        Ok(())
    }

    /// Add a slot to the list at `pointer`: a copy of its last slot, placed
    /// first.
    pub fn add_item(&mut self, pointer: &str) -> Result<()> {
        let items = self.list_at(pointer)?;
        let slot = items.last().cloned().unwrap_or(Value::Null);
        items.insert(0, slot);
        Ok(())
    }

    /// Remove and return item `index` of the list at `pointer`.
    pub fn remove_item(&mut self, pointer: &str, index: usize) -> Result<Value> {
        let items = self.list_at(pointer)?;
        if index >= items.len() {
            return Err(ConsoleError::Form(format!(
                "index {} out of range for {} ({} items)",
                index,
                pointer,
                items.len()
            )));
        }
        Ok(items.remove(index))
    }

    /// The request to send.
    ///
    /// For an update, `pc` is reduced to the attributes that differ from the
    /// seeded form. Placeholders are then stripped and the envelope is read
    /// as a [`RequestPrimitive`].
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Json`] if an edited field does not fit its parameter.
    pub fn wire_request(&self) -> Result<RequestPrimitive> {
        let mut request = self.request.clone();
        if self.operation == Operation::Update {
            let pristine_pc = self.pristine.as_ref().and_then(|p| p.get("pc"));
            let patch = match (request.get("pc"), pristine_pc) {
                (Some(pc), Some(pristine_pc)) => Some(diff(pc, pristine_pc)),
                _ => None,
            };
            if let Some(patch) = patch {
                request["pc"] = patch;
            }
        }
        let wire = to_wire_json(request);
        tracing::debug!(op = %self.operation, request = %wire, "form serialized");
        Ok(serde_json::from_value(wire)?)
    }

    fn list_at(&mut self, pointer: &str) -> Result<&mut Vec<Value>> {
        self.request
            .pointer_mut(pointer)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| ConsoleError::Form(format!("no list at {}", pointer)))
    }
}

/// Full envelope when `full`, else the minimal one.
fn envelope(
    operation: Operation,
    full: bool,
    to: &str,
    origin: &str,
    ids: &RequestIds,
) -> Result<Value> {
    if !full {
        return Ok(minimal(operation, to, origin, ids));
    }
    let mut request = request_primitive(operation).ok_or_else(|| {
        ConsoleError::Form(format!("{} requests cannot be edited", operation))
    })?;
    request["fr"] = json!(origin);
    request["rqi"] = json!(ids.next_id());
    request["to"] = json!(to);
    Ok(request)
}

fn minimal(operation: Operation, to: &str, origin: &str, ids: &RequestIds) -> Value {
    json!({
        "op": operation.code(),
        "fr": origin,
        "rqi": ids.next_id(),
        "to": to
    })
}
