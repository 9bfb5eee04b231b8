//! Cross-module scenarios: a console driving a scripted CSE.

use crate::client::{ClientConfig, Onem2mClient, Transport};
use crate::console::{Applied, Console};
use crate::edit::RetrieveMode;
use crate::error::{ConsoleError, Result};
use crate::protocol::ResourceType;
use crate::store::{AddOutcome, Placement, RemoveOutcome, UpdateOutcome};
use crate::types::{HttpRequest, RawResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// Answers by method and URL; requests to a gated URL wait for the gate.
#[derive(Default)]
struct ScriptedCse {
    routes: Mutex<HashMap<(String, String), RawResponse>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedCse {
    fn route(&self, method: &str, url: &str, status: u16, body: Value) {
        let response = RawResponse::new(status, body.to_string()).with_header("X-M2M-RI", "1");
        self.routes
            .lock()
            .insert((method.to_string(), url.to_string()), response);
    }

    fn gate(&self, url: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(url.to_string(), Arc::clone(&gate));
        gate
    }

    fn urls(&self) -> Vec<String> {
        self.seen
            .lock()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedCse {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let key = (request.method.to_string(), request.url.clone());
        let gate = self.gates.lock().get(&request.url).cloned();
        self.seen.lock().push(request);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let response = self.routes.lock().get(&key).cloned();
        response.ok_or_else(|| ConsoleError::rejected(None, None, format!("\"no route for {} {}\"", key.0, key.1)))
    }
}

const BASE: &str = "http://cse.test:8282";

fn console() -> (Console, Arc<ScriptedCse>) {
    let cse = Arc::new(ScriptedCse::default());
    let client = Onem2mClient::with_transport(ClientConfig::default(), cse.clone()).unwrap();
    (Console::with_client(client), cse)
}

fn cse_base() -> Value {
    json!({ "m2m:cb": { "ri": "InCSE1", "rn": "InCSE1", "ty": 5, "csi": "/InCSE1" } })
}

fn ae_with_children() -> Value {
    json!({ "m2m:ae": {
        "ri": "ae1", "rn": "lamp", "ty": 2, "pi": "/InCSE1/InCSE1", "api": "Nlamp", "rr": false,
        "ch": [
            { "m2m:cnt": { "ri": "cnt1", "rn": "state", "ty": 3, "pi": "/InCSE1/ae1", "mni": 10, "lbl": ["a"] } },
            { "m2m:sub": { "ri": "sub1", "rn": "watch", "ty": 23, "pi": "/InCSE1/ae1", "nu": ["http://a", "http://b"] } }
        ]
    } })
}

async fn connected() -> (Console, Arc<ScriptedCse>) {
    let (console, cse) = console();
    cse.route("GET", &format!("{BASE}/InCSE1"), 200, cse_base());
    cse.route(
        "GET",
        &format!("{BASE}/InCSE1?rcn=4"),
        200,
        json!({ "m2m:cb": { "ri": "InCSE1", "rn": "InCSE1", "ty": 5, "ch": [
            { "m2m:ae": { "ri": "ae1", "rn": "lamp", "ty": 2, "pi": "/InCSE1/InCSE1" } }
        ] } }),
    );
    cse.route("GET", &format!("{BASE}/ae1?rcn=4"), 200, ae_with_children());
    console.connect("cse.test", 8282, "InCSE1", false).await.unwrap();
    (console, cse)
}

#[tokio::test]
async fn test_connect_replaces_tree_and_target() {
    let (console, cse) = console();
    console.tree().add_node(&json!({ "m2m:cb": { "ri": "old" } }));
    cse.route("GET", &format!("{BASE}/InCSE1"), 200, cse_base());

    let outcomes = console.connect("cse.test", 8282, "InCSE1", false).await.unwrap();
    assert_eq!(
        outcomes,
        [AddOutcome::Added {
            id: "InCSE1".into(),
            merged: false,
            placement: Placement::Root { replaced: false },
        }]
    );
    assert!(console.tree().retrieve_node("old").is_none());
    assert_eq!(console.client().config().host, "cse.test");
    assert_eq!(console.client().config().port, 8282);
}

#[tokio::test]
async fn test_failed_connect_keeps_state() {
    let (console, cse) = console();
    console.tree().add_node(&cse_base());
    cse.route("GET", &format!("{BASE}/InCSE9"), 404, json!({ "error": "Resource not found" }));

    let err = console.connect("cse.test", 8282, "InCSE9", false).await.unwrap_err();
    assert_eq!(err.to_string(), r#"Error:"Resource not found""#);
    assert_eq!(console.tree().len(), 1);
    assert_eq!(console.client().config().host, "localhost");
}

#[tokio::test]
async fn test_connect_with_discovery() {
    let (console, cse) = console();
    cse.route(
        "GET",
        &format!("{BASE}/?fu=1"),
        200,
        json!({ "m2m:cb": { "ri": "InCSE1", "ch": [ { "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1" } } ] } }),
    );
    console.connect("cse.test", 8282, "InCSE1", true).await.unwrap();
    assert_eq!(console.tree().len(), 2);
    assert_eq!(cse.urls(), [format!("GET {BASE}/?fu=1")]);
}

#[tokio::test]
async fn test_expand_then_describe() {
    let (console, _) = connected().await;
    let outcomes = console.expand("ae1").await.unwrap();
    assert_eq!(outcomes.len(), 3);

    let ae = console.tree().retrieve_node("ae1").unwrap();
    assert_eq!(ae.read().child_ids(), ["cnt1", "sub1"]);
    assert_eq!(ae.read().attribute("api"), Some(&json!("Nlamp")));

    let descriptions = console.describe("cnt1").unwrap();
    assert!(descriptions.contains_key("mni"));
    assert!(console.describe("missing").is_none());
}

#[tokio::test]
async fn test_create_submit_adds_child() {
    let (console, cse) = connected().await;
    console.expand("ae1").await.unwrap();
    cse.route(
        "POST",
        &format!("{BASE}/ae1"),
        201,
        json!({ "m2m:cnt": { "ri": "cnt2", "pi": "/InCSE1/ae1", "ty": 3, "ct": "20261016T120000" } }),
    );

    let mut form = console.create_form("ae1", ResourceType::Container).unwrap();
    form.set("/pc/m2m:cnt/rn", "level").unwrap();
    form.set("/pc/m2m:cnt/mni", 3).unwrap();
    let applied = console.submit(&form).await.unwrap();

    assert_eq!(
        applied,
        Applied::Added(vec![AddOutcome::Added {
            id: "cnt2".into(),
            merged: false,
            placement: Placement::Linked { parent: "ae1".into() },
        }])
    );
    let cnt = console.tree().retrieve_node("cnt2").unwrap();
    assert_eq!(cnt.read().name(), Some("level"));
    assert_eq!(cnt.read().attribute("mni"), Some(&json!(3)));

    let sent = cse.seen.lock().last().cloned().unwrap();
    assert_eq!(sent.header("Content-Type"), Some("application/json;ty=3"));
    assert_eq!(sent.body, Some(json!({ "m2m:cnt": { "rn": "level", "mni": 3 } })));
}

#[tokio::test]
async fn test_update_submit_sends_patch() {
    let (console, cse) = connected().await;
    console.expand("ae1").await.unwrap();
    cse.route("PUT", &format!("{BASE}/sub1"), 200, json!({ "m2m:sub": { "nu": ["http://a", "http://c"] } }));

    let mut form = console.update_form("sub1").unwrap();
    assert_eq!(form.value_at("/pc/m2m:sub/nu"), Some(&json!(["http://a", "http://b", null])));
    form.remove_item("/pc/m2m:sub/nu", 1).unwrap();
    form.set("/pc/m2m:sub/nu/1", "http://c").unwrap();

    let applied = console.submit(&form).await.unwrap();
    assert_eq!(applied, Applied::Updated(vec![UpdateOutcome::Merged { id: "sub1".into() }]));

    let sent = cse.seen.lock().last().cloned().unwrap();
    assert_eq!(sent.body, Some(json!({ "m2m:sub": { "nu": ["http://a", "http://c"] } })));

    let sub = console.tree().retrieve_node("sub1").unwrap();
    assert_eq!(sub.read().attribute("nu"), Some(&json!(["http://a", "http://c"])));
    assert_eq!(sub.read().name(), Some("watch"));
}

#[tokio::test]
async fn test_delete_submit_removes_subtree() {
    let (console, cse) = connected().await;
    console.expand("ae1").await.unwrap();
    cse.route("DELETE", &format!("{BASE}/ae1"), 200, json!({}));

    let form = console.delete_form("ae1", false);
    let applied = console.submit(&form).await.unwrap();
    assert_eq!(applied, Applied::Removed(RemoveOutcome::Removed { id: "ae1".into(), count: 3 }));
    assert_eq!(console.tree().snapshot().node_ids(), ["InCSE1"]);
    assert!(console.tree().snapshot().links.is_empty());
}

#[tokio::test]
async fn test_late_retrieve_cannot_resurrect_deleted_node() {
    let (console, cse) = connected().await;
    console.expand("ae1").await.unwrap();
    cse.route("DELETE", &format!("{BASE}/ae1"), 200, json!({}));
    let gate = cse.gate(&format!("{BASE}/ae1?rcn=4"));

    let delete = console.delete_form("ae1", false);
    let (expanded, deleted) = tokio::join!(console.expand("ae1"), async {
        let applied = console.submit(&delete).await;
        gate.notify_one();
        applied
    });

    assert!(matches!(deleted.unwrap(), Applied::Removed(RemoveOutcome::Removed { .. })));
    assert!(expanded
        .unwrap()
        .iter()
        .all(|outcome| matches!(outcome, AddOutcome::Stale { .. })));
    assert!(console.tree().retrieve_node("ae1").is_none());
    assert!(console.tree().retrieve_node("cnt1").is_none());
}

#[tokio::test]
async fn test_retrieve_form_children() {
    let (console, cse) = connected().await;
    let form = console.retrieve_form("InCSE1", RetrieveMode::Children);
    let applied = console.submit(&form).await.unwrap();

    let Applied::Added(outcomes) = applied else {
        panic!("expected additions");
    };
    assert_eq!(outcomes.len(), 2);
    assert_eq!(console.tree().root().unwrap().read().child_ids(), ["ae1"]);
    assert!(cse.urls().last().unwrap().ends_with("/InCSE1?rcn=4"));
}

#[tokio::test]
async fn test_rejected_submit_leaves_tree() {
    let (console, cse) = connected().await;
    cse.route("DELETE", &format!("{BASE}/InCSE1"), 403, json!({ "error": "no privilege" }));

    let err = console
        .submit(&console.delete_form("InCSE1", false))
        .await
        .unwrap_err();
    assert!(err.is_access_denied());
    assert!(console.tree().root().is_some());
}
