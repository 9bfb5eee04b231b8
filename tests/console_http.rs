//! The console against a mocked CSE over real HTTP.

use mockito::{Matcher, Server, ServerGuard};
use onem2m_console::store::{AddOutcome, RemoveOutcome};
use onem2m_console::{Applied, ClientConfig, Console, ResourceType, RetrieveMode};
use pretty_assertions::assert_eq;
use serde_json::json;

fn path(resource: &str) -> Matcher {
    Matcher::Regex(format!(r"^/{}(\?.*)?$", resource))
}

fn exact(resource: &str) -> Matcher {
    Matcher::Regex(format!(r"^/{}$", resource))
}

fn address(server: &ServerGuard) -> (String, u16) {
    let addr = server.host_with_port();
    let (host, port) = addr.rsplit_once(':').unwrap();
    (host.to_string(), port.parse().unwrap())
}

async fn connected(server: &mut ServerGuard) -> Console {
    server
        .mock("GET", exact("InCSE1"))
        .match_header("X-M2M-Origin", "CAdmin")
        .match_header("Accept", "application/json")
        .with_status(200)
        .with_header("X-M2M-RSC", "2000")
        .with_header("Content-Type", "application/json")
        .with_body(json!({ "m2m:cb": { "ri": "InCSE1", "rn": "InCSE1", "ty": 5, "csi": "/InCSE1" } }).to_string())
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig::from_json_str(r#"{ "origin": "CAdmin", "request_timeout_ms": 5000 }"#).unwrap();
    let console = Console::new(config).unwrap();
    let (host, port) = address(server);
    console.connect(&host, port, "InCSE1", false).await.unwrap();
    console
}

#[tokio::test]
async fn test_connect_over_http() {
    let mut server = Server::new_async().await;
    let console = connected(&mut server).await;

    let root = console.tree().root().unwrap();
    assert_eq!(root.read().id, "InCSE1");
    assert_eq!(root.read().resource_type, Some(ResourceType::CseBase));
}

#[tokio::test]
async fn test_expand_sends_result_content() {
    let mut server = Server::new_async().await;
    let console = connected(&mut server).await;

    let expand = server
        .mock("GET", path("InCSE1"))
        .match_query(Matcher::UrlEncoded("rcn".into(), "4".into()))
        .with_status(200)
        .with_header("X-M2M-RSC", "2000")
        .with_body(
            json!({ "m2m:cb": { "ri": "InCSE1", "rn": "InCSE1", "ty": 5, "ch": [
                { "m2m:ae": { "ri": "ae1", "rn": "lamp", "ty": 2, "pi": "/InCSE1/InCSE1" } },
                { "m2m:acp": { "ri": "acp1", "rn": "policy", "ty": 1, "pi": "/InCSE1/InCSE1" } }
            ] } })
            .to_string(),
        )
        .create_async()
        .await;

    let outcomes = console.expand("InCSE1").await.unwrap();
    expand.assert_async().await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| matches!(o, AddOutcome::Added { .. })));
    assert_eq!(console.tree().root().unwrap().read().child_ids(), ["ae1", "acp1"]);
}

#[tokio::test]
async fn test_discovery_form_query() {
    let mut server = Server::new_async().await;
    let console = connected(&mut server).await;

    let discovery = server
        .mock("GET", path("InCSE1"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("fu".into(), "1".into()),
            Matcher::UrlEncoded("lbl".into(), "x y".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "m2m:uril": ["InCSE1/ae1"] }).to_string())
        .create_async()
        .await;

    let mut form = console.retrieve_form("InCSE1", RetrieveMode::Custom);
    form.set("/fc/fu", 1).unwrap();
    form.set("/fc/lbl", json!(["x", "y", null])).unwrap();
    let applied = console.submit(&form).await.unwrap();

    discovery.assert_async().await;
    assert_eq!(applied, Applied::Added(Vec::new()));
}

#[tokio::test]
async fn test_create_posts_typed_body() {
    let mut server = Server::new_async().await;
    let console = connected(&mut server).await;

    let create = server
        .mock("POST", path("InCSE1"))
        .match_header("Content-Type", "application/json;ty=2")
        .match_header("X-M2M-Origin", "CAdmin")
        .match_body(Matcher::Json(json!({ "m2m:ae": { "rn": "lamp", "api": "Nlamp", "rr": false } })))
        .with_status(201)
        .with_header("X-M2M-RSC", "2001")
        .with_body(json!({ "m2m:ae": { "ri": "ae7", "pi": "/InCSE1/InCSE1", "ty": 2, "aei": "Clamp" } }).to_string())
        .create_async()
        .await;

    let mut form = console.create_form("InCSE1", ResourceType::Ae).unwrap();
    form.set("/pc/m2m:ae/rn", "lamp").unwrap();
    form.set("/pc/m2m:ae/api", "Nlamp").unwrap();
    form.set("/pc/m2m:ae/rr", false).unwrap();
    console.submit(&form).await.unwrap();

    create.assert_async().await;
    let ae = console.tree().retrieve_node("ae7").unwrap();
    assert_eq!(ae.read().name(), Some("lamp"));
    assert_eq!(ae.read().attribute("aei"), Some(&json!("Clamp")));
    assert_eq!(console.tree().root().unwrap().read().child_ids(), ["ae7"]);
}

#[tokio::test]
async fn test_server_error_reported() {
    let mut server = Server::new_async().await;
    let console = connected(&mut server).await;
    console.tree().add_node(&json!({ "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1", "ty": 2 } }));

    server
        .mock("DELETE", path("ae1"))
        .with_status(409)
        .with_header("X-M2M-RSC", "4105")
        .with_body(r#"{"error":"resource is locked"}"#)
        .create_async()
        .await;

    let err = console.submit(&console.delete_form("ae1", false)).await.unwrap_err();
    assert_eq!(err.to_string(), r#"Error:"resource is locked""#);
    assert!(console.tree().retrieve_node("ae1").is_some());
}

#[tokio::test]
async fn test_delete_over_http() {
    let mut server = Server::new_async().await;
    let console = connected(&mut server).await;
    console.tree().add_node(&json!({ "m2m:ae": { "ri": "ae1", "pi": "/InCSE1/InCSE1", "ty": 2 } }));

    server
        .mock("DELETE", path("ae1"))
        .with_status(200)
        .with_header("X-M2M-RSC", "2002")
        .create_async()
        .await;

    let applied = console.submit(&console.delete_form("ae1", false)).await.unwrap();
    assert_eq!(applied, Applied::Removed(RemoveOutcome::Removed { id: "ae1".into(), count: 1 }));
    assert!(!console.tree().root().unwrap().read().has_children());
}

#[tokio::test]
async fn test_unreachable_cse() {
    let config = ClientConfig::from_json_str(r#"{ "request_timeout_ms": 2000 }"#).unwrap();
    let console = Console::new(config).unwrap();
    let err = console.connect("127.0.0.1", 1, "InCSE1", false).await.unwrap_err();
    assert!(err.is_rejection());
    assert!(console.tree().is_empty());
}
