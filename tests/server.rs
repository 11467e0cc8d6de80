//! HTTP API tests against a live server on a free local port.

use serde_json::{json, Value};
use space_search::config::Config;
use space_search::server::run_server;
use std::fs;
use tempfile::TempDir;

const FEED: &str = r#"{
  "collection": {
    "items": [
      {"data": [{"title": "Mars Rover", "media_type": "image", "description": "red planet surface"}],
       "links": [{"href": "https://images.example/rover.jpg", "render": "image"}]},
      {"data": [{"title": "Saturn", "media_type": "image", "description": "rings"}]},
      {"data": [{"title": "Mars Orbiter", "media_type": "image", "description": "red planet from orbit"}]},
      {"data": [{"title": "Mars Helicopter", "media_type": "video", "description": "flight on mars"}]}
    ]
  }
}"#;

fn test_config_with_port(tmp: &TempDir, port: u16) -> Config {
    let root = tmp.path();
    fs::write(root.join("feed.json"), FEED).unwrap();
    let config_content = format!(
        r#"
[catalog]
path = "{root}/feed.json"

[history]
path = "{root}/history/search_history.json"

[pagination]
default_page_size = 2
max_page_size = 10

[server]
bind = "127.0.0.1:{port}"
"#,
        root = root.display(),
        port = port
    );
    toml::from_str(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

struct TestServer {
    base: String,
    handle: tokio::task::JoinHandle<()>,
    _tmp: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let port = find_free_port();
        let tmp = TempDir::new().unwrap();
        let cfg = test_config_with_port(&tmp, port);
        let handle = tokio::spawn(async move {
            run_server(&cfg).await.ok();
        });
        wait_for_server(port).await;
        Self {
            base: format!("http://127.0.0.1:{}", port),
            handle,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn search(client: &reqwest::Client, server: &TestServer, body: Value) -> Value {
    let resp = client
        .post(server.url("/api/search"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_health_reports_version() {
    let server = TestServer::start().await;
    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_sources_pagination() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(server.url("/api/sources?page=2&limit=3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total_items"], 4);
    assert_eq!(body["returned_count"], 1);
    assert_eq!(body["has_more"], false);
    assert_eq!(body["items"][0]["name"], "Mars Helicopter");
    assert_eq!(body["items"][0]["id"], 4);
    assert_eq!(body["items"][0]["status"], "Active");

    let resp = client
        .get(server.url("/api/sources?page=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_search_pages_share_confidence_map() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let first = search(&client, &server, json!({"query": "mars"})).await;
    assert_eq!(first["query"], "mars");
    assert_eq!(first["resultCount"], 3);
    assert_eq!(first["page"], 1);
    assert_eq!(first["pageSize"], 2);
    assert_eq!(first["has_more"], true);
    assert_eq!(first["results"].as_array().unwrap().len(), 2);
    assert_eq!(first["confidence_scores"].as_object().unwrap().len(), 3);
    assert!(first["history_id"].is_string());

    let second = search(
        &client,
        &server,
        json!({"query": "mars", "page": 2, "pageSize": 2, "skipHistory": true}),
    )
    .await;
    assert_eq!(second["results"].as_array().unwrap().len(), 1);
    assert_eq!(second["has_more"], false);
    assert!(second.get("history_id").is_none());
    assert_eq!(second["confidence_scores"], first["confidence_scores"]);

    let history: Value = client
        .get(server.url("/api/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["total_items"], 1);
    let entry = &history["items"][0];
    assert_eq!(entry["id"], first["history_id"]);
    assert_eq!(entry["resultCount"], 3);
    assert_eq!(entry["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_rejects_bad_input() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    for body in [
        json!({"query": "   "}),
        json!({"query": "mars", "page": 0}),
        json!({"query": "mars", "pageSize": 11}),
    ] {
        let resp = client
            .post(server.url("/api/search"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "body {} should be rejected", body);
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"]["code"], "bad_request");
    }

    let history: Value = client
        .get(server.url("/api/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["total_items"], 0);
}

#[tokio::test]
async fn test_history_lifecycle() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for query in ["mars", "saturn", "red planet"] {
        let resp = search(&client, &server, json!({"query": query})).await;
        ids.push(resp["history_id"].as_str().unwrap().to_string());
    }

    // Newest first, two per page.
    let page: Value = client
        .get(server.url("/api/history?page=2&page_size=2"))
        .header("Authorization", "Bearer anyone")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total_items"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["has_next"], false);
    assert_eq!(page["has_previous"], true);
    assert_eq!(page["items"][0]["query"], "mars");

    // The camelCase spelling of the page size is accepted too.
    let page: Value = client
        .get(server.url("/api/history?pageSize=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["page_size"], 1);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["items"][0]["query"], "red planet");

    let entry: Value = client
        .get(server.url(&format!("/api/history/{}", ids[1])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry["query"], "saturn");
    assert_eq!(entry["confidence_scores"]["2"], 100.0);

    let resp = client
        .delete(server.url(&format!("/api/history/{}", ids[1])))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Second delete of the same id is a 404.
    let resp = client
        .delete(server.url(&format!("/api/history/{}", ids[1])))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"]["code"], "not_found");

    let resp = client
        .get(server.url(&format!("/api/history/{}", ids[1])))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(server.url("/api/history"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let page: Value = client
        .get(server.url("/api/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total_items"], 0);
    assert_eq!(page["total_pages"], 0);
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_history_is_written_to_disk() {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();
    let cfg = test_config_with_port(&tmp, port);
    let history_path = cfg.history.path.clone();

    let handle = tokio::spawn(async move {
        run_server(&cfg).await.ok();
    });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    client
        .post(format!("http://127.0.0.1:{}/api/search", port))
        .json(&json!({"query": "rings"}))
        .send()
        .await
        .unwrap();

    let stored: Value = serde_json::from_str(&fs::read_to_string(&history_path).unwrap()).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["query"], "rings");
    assert_eq!(stored[0]["results"][0]["name"], "Saturn");

    handle.abort();
}
