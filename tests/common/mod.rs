//! Shared fixtures for tests that talk to a mocked Notion API.

#![allow(dead_code)]

use jobline::notion::{ConnectionSettings, NotionClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "secret_test_key";
pub const DATABASE_ID: &str = "1674d51105a8805f8312e91518420596";

/// Client pointed at the mock server's `/v1` prefix
pub fn client_for(server: &MockServer) -> NotionClient {
    let settings = ConnectionSettings::new(API_KEY).with_api_url(format!("{}/v1", server.uri()));
    NotionClient::new(&settings).expect("client should build")
}

pub fn query_path() -> String {
    format!("/v1/databases/{DATABASE_ID}/query")
}

pub fn database_path() -> String {
    format!("/v1/databases/{DATABASE_ID}")
}

pub fn page(id: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "archived": false,
        "properties": {
            "Company": { "type": "title", "title": [ { "plain_text": id } ] }
        }
    })
}

/// One page of query results
pub fn results(ids: &[&str], next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": ids.iter().map(|id| page(id)).collect::<Vec<_>>(),
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}

pub fn database(status_options: &[&str]) -> Value {
    let options: Vec<Value> = status_options
        .iter()
        .map(|name| json!({ "id": format!("opt-{name}"), "name": name, "color": "default" }))
        .collect();
    json!({
        "object": "database",
        "id": DATABASE_ID,
        "title": [ { "plain_text": "Job Applications" } ],
        "properties": {
            "Company": { "id": "title", "name": "Company", "type": "title", "title": {} },
            "Status": {
                "id": "st%3D",
                "name": "Status",
                "type": "select",
                "select": { "options": options }
            },
            "Applied On": { "id": "ap", "name": "Applied On", "type": "date", "date": {} }
        }
    })
}
