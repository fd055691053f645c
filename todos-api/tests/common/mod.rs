//! Common test utilities for integration tests
//!
//! Builds the full router over a seeded in-memory store, so the HTTP
//! surface can be driven without a database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use todos_api::app::{build_router, AppState};
use todos_api::config::Config;
use todos_shared::models::todo::Todo;
use todos_shared::store::MemoryStore;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    /// Identifier of the seeded "Special Todo"
    pub special_id: Uuid,
}

fn seeded(owner: &str, age: i32, company: &str, role: &str, body: &str, completed: bool) -> Todo {
    Todo {
        id: Uuid::new_v4(),
        owner: owner.to_string(),
        body: body.to_string(),
        category: None,
        role: role.to_string(),
        company: company.to_string(),
        age,
        email: format!("{}@test.com", owner.to_lowercase().replace(' ', ".")),
        avatar: "https://gravatar.com/avatar/?d=mp".to_string(),
        completed,
        created_at: Utc::now(),
    }
}

impl TestContext {
    /// Three todos: ACME (25, admin), Globex (30, editor, done) and
    /// Initech (35, viewer, done)
    pub fn new() -> Self {
        let special = seeded(
            "Special Todo",
            35,
            "Initech",
            "viewer",
            "Reticulate (the) splines 100%",
            true,
        );
        let special_id = special.id;

        let store = Arc::new(MemoryStore::with_todos(vec![
            seeded("Test Todo 1", 25, "ACME", "admin", "Buy anvils", false),
            seeded("Test Todo 2", 30, "Globex", "editor", "Plan world domination", true),
            special,
        ]));

        let config = Config::from_vars(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            _ => None,
        })
        .unwrap();

        let app = build_router(AppState::new(store.clone(), config));

        Self {
            app,
            store,
            special_id,
        }
    }

    /// Sends a request without a body and returns status and parsed JSON
    pub async fn send(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.dispatch(request).await
    }

    /// Sends a JSON body and returns status and parsed JSON
    pub async fn send_json(&self, method: &str, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, json)
    }
}

/// Owners of a JSON array of todos, in response order
pub fn owners(todos: &Value) -> Vec<String> {
    todos
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|todo| todo["owner"].as_str().unwrap_or_default().to_string())
        .collect()
}
