//! Application fixture and request helpers

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};

use chatline::backend::routes::create_router;
use chatline::backend::server::{build_state, AppState};
use chatline::shared::AppConfig;

use super::database::create_test_pool;

/// The full router behind an in-process test server
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let pool = create_test_pool().await;
        let state = build_state(pool, config);
        let server = TestServer::new(create_router(state.clone()))
            .expect("Failed to start test server");
        Self { server, state }
    }

    /// POST /session, returning the identifier
    pub async fn login(&self, name: &str) -> String {
        let response = self.server.post("/session").json(&json!({ "name": name })).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        body["identifier"]
            .as_str()
            .expect("identifier missing")
            .to_string()
    }

    pub fn get(&self, user_id: &str, path: &str) -> TestRequest {
        authorized(self.server.get(path), user_id)
    }

    pub fn post(&self, user_id: &str, path: &str) -> TestRequest {
        authorized(self.server.post(path), user_id)
    }

    pub fn put(&self, user_id: &str, path: &str) -> TestRequest {
        authorized(self.server.put(path), user_id)
    }

    pub fn delete(&self, user_id: &str, path: &str) -> TestRequest {
        authorized(self.server.delete(path), user_id)
    }

    /// Create a conversation as `owner` and return its JSON
    pub async fn create_conversation(
        &self,
        owner: &str,
        participants: &[&str],
        name: Option<&str>,
    ) -> Value {
        let mut body = json!({ "participants": participants });
        if let Some(name) = name {
            body["name"] = json!(name);
        }
        let response = self
            .post(owner, &format!("/users/{owner}/conversations"))
            .json(&body)
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json()
    }

    /// Send a text message and return its id
    pub async fn send_text(&self, sender: &str, conversation_id: &str, text: &str) -> String {
        let response = self
            .post(
                sender,
                &format!("/users/{sender}/conversations/{conversation_id}/messages"),
            )
            .json(&json!({ "content": text }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_str().expect("id missing").to_string()
    }
}

/// Attach `Authorization: Bearer <user_id>`
pub fn authorized(request: TestRequest, user_id: &str) -> TestRequest {
    let value = HeaderValue::from_str(&format!("Bearer {user_id}")).expect("valid header value");
    request.add_header(AUTHORIZATION, value)
}

/// `/users/{user}/conversations/{conversation}` prefix
pub fn conversation_path(user_id: &str, conversation_id: &str) -> String {
    format!("/users/{user_id}/conversations/{conversation_id}")
}
