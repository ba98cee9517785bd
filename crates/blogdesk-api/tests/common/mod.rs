#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use blogdesk_api::{AppState, build_app};
use blogdesk_auth::{Registration, TokenIssuer, TracingAuditSink};
use blogdesk_core::config::{AppConfig, StoreBackend, TokenLifetime};
use blogdesk_database::MemoryCredentialStore;
use blogdesk_entity::user::{Principal, Role};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemoryCredentialStore>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some(SECRET.to_string());
    config.database.backend = StoreBackend::Memory;
    config
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryCredentialStore::new());
    let state = AppState::new(test_config(), store.clone(), Arc::new(TracingAuditSink))
        .expect("test config is valid");
    TestApp {
        app: build_app(state.clone()),
        state,
        store,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Create a principal with `role` directly through the credential service.
    pub async fn create_account(&self, username: &str, role: Role) -> Principal {
        self.state
            .credentials
            .create(Registration {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
                role: Some(role),
            })
            .await
            .unwrap()
    }

    /// Log in over HTTP and return the access token.
    pub async fn login(&self, key: &str, password: &str) -> String {
        let (status, body) = self
            .send(post_json(
                "/api/auth/login",
                serde_json::json!({ "username_or_email": key, "password": password }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    pub async fn token_for(&self, username: &str, role: Role) -> String {
        self.create_account(username, role).await;
        self.login(username, PASSWORD).await
    }
}

/// Issue a token signed with the test secret, as of `issued_at`.
pub fn token_issued_at(principal: &Principal, issued_at: DateTime<Utc>) -> String {
    TokenIssuer::from_secret(SECRET.as_bytes(), TokenLifetime::default())
        .issue_at(principal, issued_at)
        .unwrap()
        .token
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
