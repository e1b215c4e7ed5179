#![allow(dead_code)]

use std::sync::Arc;

use adapters::{AuthBackend, Identity, InMemoryRoleStore, LocalAuthBackend};
use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
};
use backend::{
    config::Config, database::JsonStore, services::navigation::NavPolicy, state::AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "hunter22";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub backend: Arc<LocalAuthBackend>,
    pub roles: Arc<InMemoryRoleStore>,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn test_app(nav_policy: NavPolicy) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        nav_policy,
        ..Config::from_lookup(|_| None).unwrap()
    };

    let backend = Arc::new(LocalAuthBackend::in_memory().with_hasher(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(8, 1, 1, None).unwrap(),
    )));
    let roles = Arc::new(InMemoryRoleStore::new());
    let store = JsonStore::open(config.records_dir()).await.unwrap();
    let state = AppState::from_parts(config, backend.clone(), roles.clone(), store);

    TestApp {
        state,
        backend,
        roles,
        _dir: dir,
    }
}

/// App with restoration already settled.
pub async fn ready_app() -> TestApp {
    let app = test_app(NavPolicy::default()).await;
    app.state.session.initialize().await;
    app
}

impl TestApp {
    /// Creates an account without leaving it signed in.
    pub async fn register(&self, email: &str) -> Identity {
        let identity = self.backend.sign_up(email, PASSWORD).await.unwrap();
        self.backend.sign_out().await.unwrap();
        identity
    }

    pub async fn sign_in(&self, email: &str) -> TestResponse {
        self.post(
            "/auth/sign-in",
            serde_json::json!({ "email": email, "password": PASSWORD }),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = backend::app(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub fn link_paths(nav: &Value) -> Vec<String> {
    nav["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["path"].as_str().unwrap().to_string())
        .collect()
}
