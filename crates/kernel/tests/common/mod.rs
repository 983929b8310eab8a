#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wraps the real router and state. [`spawn_api`] serves a
//! stand-in for the remote data API on an ephemeral local port so the
//! real `reqwest` client is exercised end to end.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use meridian_kernel::{AppState, Config, build_router};
use meridian_test_utils::{offline_config, test_config};

/// Test application wrapper using the real kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(config: &Config) -> Self {
        let state = AppState::new(config).expect("Failed to initialize AppState");
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// App whose remote API is unreachable.
    pub fn offline() -> Self {
        Self::new(&offline_config())
    }

    /// App talking to `api`.
    pub fn with_api(api: Url) -> Self {
        Self::new(&test_config(api))
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get_json(&self, uri: &str) -> (axum::http::StatusCode, Value) {
        let response = self
            .request(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, response_json(response).await)
    }
}

/// Serve `router` on 127.0.0.1 and return its `/api/` base URL.
pub async fn spawn_api(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api/")).unwrap()
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}
