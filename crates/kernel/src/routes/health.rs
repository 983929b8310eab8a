//! Health check endpoint.
//!
//! Returns 200 OK while the server runs. Route registration state and the
//! number of cached IPO pages are reported alongside; the remote API is not
//! contacted.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    routes: usize,
    access_checked: bool,
    cached_ipo_pages: u64,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let access = state.access().state();
    Json(HealthResponse {
        status: "healthy",
        routes: state.navigation().len(),
        access_checked: access.is_access_checked,
        cached_ipo_pages: state.ipo_query().cached_pages().await,
    })
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
