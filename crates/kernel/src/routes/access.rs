//! Access state endpoints.
//!
//! Expose the current routes and menus, and the two mutations of the
//! access store.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;

use crate::access::AccessState;
use crate::error::AppResult;
use crate::route::{DroppedRoute, RouteRecord, convert_records};
use crate::state::AppState;

/// Create the access router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/access", get(current).delete(reset))
        .route("/api/access/routes", put(set_routes))
        .route("/api/access/refresh", put(refresh))
}

#[derive(Serialize)]
struct UpdateResponse {
    #[serde(flatten)]
    state: Arc<AccessState>,
    /// Records that could not become routes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<DroppedRoute>,
}

async fn current(State(state): State<AppState>) -> Json<Arc<AccessState>> {
    Json(state.access().state())
}

/// Merge server routes delivered in the request body.
async fn set_routes(
    State(state): State<AppState>,
    Json(records): Json<Vec<RouteRecord>>,
) -> Json<UpdateResponse> {
    let conversion = convert_records(records);
    let next = state.access().set_access_store(conversion.routes);
    Json(UpdateResponse {
        state: next,
        dropped: conversion.dropped,
    })
}

/// Fetch server routes from the remote API and merge them.
async fn refresh(State(state): State<AppState>) -> AppResult<Json<Arc<AccessState>>> {
    let next = state.access().load_remote(state.api()).await?;
    Ok(Json(next))
}

async fn reset(State(state): State<AppState>) -> Json<Arc<AccessState>> {
    Json(state.access().reset())
}
