//! Navigation lookup endpoint.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::navigation::RouteMatch;
use crate::state::AppState;

/// Create the navigation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/navigation/resolve", get(resolve))
}

#[derive(Deserialize)]
struct ResolveParams {
    path: String,
}

/// Resolve a direct URL entry to the route serving it.
async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> AppResult<Json<RouteMatch>> {
    if !params.path.starts_with('/') {
        return Err(AppError::BadRequest(format!(
            "path must be absolute: {}",
            params.path
        )));
    }

    state
        .navigation()
        .resolve(&params.path)
        .map(Json)
        .ok_or(AppError::NotFound)
}
