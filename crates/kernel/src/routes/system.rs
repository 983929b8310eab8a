//! Data synchronization endpoints.
//!
//! Thin proxies over the remote sync API. Triggers return a task id that
//! `/api/tasks/{task_id}` reports on.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::{PageParams, SyncHistoryResponse, SyncStatus, TaskResponse, TriggerSyncResponse};
use crate::error::AppResult;
use crate::state::AppState;

/// Create the sync router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/system/sync/status", get(status))
        .route("/api/system/sync/history", get(history))
        .route("/api/system/sync/stock", post(sync_stocks))
        .route("/api/system/sync/ipo", post(crawl_ipo))
        .route("/api/tasks/{task_id}", get(task))
}

async fn status(State(state): State<AppState>) -> AppResult<Json<SyncStatus>> {
    Ok(Json(state.api().fetch_sync_status().await?))
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<SyncHistoryResponse>> {
    Ok(Json(state.api().fetch_sync_history(&params).await?))
}

async fn sync_stocks(State(state): State<AppState>) -> AppResult<Json<TriggerSyncResponse>> {
    Ok(Json(state.api().trigger_stock_sync().await?))
}

/// Start a background IPO crawl and return its task.
async fn crawl_ipo(State(state): State<AppState>) -> AppResult<Json<TriggerSyncResponse>> {
    Ok(Json(state.api().trigger_ipo_crawl().await?))
}

async fn task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<TaskResponse>> {
    Ok(Json(state.api().fetch_task(&task_id).await?))
}
