//! AI assistant endpoints: question answering and the document store.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::{
    CollectionInfo, CollectionListResponse, CommandResponse, DEFAULT_COLLECTION,
    DocumentListResponse, DocumentQueryParams, RagQueryParams, RagResponse, SessionListResponse,
};
use crate::error::AppResult;
use crate::state::AppState;

/// Create the assistant router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/agent/rag", post(ask))
        .route("/api/agent/sessions", get(sessions))
        .route("/api/agent/sessions/{session_id}/memory", delete(clear_memory))
        .route("/api/agent/collections", get(collections))
        .route("/api/agent/collections/info", get(collection_info))
        .route("/api/agent/documents", get(documents))
}

#[derive(Deserialize)]
struct AskRequest {
    #[serde(flatten)]
    params: RagQueryParams,
    /// Answer with the local model.
    #[serde(default)]
    offline: bool,
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> AppResult<Json<RagResponse>> {
    Ok(Json(
        state.api().rag_query(&request.params, request.offline).await?,
    ))
}

async fn sessions(State(state): State<AppState>) -> AppResult<Json<SessionListResponse>> {
    Ok(Json(state.api().fetch_rag_sessions().await?))
}

async fn clear_memory(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<CommandResponse>> {
    Ok(Json(state.api().clear_session_memory(&session_id).await?))
}

async fn collections(State(state): State<AppState>) -> AppResult<Json<CollectionListResponse>> {
    Ok(Json(state.api().fetch_collections().await?))
}

#[derive(Deserialize)]
struct CollectionQuery {
    collection_name: Option<String>,
}

async fn collection_info(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
) -> AppResult<Json<CollectionInfo>> {
    let name = query
        .collection_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
    Ok(Json(state.api().fetch_collection_info(&name).await?))
}

async fn documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentQueryParams>,
) -> AppResult<Json<DocumentListResponse>> {
    Ok(Json(state.api().fetch_collection_documents(&params).await?))
}
