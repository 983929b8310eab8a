//! Stock and shareholder endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::shareholder::CompanyRequest;
use crate::api::{
    CommandResponse, ControllingShareholderResponse, ShareholderQueryParams,
    ShareholderQueryResponse, StockInfo, StockListResponse, StockQueryParams, StockSearchParams,
    StockStatistics,
};
use crate::error::AppResult;
use crate::state::AppState;

/// Create the stock data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stocks", get(list))
        .route("/api/stocks/search", get(search))
        .route("/api/stocks/statistics", get(statistics))
        .route("/api/stocks/{stock_code}", get(detail))
        .route("/api/shareholders", get(shareholders))
        .route("/api/shareholders/controlling", get(controlling))
        .route("/api/shareholders/refresh", post(refresh))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<StockQueryParams>,
) -> AppResult<Json<StockListResponse>> {
    Ok(Json(state.api().fetch_stock_list(&params).await?))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<StockSearchParams>,
) -> AppResult<Json<Vec<StockInfo>>> {
    Ok(Json(state.api().search_stocks(&params).await?))
}

async fn statistics(State(state): State<AppState>) -> AppResult<Json<StockStatistics>> {
    Ok(Json(state.api().fetch_stock_statistics().await?))
}

async fn detail(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
) -> AppResult<Json<StockInfo>> {
    Ok(Json(state.api().fetch_stock(&stock_code).await?))
}

async fn shareholders(
    State(state): State<AppState>,
    Query(params): Query<ShareholderQueryParams>,
) -> AppResult<Json<ShareholderQueryResponse>> {
    Ok(Json(state.api().query_shareholders(&params).await?))
}

#[derive(Deserialize)]
struct CompanyQuery {
    company_name: String,
}

async fn controlling(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> AppResult<Json<ControllingShareholderResponse>> {
    Ok(Json(
        state
            .api()
            .fetch_controlling_shareholder(&query.company_name)
            .await?,
    ))
}

async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<CompanyRequest>,
) -> AppResult<Json<CommandResponse>> {
    Ok(Json(state.api().refresh_shareholders(&body.company_name).await?))
}
