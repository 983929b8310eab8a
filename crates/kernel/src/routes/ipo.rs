//! IPO data endpoints.
//!
//! `/api/ipo` serves the table view; failures are reported inside the
//! page body. The remaining endpoints proxy the remote API and map its
//! errors to HTTP statuses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::{CommandResponse, IpoStatistics, ListingStatus};
use crate::error::AppResult;
use crate::query::{IpoFilters, IpoPageRequest, IpoTablePage};
use crate::state::AppState;

/// Create the IPO router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ipo", get(list))
        .route("/api/ipo/filters", delete(reset_filters))
        .route("/api/ipo/statistics", get(statistics))
        .route("/api/ipo/crawl", post(crawl_all))
        .route("/api/ipo/crawl/{exchange}", post(crawl_exchange))
}

/// Query string of the table endpoint. Must stay flat: `#[serde(flatten)]`
/// cannot parse numbers out of query string text.
#[derive(Deserialize)]
struct ListParams {
    listing_status: Option<ListingStatus>,
    market: Option<String>,
    exchange: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    page: Option<u32>,
    page_size: Option<u32>,
}

impl From<ListParams> for IpoPageRequest {
    fn from(p: ListParams) -> Self {
        Self {
            filters: IpoFilters {
                listing_status: p.listing_status,
                market: p.market,
                exchange: p.exchange,
                start_date: p.start_date,
                end_date: p.end_date,
            },
            page: p.page,
            page_size: p.page_size,
        }
    }
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<IpoTablePage> {
    Json(state.ipo_view().load(params.into()).await)
}

/// Clear the remembered filters so the next request keeps its page.
async fn reset_filters(State(state): State<AppState>) -> StatusCode {
    state.ipo_view().reset_filters();
    StatusCode::NO_CONTENT
}

async fn statistics(State(state): State<AppState>) -> AppResult<Json<IpoStatistics>> {
    Ok(Json(state.api().fetch_ipo_statistics().await?))
}

/// Crawl every exchange. Cached pages are dropped once the crawl succeeds.
async fn crawl_all(State(state): State<AppState>) -> AppResult<Json<CommandResponse>> {
    let response = state.api().crawl_all_ipo().await?;
    state.ipo_query().invalidate_all();
    Ok(Json(response))
}

async fn crawl_exchange(
    State(state): State<AppState>,
    Path(exchange): Path<String>,
) -> AppResult<Json<CommandResponse>> {
    let response = state.api().crawl_exchange_ipo(&exchange).await?;
    state.ipo_query().invalidate_all();
    Ok(Json(response))
}
