#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Remote API client tests against a local stand-in server.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use url::Url;

mod common;
use common::{TestApp, response_json, spawn_api};

use meridian_kernel::api::{
    ApiClient, ApiError, DocumentQueryParams, IpoQueryParams, ListingStatus, RagQueryParams,
    ShareholderQueryParams, StockQueryParams, StockSearchParams, TaskStatus,
};
use meridian_test_utils::{ipo_page, ipo_record};

type Hits = Arc<AtomicUsize>;

fn client(base: Url) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5), Duration::ZERO).unwrap()
}

/// Server answering `failures` times with `status`, then with an empty page.
async fn flaky_ipo_api(status: StatusCode, failures: usize) -> (Url, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/api/lixingren/ipo/query",
            get(move |State(hits): State<Hits>| async move {
                let n = hits.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    status.into_response()
                } else {
                    Json(ipo_page(vec![], 0, 1, 20)).into_response()
                }
            }),
        )
        .with_state(hits.clone());
    (spawn_api(router).await, hits)
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn server_errors_are_retried_once() {
    let (base, hits) = flaky_ipo_api(StatusCode::SERVICE_UNAVAILABLE, 1).await;
    let result = client(base).fetch_ipo_list(&IpoQueryParams::default()).await;

    assert!(result.is_ok());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn persistent_server_errors_fail_after_one_retry() {
    let (base, hits) = flaky_ipo_api(StatusCode::INTERNAL_SERVER_ERROR, 10).await;
    let result = client(base).fetch_ipo_list(&IpoQueryParams::default()).await;

    assert_eq!(result.unwrap_err(), ApiError::Server(500));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let (base, hits) = flaky_ipo_api(StatusCode::FORBIDDEN, 10).await;
    let result = client(base).fetch_ipo_list(&IpoQueryParams::default()).await;

    assert_eq!(result.unwrap_err(), ApiError::Forbidden);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    let base = Url::parse("http://127.0.0.1:9/api/").unwrap();
    let err = client(base)
        .fetch_ipo_list(&IpoQueryParams::default())
        .await
        .unwrap_err();
    assert!(err.is_retryable(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn invalid_path_segments_are_rejected_locally() {
    let base = Url::parse("http://127.0.0.1:9/api/").unwrap();
    let api = client(base);

    assert!(matches!(
        api.crawl_exchange_ipo("sse/../x").await,
        Err(ApiError::Validation(_))
    ));
    for exchange in ["..", ".", "a?b", "sse#x", "%2F"] {
        assert!(
            matches!(api.crawl_exchange_ipo(exchange).await, Err(ApiError::Validation(_))),
            "accepted exchange {exchange:?}"
        );
    }
    assert!(matches!(api.fetch_task("").await, Err(ApiError::Validation(_))));
    assert!(matches!(api.fetch_task("..").await, Err(ApiError::Validation(_))));
    assert!(matches!(api.fetch_stock("../stocks").await, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn blank_required_inputs_are_rejected_locally() {
    let base = Url::parse("http://127.0.0.1:9/api/").unwrap();
    let api = client(base);

    let search = StockSearchParams {
        keyword: " ".into(),
        limit: None,
    };
    assert!(matches!(api.search_stocks(&search).await, Err(ApiError::Validation(_))));

    let shareholders = ShareholderQueryParams {
        company_name: String::new(),
        top_n: None,
    };
    assert!(matches!(
        api.query_shareholders(&shareholders).await,
        Err(ApiError::Validation(_))
    ));
    assert!(matches!(
        api.rag_query(&RagQueryParams::default(), false).await,
        Err(ApiError::Validation(_))
    ));
    assert!(matches!(api.clear_session_memory("").await, Err(ApiError::Validation(_))));
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn ipo_query_sends_filters() {
    let router = Router::new().route(
        "/api/lixingren/ipo/query",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("listing_status").map(String::as_str), Some("in_review"));
            assert_eq!(q.get("page").map(String::as_str), Some("2"));
            assert!(!q.contains_key("market"));
            Json(ipo_page(vec![ipo_record(1, "2024-03-15")], 21, 2, 20))
        }),
    );
    let api = client(spawn_api(router).await);

    let params = IpoQueryParams {
        listing_status: Some(ListingStatus::InReview),
        page: Some(2),
        ..Default::default()
    };
    let page = api.fetch_ipo_list(&params).await.unwrap();
    assert_eq!(page.total, 21);
    assert_eq!(page.data[0].stock_code, "600001");
}

#[tokio::test]
async fn rejected_route_envelope_is_an_error() {
    let router = Router::new().route(
        "/api/get-async-routes",
        get(|| async { Json(json!({"status": "error", "message": "token expired"})) }),
    );
    let api = client(spawn_api(router).await);

    assert_eq!(
        api.fetch_async_routes().await.unwrap_err(),
        ApiError::Rejected("token expired".into())
    );
}

#[tokio::test]
async fn crawl_exchange_posts_to_exchange_path() {
    let router = Router::new().route(
        "/api/lixingren/crawl/{exchange}",
        post(|Path(exchange): Path<String>| async move {
            Json(json!({"status": "success", "message": "ok", "exchange": exchange, "crawled_count": 4}))
        }),
    );
    let api = client(spawn_api(router).await);

    let response = api.crawl_exchange_ipo("szse").await.unwrap();
    assert_eq!(response.extra["exchange"], "szse");
    assert_eq!(response.extra["crawled_count"], 4);
}

#[tokio::test]
async fn wait_for_task_polls_until_finished() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/api/tasks/{task_id}",
            get(
                |State(hits): State<Hits>, Path(task_id): Path<String>| async move {
                    let status = if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                        "processing"
                    } else {
                        "completed"
                    };
                    Json(json!({"task_id": task_id, "status": status}))
                },
            ),
        )
        .with_state(hits.clone());
    let api = client(spawn_api(router).await);

    let task = api
        .wait_for_task("t-1", Duration::from_millis(1), 10)
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn wait_for_task_gives_up() {
    let router = Router::new().route(
        "/api/tasks/{task_id}",
        get(|Path(task_id): Path<String>| async move {
            Json(json!({"task_id": task_id, "status": "pending"}))
        }),
    );
    let api = client(spawn_api(router).await);

    let err = api
        .wait_for_task("t-2", Duration::from_millis(1), 3)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout);
}

#[tokio::test]
async fn stock_endpoints() {
    let router = Router::new()
        .route(
            "/api/lixingren/stocks",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("exchange").map(String::as_str), Some("SSE"));
                assert!(!q.contains_key("industry"));
                Json(json!({
                    "data": [{"stock_code": "600519", "stock_name": "贵州茅台",
                              "listing_status": "listed", "exchange": "SSE",
                              "listing_date": "2001-08-27"}],
                    "total": 1, "page": 1, "page_size": 20
                }))
            }),
        )
        .route(
            "/api/lixingren/search",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("keyword").map(String::as_str), Some("茅台"));
                assert_eq!(q.get("limit").map(String::as_str), Some("5"));
                Json(json!([]))
            }),
        )
        .route(
            "/api/lixingren/statistics",
            get(|| async {
                Json(json!({"total_stocks": 10, "listed_stocks": 7, "unlisted_stocks": 3,
                            "by_exchange": {"SSE": 6, "SZSE": 4}, "by_status": {}}))
            }),
        )
        .route(
            "/api/lixingren/stock/{code}",
            get(|Path(code): Path<String>| async move {
                Json(json!({"stock_code": code, "stock_name": "x",
                            "listing_status": "listed", "exchange": "SZSE"}))
            }),
        );
    let api = client(spawn_api(router).await);

    let list = api
        .fetch_stock_list(&StockQueryParams {
            exchange: Some("SSE".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.data[0].stock_name, "贵州茅台");

    let found = api
        .search_stocks(&StockSearchParams {
            keyword: "茅台".into(),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert!(found.is_empty());

    let stats = api.fetch_stock_statistics().await.unwrap();
    assert_eq!(stats.by_exchange["SZSE"], 4);

    let stock = api.fetch_stock("000001").await.unwrap();
    assert_eq!(stock.stock_code, "000001");
    assert_eq!(stock.listing_date, "");
}

#[tokio::test]
async fn shareholder_endpoints() {
    let router = Router::new()
        .route(
            "/api/shareholder/query",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "company_name": q["company_name"],
                    "shareholders": [{"shareholder_name": "国资委", "shareholding_ratio": 54.0,
                                      "shareholding_number": 678000000.0,
                                      "shareholder_type": "state", "rank": 1}],
                    "total_shareholders": 1,
                    "data_date": "2024-03-31"
                }))
            }),
        )
        .route(
            "/api/shareholder/refresh",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(json!({"status": "success", "message": "ok",
                            "company_name": body["company_name"], "updated_count": 10}))
            }),
        );
    let api = client(spawn_api(router).await);

    let result = api
        .query_shareholders(&ShareholderQueryParams {
            company_name: "贵州茅台".into(),
            top_n: Some(10),
        })
        .await
        .unwrap();
    assert_eq!(result.company_name, "贵州茅台");
    assert_eq!(result.shareholders[0].rank, Some(1));

    let refreshed = api.refresh_shareholders("贵州茅台").await.unwrap();
    assert_eq!(refreshed.extra["company_name"], "贵州茅台");
    assert_eq!(refreshed.extra["updated_count"], 10);
}

fn rag_answer(route: &'static str) -> serde_json::Value {
    json!({"answer": route, "sources": [], "session_id": "s-1", "request_id": "r-1"})
}

#[tokio::test]
async fn rag_query_posts_question_to_selected_model() {
    let router = Router::new()
        .route(
            "/api/agent/rag",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["query"], "何时上市?");
                assert!(body.get("session_id").is_none());
                Json(rag_answer("online"))
            }),
        )
        .route(
            "/api/agent/rag/offline",
            post(|| async { Json(rag_answer("offline")) }),
        )
        .route(
            "/api/agent/rag/sessions",
            get(|| async {
                Json(json!({"sessions": [{"session_id": "s-1", "message_count": 4,
                                          "last_activity": "2024-06-01T10:00:00",
                                          "created_at": "2024-06-01T09:00:00"}],
                            "total": 1}))
            }),
        )
        .route(
            "/api/agent/rag/clear-memory",
            post(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({"status": "success", "message": "cleared", "session_id": q["session_id"]}))
            }),
        );
    let api = client(spawn_api(router).await);

    let params = RagQueryParams {
        query: "何时上市?".into(),
        ..Default::default()
    };
    assert_eq!(api.rag_query(&params, false).await.unwrap().answer, "online");
    assert_eq!(api.rag_query(&params, true).await.unwrap().answer, "offline");

    let sessions = api.fetch_rag_sessions().await.unwrap();
    assert_eq!(sessions.sessions[0].message_count, 4);

    let cleared = api.clear_session_memory("s-1").await.unwrap();
    assert_eq!(cleared.extra["session_id"], "s-1");
}

#[tokio::test]
async fn document_endpoints() {
    let router = Router::new()
        .route(
            "/api/collections",
            get(|| async {
                Json(json!({"collections": [{"name": "base", "points_count": 42, "vector_size": 1024}],
                            "total": 1}))
            }),
        )
        .route(
            "/api/agent/collection-info",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({"status": "green", "collection_name": q["collection_name"],
                            "points_count": 42, "vectors_count": null,
                            "config": {"vector_size": 1024, "distance_metric": "Cosine"}}))
            }),
        )
        .route(
            "/api/agent/collection/documents",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("limit").map(String::as_str), Some("2"));
                assert!(!q.contains_key("offset"));
                Json(json!({"documents": [{"id": "d1", "content": "text",
                                           "metadata": {"file_name": "a.pdf"}}],
                            "total": 1, "limit": 2, "offset": 0}))
            }),
        );
    let api = client(spawn_api(router).await);

    assert_eq!(api.fetch_collections().await.unwrap().collections[0].vector_size, 1024);

    let info = api.fetch_collection_info("reports").await.unwrap();
    assert_eq!(info.collection_name, "reports");
    assert_eq!(info.vectors_count, None);

    let docs = api
        .fetch_collection_documents(&DocumentQueryParams {
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(docs.documents[0].metadata["file_name"], "a.pdf");
}

// =============================================================================
// IPO table through the HTTP surface
// =============================================================================

async fn ipo_table_api() -> (Url, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/api/lixingren/ipo/query",
            get(|State(hits): State<Hits>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(ipo_page(
                    vec![
                        ipo_record(1, "2023-01-05"),
                        ipo_record(2, "2024-06-01"),
                        ipo_record(3, "2023-11-20"),
                    ],
                    3,
                    1,
                    20,
                ))
            }),
        )
        .route(
            "/api/lixingren/crawl/all",
            post(|| async { Json(json!({"status": "success", "message": "crawled"})) }),
        )
        .with_state(hits.clone());
    (spawn_api(router).await, hits)
}

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn ipo_table_is_sorted_and_cached() {
    let (base, hits) = ipo_table_api().await;
    let app = TestApp::with_api(base);

    let (status, body) = app.get_json("/api/ipo?market=A%E8%82%A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec![2, 3, 1]);

    let (_, again) = app.get_json("/api/ipo?market=A%E8%82%A1").await;
    assert_eq!(ids(&again), vec![2, 3, 1]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let (_, health) = app.get_json("/health").await;
    assert_eq!(health["cached_ipo_pages"], 1);
}

#[tokio::test]
async fn loosely_dated_rows_are_listed() {
    let router = Router::new().route(
        "/api/lixingren/ipo/query",
        get(|| async {
            let mut page = ipo_page(
                vec![
                    ipo_record(1, ""),
                    ipo_record(2, "2024-01-05 00:00:00"),
                    ipo_record(3, "2024-02-01T00:00:00Z"),
                ],
                3,
                1,
                20,
            );
            page["filters"] = json!({"start_date": "", "market": ""});
            Json(page)
        }),
    );
    let app = TestApp::with_api(spawn_api(router).await);

    let (_, body) = app.get_json("/api/ipo").await;
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec![3, 2, 1]);
    assert_eq!(body["data"][1]["ipo_date"], "2024-01-05");
    assert!(body["data"][2]["ipo_date"].is_null());
}

#[tokio::test]
async fn crawl_invalidates_cached_pages() {
    let (base, hits) = ipo_table_api().await;
    let app = TestApp::with_api(base);

    app.get_json("/api/ipo").await;
    let response = app
        .request(
            axum::http::Request::post("/api/ipo/crawl")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["message"], "crawled");

    app.get_json("/api/ipo").await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
