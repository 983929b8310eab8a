//! Typed client for the remote data API.
//!
//! The client owns transport concerns: base URL, timeouts, error
//! classification, and the single automatic retry for server errors.

pub mod document;
mod error;
pub mod ipo;
pub mod rag;
pub mod shareholder;
pub mod stock;
pub mod system;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::route::RouteRecord;
use document::CollectionParam;
use rag::SessionParam;
use shareholder::CompanyRequest;

pub use error::{ApiError, ErrorCategory, Notice, NoticeLevel};
pub use document::{
    CollectionInfo, CollectionListResponse, DEFAULT_COLLECTION, DocumentListResponse,
    DocumentQueryParams,
};
pub use ipo::{IpoListResponse, IpoQueryParams, IpoRecord, IpoStatistics, ListingStatus};
pub use rag::{RagQueryParams, RagResponse, SessionListResponse};
pub use shareholder::{
    ControllingShareholderResponse, ShareholderQueryParams, ShareholderQueryResponse,
};
pub use stock::{StockInfo, StockListResponse, StockQueryParams, StockSearchParams, StockStatistics};
pub use system::{PageParams, SyncHistoryResponse, SyncStatus, TriggerSyncResponse};
pub use types::{ApiResponse, CommandResponse, EnvelopeStatus, ListResponse, TaskResponse, TaskStatus};

/// Timeout for crawling every exchange.
const CRAWL_ALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for crawling a single exchange.
const CRAWL_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for refreshing a company's shareholders from upstream.
const SHAREHOLDER_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a RAG answer; inference is slow.
const RAG_TIMEOUT: Duration = Duration::from_secs(180);

/// Remote API client. Clone is cheap.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    /// Pause before the single retry of a server error.
    retry_delay: Duration,
}

impl ApiClient {
    /// Create a client for `base_url`. Relative paths are joined onto it, so
    /// it should end with a slash.
    pub fn new(base_url: Url, timeout: Duration, retry_delay: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                retry_delay,
            }),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            config.api_timeout,
            config.api_retry_delay,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Query IPO records.
    pub async fn fetch_ipo_list(&self, params: &IpoQueryParams) -> Result<IpoListResponse, ApiError> {
        self.get_with_query("lixingren/ipo/query", params).await
    }

    pub async fn fetch_ipo_statistics(&self) -> Result<IpoStatistics, ApiError> {
        self.get("lixingren/ipo/statistics").await
    }

    /// Crawl IPO data from every exchange.
    pub async fn crawl_all_ipo(&self) -> Result<CommandResponse, ApiError> {
        self.post("lixingren/crawl/all", Some(CRAWL_ALL_TIMEOUT)).await
    }

    /// Crawl IPO data from one exchange.
    pub async fn crawl_exchange_ipo(&self, exchange: &str) -> Result<CommandResponse, ApiError> {
        let exchange = path_segment("exchange", exchange)?;
        self.post(
            &format!("lixingren/crawl/{exchange}"),
            Some(CRAWL_EXCHANGE_TIMEOUT),
        )
        .await
    }

    pub async fn fetch_sync_status(&self) -> Result<SyncStatus, ApiError> {
        self.get("system/sync/status").await
    }

    pub async fn fetch_sync_history(&self, params: &PageParams) -> Result<SyncHistoryResponse, ApiError> {
        self.get_with_query("system/sync/history", params).await
    }

    pub async fn trigger_stock_sync(&self) -> Result<TriggerSyncResponse, ApiError> {
        self.post("system/sync/stock", None).await
    }

    pub async fn trigger_ipo_crawl(&self) -> Result<TriggerSyncResponse, ApiError> {
        self.post("system/sync/ipo", None).await
    }

    pub async fn fetch_stock(&self, stock_code: &str) -> Result<StockInfo, ApiError> {
        let stock_code = path_segment("stock code", stock_code)?;
        self.get(&format!("lixingren/stock/{stock_code}")).await
    }

    pub async fn fetch_stock_list(&self, params: &StockQueryParams) -> Result<StockListResponse, ApiError> {
        self.get_with_query("lixingren/stocks", params).await
    }

    pub async fn search_stocks(&self, params: &StockSearchParams) -> Result<Vec<StockInfo>, ApiError> {
        if params.keyword.trim().is_empty() {
            return Err(ApiError::Validation("empty search keyword".into()));
        }
        self.get_with_query("lixingren/search", params).await
    }

    pub async fn fetch_stock_statistics(&self) -> Result<StockStatistics, ApiError> {
        self.get("lixingren/statistics").await
    }

    /// Top shareholders of a company.
    pub async fn query_shareholders(
        &self,
        params: &ShareholderQueryParams,
    ) -> Result<ShareholderQueryResponse, ApiError> {
        require_company(&params.company_name)?;
        self.get_with_query("shareholder/query", params).await
    }

    pub async fn fetch_controlling_shareholder(
        &self,
        company_name: &str,
    ) -> Result<ControllingShareholderResponse, ApiError> {
        require_company(company_name)?;
        self.get_with_query("shareholder/controlling", &CompanyRequest {
            company_name: company_name.to_string(),
        })
        .await
    }

    /// Re-fetch a company's shareholders upstream.
    pub async fn refresh_shareholders(&self, company_name: &str) -> Result<CommandResponse, ApiError> {
        require_company(company_name)?;
        let body = CompanyRequest {
            company_name: company_name.to_string(),
        };
        self.post_json("shareholder/refresh", &body, Some(SHAREHOLDER_REFRESH_TIMEOUT))
            .await
    }

    /// Ask the knowledge base a question. `offline` selects the local model.
    pub async fn rag_query(&self, params: &RagQueryParams, offline: bool) -> Result<RagResponse, ApiError> {
        if params.query.trim().is_empty() {
            return Err(ApiError::Validation("empty question".into()));
        }
        let path = if offline { "agent/rag/offline" } else { "agent/rag" };
        self.post_json(path, params, Some(RAG_TIMEOUT)).await
    }

    pub async fn fetch_rag_sessions(&self) -> Result<SessionListResponse, ApiError> {
        self.get("agent/rag/sessions").await
    }

    /// Forget the conversation memory of a session.
    pub async fn clear_session_memory(&self, session_id: &str) -> Result<CommandResponse, ApiError> {
        if session_id.is_empty() {
            return Err(ApiError::Validation("empty session id".into()));
        }
        self.send(Method::POST, "agent/rag/clear-memory", None, |request| {
            request.query(&SessionParam { session_id })
        })
        .await
    }

    pub async fn fetch_collections(&self) -> Result<CollectionListResponse, ApiError> {
        self.get("collections").await
    }

    pub async fn fetch_collection_info(&self, collection_name: &str) -> Result<CollectionInfo, ApiError> {
        self.get_with_query("agent/collection-info", &CollectionParam { collection_name })
            .await
    }

    pub async fn fetch_collection_documents(
        &self,
        params: &DocumentQueryParams,
    ) -> Result<DocumentListResponse, ApiError> {
        self.get_with_query("agent/collection/documents", params).await
    }

    pub async fn fetch_task(&self, task_id: &str) -> Result<TaskResponse, ApiError> {
        let task_id = path_segment("task id", task_id)?;
        self.get(&format!("tasks/{task_id}")).await
    }

    /// Poll a task until it completes or fails, at most `max_polls` times.
    pub async fn wait_for_task(
        &self,
        task_id: &str,
        interval: Duration,
        max_polls: u32,
    ) -> Result<TaskResponse, ApiError> {
        for poll in 1..=max_polls {
            let task = self.fetch_task(task_id).await?;
            if task.status.is_finished() {
                debug!(task_id = %task_id, status = ?task.status, polls = poll, "task finished");
                return Ok(task);
            }
            tokio::time::sleep(interval).await;
        }
        warn!(task_id = %task_id, max_polls, "gave up waiting for task");
        Err(ApiError::Timeout)
    }

    /// Routes the server grants the current user.
    pub async fn fetch_async_routes(&self) -> Result<Vec<RouteRecord>, ApiError> {
        let envelope: ApiResponse<Vec<RouteRecord>> = self.get("get-async-routes").await?;
        match envelope.status {
            EnvelopeStatus::Success => Ok(envelope.data.unwrap_or_default()),
            EnvelopeStatus::Error => Err(ApiError::Rejected(
                envelope
                    .message
                    .or(envelope.detail)
                    .unwrap_or_else(|| "route request rejected".to_string()),
            )),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None, |request| request).await
    }

    async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, None, |request| request.query(query))
            .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, timeout, |request| request).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B, timeout: Option<Duration>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, timeout, |request| request.json(body))
            .await
    }

    /// Build and execute a request. `timeout` overrides the client default.
    async fn send<T, F>(
        &self,
        method: Method,
        path: &str,
        timeout: Option<Duration>,
        prepare: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path)?;
        self.execute(|| {
            let request = prepare(self.inner.http.request(method.clone(), url.clone()));
            match timeout {
                Some(t) => request.timeout(t),
                None => request,
            }
        })
        .await
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request, retrying exactly once after a server error.
    async fn execute<T, F>(&self, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        match attempt(build()).await {
            Err(ApiError::Server(status)) => {
                warn!(
                    status,
                    delay_ms = self.inner.retry_delay.as_millis() as u64,
                    "server error, retrying once"
                );
                tokio::time::sleep(self.inner.retry_delay).await;
                attempt(build()).await
            }
            other => other,
        }
    }
}

/// Check that `value` joins as exactly one path segment.
fn path_segment<'a>(kind: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '?', '#', '%']);
    if invalid {
        return Err(ApiError::Validation(format!("invalid {kind} {value:?}")));
    }
    Ok(value)
}

fn require_company(company_name: &str) -> Result<(), ApiError> {
    if company_name.trim().is_empty() {
        return Err(ApiError::Validation("empty company name".into()));
    }
    Ok(())
}

async fn attempt<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await.map_err(ApiError::from_transport)?;
    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), url = %response.url(), "API request failed");
        return Err(ApiError::from_status(status));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_stay_single_segments() {
        for ok in ["sse", "szse", "600519", "t-1", "task_01"] {
            assert_eq!(path_segment("id", ok).unwrap(), ok);
        }
        for bad in ["", ".", "..", "a/b", "a\\b", "a?b", "a#b", "%2e%2e"] {
            assert!(
                matches!(path_segment("id", bad), Err(ApiError::Validation(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn checked_segments_join_under_their_endpoint() {
        let base = Url::parse("http://localhost/api/").unwrap();
        let exchange = path_segment("exchange", "bse").unwrap();
        let url = base.join(&format!("lixingren/crawl/{exchange}")).unwrap();
        assert_eq!(url.path(), "/api/lixingren/crawl/bse");
    }
}
