//! IPO list query cache.
//!
//! Wraps the remote IPO list call with a freshness window, idle eviction,
//! request coalescing, and placeholder data:
//! - a page younger than `stale_time` is served without a request
//! - a page unused for `gc_time` is evicted
//! - concurrent requests for the same params share one fetch
//! - while a new key fails, the last displayed page stays available
//!
//! Only the most recent request may replace the displayed page, so a
//! superseded request that resolves late lands in the cache under its own
//! key without touching the placeholder.

mod view;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, IpoListResponse, IpoQueryParams};

pub use view::{IpoFilters, IpoListView, IpoPageRequest, IpoTablePage};

/// Upper bound on cached pages.
const MAX_CACHED_PAGES: u64 = 1_000;

/// Cache policy for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Age after which a cached page is refetched (default: 5 minutes).
    pub stale_time: Duration,
    /// Idle time after which a cached page is evicted (default: 10 minutes).
    pub gc_time: Duration,
    /// Extra attempts after a network failure or timeout (default: 1).
    pub retry: u32,
    /// Pause between attempts (default: 1 second).
    pub retry_delay: Duration,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(10 * 60),
            retry: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Where IPO pages come from.
#[async_trait]
pub trait IpoSource: Send + Sync {
    async fn fetch_ipo_list(&self, params: &IpoQueryParams) -> Result<IpoListResponse, ApiError>;
}

#[async_trait]
impl IpoSource for ApiClient {
    async fn fetch_ipo_list(&self, params: &IpoQueryParams) -> Result<IpoListResponse, ApiError> {
        ApiClient::fetch_ipo_list(self, params).await
    }
}

#[derive(Debug, Clone)]
struct CachedPage {
    data: Arc<IpoListResponse>,
    fetched_at: Instant,
}

/// Outcome of a query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Data for the requested params, or placeholder data on failure.
    pub data: Option<Arc<IpoListResponse>>,
    /// True when `data` belongs to an earlier request.
    pub is_placeholder: bool,
    pub error: Option<ApiError>,
}

/// Cached IPO list query.
pub struct IpoQuery {
    source: Arc<dyn IpoSource>,
    cache: Cache<IpoQueryParams, CachedPage>,
    policy: QueryPolicy,
    /// Last page handed out successfully.
    previous: Mutex<Option<Arc<IpoListResponse>>>,
    /// Generation of the most recent `fetch` call.
    latest: AtomicU64,
}

impl IpoQuery {
    pub fn new(source: Arc<dyn IpoSource>, policy: QueryPolicy) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHED_PAGES)
            .time_to_idle(policy.gc_time)
            .build();

        Self {
            source,
            cache,
            policy,
            previous: Mutex::new(None),
            latest: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    /// Data to show while a request is outstanding.
    pub fn placeholder(&self) -> Option<Arc<IpoListResponse>> {
        self.previous.lock().clone()
    }

    /// Fetch the page for `params`, from cache when fresh.
    pub async fn fetch(&self, params: &IpoQueryParams) -> QueryResult {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut stale = None;
        if let Some(entry) = self.cache.get(params).await {
            if entry.fetched_at.elapsed() < self.policy.stale_time {
                debug!(params = ?params, "IPO query cache hit");
                return self.success(entry.data, generation);
            }
            debug!(params = ?params, "IPO query cache entry is stale");
            self.cache.invalidate(params).await;
            stale = Some(entry.data);
        }

        let source = Arc::clone(&self.source);
        let policy = self.policy;
        let key = params.clone();
        let loaded = self
            .cache
            .try_get_with(params.clone(), async move {
                fetch_with_retry(source.as_ref(), &key, policy)
                    .await
                    .map(|data| CachedPage {
                        data: Arc::new(data),
                        fetched_at: Instant::now(),
                    })
            })
            .await;

        match loaded {
            Ok(page) => self.success(page.data, generation),
            Err(err) => {
                let error = ApiError::clone(&err);
                warn!(params = ?params, error = %error, "IPO query failed");
                QueryResult {
                    data: stale.or_else(|| self.placeholder()),
                    is_placeholder: true,
                    error: Some(error),
                }
            }
        }
    }

    /// Drop every cached page.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached pages (for monitoring).
    pub async fn cached_pages(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    fn success(&self, data: Arc<IpoListResponse>, generation: u64) -> QueryResult {
        if self.latest.load(Ordering::SeqCst) == generation {
            *self.previous.lock() = Some(Arc::clone(&data));
        } else {
            debug!(generation, "superseded IPO query resolved");
        }
        QueryResult {
            data: Some(data),
            is_placeholder: false,
            error: None,
        }
    }
}

async fn fetch_with_retry(
    source: &dyn IpoSource,
    params: &IpoQueryParams,
    policy: QueryPolicy,
) -> Result<IpoListResponse, ApiError> {
    let mut attempt = 0;
    loop {
        match source.fetch_ipo_list(params).await {
            Err(err) if err.is_retryable() && attempt < policy.retry => {
                attempt += 1;
                debug!(attempt, error = %err, "retrying IPO query");
                tokio::time::sleep(policy.retry_delay).await;
            }
            other => return other,
        }
    }
}

impl std::fmt::Debug for IpoQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpoQuery")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Source that replays scripted responses and counts calls.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        pub responses: Mutex<VecDeque<Result<IpoListResponse, ApiError>>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn new(responses: Vec<Result<IpoListResponse, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IpoSource for ScriptedSource {
        async fn fetch_ipo_list(
            &self,
            _params: &IpoQueryParams,
        ) -> Result<IpoListResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or(Err(ApiError::Network("no scripted response".into())))
        }
    }

    pub(crate) fn page(total: u64) -> IpoListResponse {
        IpoListResponse {
            data: vec![],
            total,
            page: 1,
            page_size: 20,
            filters: serde_json::Value::Null,
        }
    }

    fn fast_policy() -> QueryPolicy {
        QueryPolicy {
            retry_delay: Duration::ZERO,
            ..QueryPolicy::default()
        }
    }

    fn params(page: u32) -> IpoQueryParams {
        IpoQueryParams {
            page: Some(page),
            ..Default::default()
        }
    }

    #[test]
    fn default_policy_matches_console_settings() {
        let policy = QueryPolicy::default();
        assert_eq!(policy.stale_time, Duration::from_secs(300));
        assert_eq!(policy.gc_time, Duration::from_secs(600));
        assert_eq!(policy.retry, 1);
    }

    #[tokio::test]
    async fn fresh_pages_are_served_from_cache() {
        let source = ScriptedSource::new(vec![Ok(page(3))]);
        let query = IpoQuery::new(source.clone(), fast_policy());

        let first = query.fetch(&params(1)).await;
        let second = query.fetch(&params(1)).await;

        assert_eq!(first.data.unwrap().total, 3);
        assert_eq!(second.data.unwrap().total, 3);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn stale_pages_are_refetched() {
        let source = ScriptedSource::new(vec![Ok(page(1)), Ok(page(2))]);
        let policy = QueryPolicy {
            stale_time: Duration::ZERO,
            ..fast_policy()
        };
        let query = IpoQuery::new(source.clone(), policy);

        query.fetch(&params(1)).await;
        let refreshed = query.fetch(&params(1)).await;

        assert_eq!(refreshed.data.unwrap().total, 2);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn network_failures_are_retried_once() {
        let source = ScriptedSource::new(vec![Err(ApiError::Timeout), Ok(page(5))]);
        let query = IpoQuery::new(source.clone(), fast_policy());

        let result = query.fetch(&params(1)).await;
        assert!(result.error.is_none());
        assert_eq!(result.data.unwrap().total, 5);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn forbidden_is_not_retried() {
        let source = ScriptedSource::new(vec![Err(ApiError::Forbidden), Ok(page(5))]);
        let query = IpoQuery::new(source.clone(), fast_policy());

        let result = query.fetch(&params(1)).await;
        assert_eq!(result.error, Some(ApiError::Forbidden));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failed_key_keeps_previous_data_as_placeholder() {
        let source = ScriptedSource::new(vec![
            Ok(page(10)),
            Err(ApiError::Server(500)),
        ]);
        let query = IpoQuery::new(source.clone(), fast_policy());

        query.fetch(&params(1)).await;
        let result = query.fetch(&params(2)).await;

        assert!(result.is_placeholder);
        assert_eq!(result.error, Some(ApiError::Server(500)));
        assert_eq!(result.data.unwrap().total, 10);
        assert_eq!(query.placeholder().unwrap().total, 10);
    }

    #[tokio::test]
    async fn concurrent_identical_queries_share_one_fetch() {
        let source = ScriptedSource::new(vec![Ok(page(1)), Ok(page(1))]);
        let query = Arc::new(IpoQuery::new(source.clone(), fast_policy()));

        let (p1, p2) = (params(1), params(1));
        let (a, b) = tokio::join!(query.fetch(&p1), query.fetch(&p2));
        assert!(a.error.is_none() && b.error.is_none());
        assert_eq!(source.calls(), 1);
    }

    /// Page 1 blocks until released; page 2 succeeds; anything else fails.
    #[derive(Default)]
    struct GatedSource {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl IpoSource for GatedSource {
        async fn fetch_ipo_list(
            &self,
            params: &IpoQueryParams,
        ) -> Result<IpoListResponse, ApiError> {
            match params.page {
                Some(1) => {
                    self.started.notify_one();
                    self.release.notified().await;
                    Ok(page(1))
                }
                Some(2) => Ok(page(2)),
                _ => Err(ApiError::Server(500)),
            }
        }
    }

    #[tokio::test]
    async fn superseded_query_does_not_replace_placeholder() {
        let source = Arc::new(GatedSource::default());
        let query = Arc::new(IpoQuery::new(source.clone(), fast_policy()));

        let slow = tokio::spawn({
            let query = Arc::clone(&query);
            async move { query.fetch(&params(1)).await }
        });
        source.started.notified().await;

        let current = query.fetch(&params(2)).await;
        assert_eq!(current.data.unwrap().total, 2);

        source.release.notify_one();
        let late = slow.await.unwrap();
        assert!(!late.is_placeholder);
        assert_eq!(late.data.unwrap().total, 1);
        assert_eq!(query.placeholder().unwrap().total, 2);

        let failed = query.fetch(&params(3)).await;
        assert!(failed.is_placeholder);
        assert_eq!(failed.data.unwrap().total, 2);
    }
}
