//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::access::{AccessBaseline, AccessStore};
use crate::api::ApiClient;
use crate::config::Config;
use crate::navigation::NavigationTable;
use crate::query::{IpoListView, IpoQuery, QueryPolicy};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    /// Remote data API client.
    api: ApiClient,

    /// Navigation table the access store registers routes with.
    navigation: Arc<NavigationTable>,

    /// Effective routes and menus.
    access: AccessStore,

    /// Cached IPO list query.
    ipo_query: Arc<IpoQuery>,

    /// IPO table request handling for the console session.
    ipo_view: IpoListView,
}

impl AppState {
    /// Build the state from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config).context("failed to create API client")?;
        Self::with_client(config, api)
    }

    /// Build the state around an existing API client.
    pub fn with_client(config: &Config, api: ApiClient) -> Result<Self> {
        let baseline = AccessBaseline::builtin().context("failed to load menu allowlist")?;
        let navigation = Arc::new(NavigationTable::new());
        let access = AccessStore::new(Arc::new(baseline), navigation.clone());

        info!(
            routes = access.state().flat_route_list.len(),
            menus = access.state().whole_menus.len(),
            "static routes registered"
        );

        // The query retry pause is capped by the client's own retry pause.
        let defaults = QueryPolicy::default();
        let policy = QueryPolicy {
            retry_delay: defaults.retry_delay.min(config.api_retry_delay),
            ..defaults
        };
        let ipo_query = Arc::new(IpoQuery::new(Arc::new(api.clone()), policy));
        let ipo_view = IpoListView::new(ipo_query.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                api,
                navigation,
                access,
                ipo_query,
                ipo_view,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn navigation(&self) -> &NavigationTable {
        &self.inner.navigation
    }

    pub fn access(&self) -> &AccessStore {
        &self.inner.access
    }

    pub fn ipo_query(&self) -> &IpoQuery {
        &self.inner.ipo_query
    }

    pub fn ipo_view(&self) -> &IpoListView {
        &self.inner.ipo_view
    }
}
