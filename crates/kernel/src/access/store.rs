//! Access store: publishes access states and keeps navigation in sync.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

use super::state::{AccessBaseline, AccessState};
use crate::api::{ApiClient, ApiError};
use crate::navigation::{Navigator, ROOT_ROUTE_ID};
use crate::route::{RouteNode, convert_records};

/// Owner of the current [`AccessState`].
///
/// `set_access_store` and `reset` are the only mutation paths. Each one
/// computes the complete new state before publishing it, so subscribers
/// never observe a partial update.
pub struct AccessStore {
    baseline: Arc<AccessBaseline>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Arc<AccessState>>,
    /// Serializes (compute, register, publish) between writers.
    write: Mutex<()>,
}

impl AccessStore {
    /// Initialize the store with the baseline state and register the
    /// baseline routes with the navigator.
    pub fn new(baseline: Arc<AccessBaseline>, navigator: Arc<dyn Navigator>) -> Self {
        let initial = Arc::new(AccessState::initial(&baseline));
        navigator.reset_routes(baseline.routes());
        let (state, _) = watch::channel(initial);

        Self {
            baseline,
            navigator,
            state,
            write: Mutex::new(()),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<AccessState> {
        Arc::clone(&self.state.borrow())
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AccessState>> {
        self.state.subscribe()
    }

    pub fn baseline(&self) -> &AccessBaseline {
        &self.baseline
    }

    /// Merge server-delivered routes into the baseline and publish the
    /// resulting state.
    pub fn set_access_store(&self, server_routes: Vec<RouteNode>) -> Arc<AccessState> {
        let _guard = self.write.lock();

        self.navigator.patch_routes(ROOT_ROUTE_ID, &server_routes);
        let added = server_routes.len();
        let next = Arc::new(AccessState::merged(&self.baseline, server_routes));

        info!(
            server_routes = added,
            routes = next.flat_route_list.len(),
            menus = next.whole_menus.len(),
            "access routes updated"
        );

        self.state.send_replace(Arc::clone(&next));
        next
    }

    /// Discard server routes and restore the baseline state.
    pub fn reset(&self) -> Arc<AccessState> {
        let _guard = self.write.lock();

        self.navigator.reset_routes(self.baseline.routes());
        let initial = Arc::new(AccessState::initial(&self.baseline));
        self.state.send_replace(Arc::clone(&initial));

        info!("access routes reset to baseline");
        initial
    }

    /// Fetch server routes from the remote API and merge them.
    ///
    /// On failure the current state is left untouched.
    pub async fn load_remote(&self, client: &ApiClient) -> Result<Arc<AccessState>, ApiError> {
        let records = client
            .fetch_async_routes()
            .await
            .inspect_err(|e| warn!(error = %e, "failed to fetch server routes"))?;

        let conversion = convert_records(records);
        if !conversion.dropped.is_empty() {
            warn!(
                dropped = conversion.dropped.len(),
                "some server routes were malformed and skipped"
            );
        }

        Ok(self.set_access_store(conversion.routes))
    }
}

impl std::fmt::Debug for AccessStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessStore").finish_non_exhaustive()
    }
}
