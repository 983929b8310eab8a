//! Pure access-state computations.

use serde::Serialize;

use crate::menu::{Allowlist, MenuError, MenuItem, generate_menu_items};
use crate::route::{FlatRouteIndex, RouteNode, ascending, dedup_routes, flatten_routes, static_routes};

/// Static inputs every access state is derived from.
#[derive(Debug, Clone)]
pub struct AccessBaseline {
    routes: Vec<RouteNode>,
    allowlist: Allowlist,
}

impl AccessBaseline {
    /// Baseline over `routes`, which are de-duplicated and ordered here.
    pub fn new(routes: Vec<RouteNode>, allowlist: Allowlist) -> Self {
        Self {
            routes: ascending(dedup_routes(routes)),
            allowlist,
        }
    }

    /// The compiled-in route table and menu allowlist.
    pub fn builtin() -> Result<Self, MenuError> {
        Ok(Self::new(static_routes(), Allowlist::builtin()?))
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }
}

/// Effective routes, index, and menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessState {
    /// Menus after allowlist filtering.
    pub whole_menus: Vec<MenuItem>,
    /// Routes ordered by `handle.order`.
    pub route_list: Vec<RouteNode>,
    pub flat_route_list: FlatRouteIndex,
    /// False until server routes have been merged.
    pub is_access_checked: bool,
}

impl AccessState {
    /// State before any server routes arrive.
    pub fn initial(baseline: &AccessBaseline) -> Self {
        Self::derive(baseline.routes.clone(), &baseline.allowlist, false)
    }

    /// State with `server_routes` merged into the baseline. Duplicate paths
    /// combine their children; baseline metadata wins.
    pub fn merged(baseline: &AccessBaseline, server_routes: Vec<RouteNode>) -> Self {
        let mut all = baseline.routes.clone();
        all.extend(server_routes);
        Self::derive(ascending(dedup_routes(all)), &baseline.allowlist, true)
    }

    fn derive(route_list: Vec<RouteNode>, allowlist: &Allowlist, checked: bool) -> Self {
        Self {
            whole_menus: allowlist.filter(&generate_menu_items(&route_list)),
            flat_route_list: flatten_routes(&route_list),
            route_list,
            is_access_checked: checked,
        }
    }
}
