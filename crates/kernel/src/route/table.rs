//! Route table assembly from independently authored fragments.

use std::cmp::Ordering;

use tracing::debug;

use super::dedup::dedup_routes;
use super::flatten::count_routes;
use super::node::RouteNode;

/// Compare two optional sort orders: ascending, absent orders last.
pub fn compare_order(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sort top-level routes by `handle.order`.
pub fn ascending(mut routes: Vec<RouteNode>) -> Vec<RouteNode> {
    routes.sort_by(|a, b| compare_order(a.handle().order, b.handle().order));
    routes
}

/// Collects route fragments and produces the de-duplicated, ordered table.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    fragments: Vec<(String, Vec<RouteNode>)>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the routes of one module.
    pub fn fragment(mut self, name: impl Into<String>, routes: Vec<RouteNode>) -> Self {
        self.fragments.push((name.into(), routes));
        self
    }

    pub fn build(self) -> Vec<RouteNode> {
        let mut all = Vec::new();
        for (name, routes) in self.fragments {
            debug!(fragment = %name, routes = routes.len(), "adding route fragment");
            all.extend(routes);
        }

        let table = ascending(dedup_routes(all));
        debug!(
            top_level = table.len(),
            total = count_routes(&table),
            "built static route table"
        );
        table
    }
}
