//! Navigation table: resolves direct URL entry to the route that serves it.
//!
//! The access store registers merged routes here and restores the static
//! baseline on reset, through the [`Navigator`] trait.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::route::{RouteHandle, RouteNode, ViewRef};

/// Identifier of the root route that top-level routes are attached to.
pub const ROOT_ROUTE_ID: &str = "root";

/// Registration seam used by the access store.
pub trait Navigator: Send + Sync {
    /// Register `routes` (recursively) under `parent_id`.
    fn patch_routes(&self, parent_id: &str, routes: &[RouteNode]);

    /// Drop every registration and register `baseline` under the root.
    fn reset_routes(&self, baseline: &[RouteNode]);
}

/// A registered route.
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    /// Path pattern, e.g. `/stock-data/:code`.
    pub path: String,
    pub parent: String,
    /// View rendered at this URL: the index child's view if there is one,
    /// else the route's own view.
    pub view: Option<ViewRef>,
    pub handle: RouteHandle,
}

/// Result of resolving a URL.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMatch {
    pub route: NavEntry,
    /// Path parameters extracted (e.g. {"code": "600519"}).
    pub params: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, NavEntry>,
    /// Patterns ordered most specific first.
    patterns: Vec<String>,
}

/// In-memory navigation table.
#[derive(Debug, Default)]
pub struct NavigationTable {
    inner: RwLock<Inner>,
}

impl NavigationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with `routes` registered under the root.
    pub fn with_routes(routes: &[RouteNode]) -> Self {
        let table = Self::new();
        table.patch_routes(ROOT_ROUTE_ID, routes);
        table
    }

    /// Match a request path against registered routes.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let inner = self.inner.read();
        for pattern in &inner.patterns {
            if let Some(params) = match_pattern(pattern, path)
                && let Some(entry) = inner.entries.get(pattern)
            {
                return Some(RouteMatch {
                    route: entry.clone(),
                    params,
                });
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl Navigator for NavigationTable {
    fn patch_routes(&self, parent_id: &str, routes: &[RouteNode]) {
        let mut inner = self.inner.write();
        register(&mut inner.entries, parent_id, routes);
        rebuild_patterns(&mut inner);
    }

    fn reset_routes(&self, baseline: &[RouteNode]) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        register(&mut inner.entries, ROOT_ROUTE_ID, baseline);
        rebuild_patterns(&mut inner);
    }
}

fn register(entries: &mut HashMap<String, NavEntry>, parent: &str, routes: &[RouteNode]) {
    for route in routes {
        // Index routes are folded into their parent's entry.
        let Some(path) = route.path() else {
            continue;
        };

        let index_view = route
            .children()
            .iter()
            .find(|child| child.is_index())
            .and_then(RouteNode::view);

        // First registration of a path wins, like route de-duplication.
        entries.entry(path.to_string()).or_insert_with(|| NavEntry {
            path: path.to_string(),
            parent: parent.to_string(),
            view: index_view.or(route.view()).cloned(),
            handle: route.handle().clone(),
        });

        register(entries, path, route.children());
    }
}

fn rebuild_patterns(inner: &mut Inner) {
    inner.patterns = inner.entries.keys().cloned().collect();

    // Fewer params = more specific = first; then deeper paths first
    inner.patterns.sort_by(|a, b| {
        specificity(a)
            .cmp(&specificity(b))
            .then_with(|| a.cmp(b))
    });

    debug!(routes = inner.patterns.len(), "rebuilt navigation table");
}

fn specificity(pattern: &str) -> (usize, i64) {
    let param_count = pattern.matches(':').count();
    let segment_count = pattern.matches('/').count() as i64;
    (param_count, -segment_count)
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/stock-data/:code/holders"
/// Path: "/stock-data/600519/holders"
/// Result: Some({"code": "600519"})
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.insert(param_name.to_string(), actual.to_string());
        } else if pat != actual {
            return None;
        }
    }

    Some(params)
}
