//! Flat route index keyed by route identifier.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::node::{RouteKey, RouteNode};

/// Suffix appended to the parent identifier for index routes.
const INDEX_SUFFIX: &str = "#index";

/// Every node of a route tree, keyed by identifier.
///
/// Rebuilt from scratch whenever the route list changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlatRouteIndex(BTreeMap<String, RouteNode>);

impl FlatRouteIndex {
    pub fn get(&self, id: &str) -> Option<&RouteNode> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Identifier of a node given its parent's identifier.
pub fn route_id(key: &RouteKey, parent_id: &str) -> String {
    match key {
        RouteKey::Path(path) => path.clone(),
        RouteKey::Index => format!("{parent_id}{INDEX_SUFFIX}"),
    }
}

/// Flatten a route tree depth-first, visiting each node once.
pub fn flatten_routes(routes: &[RouteNode]) -> FlatRouteIndex {
    let mut index = BTreeMap::new();
    visit(routes, "", &mut index);
    FlatRouteIndex(index)
}

fn visit(routes: &[RouteNode], parent_id: &str, index: &mut BTreeMap<String, RouteNode>) {
    for route in routes {
        let id = route_id(route.key(), parent_id);
        visit(route.children(), &id, index);
        if index.insert(id.clone(), route.clone()).is_some() {
            warn!(id = %id, "route identifier appears more than once in the tree");
        }
    }
}

/// Count every node in a route tree.
pub fn count_routes(routes: &[RouteNode]) -> usize {
    routes.iter().map(RouteNode::node_count).sum()
}
