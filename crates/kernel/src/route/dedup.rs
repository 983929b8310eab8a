//! Sibling de-duplication for route lists.

use std::collections::HashMap;

use tracing::debug;

use super::node::{RouteKey, RouteKind, RouteNode};

/// Merge siblings that share a key, preserving first-seen order.
///
/// The first node seen for a key keeps its view and handle. Later duplicates
/// only contribute their children, which are appended to the first node's
/// children and de-duplicated recursively.
pub fn dedup_routes(routes: Vec<RouteNode>) -> Vec<RouteNode> {
    let mut positions: HashMap<RouteKey, usize> = HashMap::with_capacity(routes.len());
    let mut merged: Vec<RouteNode> = Vec::with_capacity(routes.len());

    for route in routes {
        if let Some(&pos) = positions.get(route.key()) {
            let existing = &mut merged[pos];
            let incoming = match route.into_parts() {
                (_, _, RouteKind::Group { children, .. }) if !children.is_empty() => children,
                _ => continue,
            };
            debug!(
                path = existing.path().unwrap_or("<index>"),
                added = incoming.len(),
                "merging duplicate route children"
            );
            existing.append_children(incoming);
            existing.map_children(dedup_routes);
        } else {
            positions.insert(route.key().clone(), merged.len());
            merged.push(route);
        }
    }

    merged
}
