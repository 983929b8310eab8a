//! Projection of the route tree into navigation menu items.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::route::{RouteNode, compare_order};

/// A display-only projection of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Mirrors the route path.
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

/// Generate the menu tree for a list of sibling routes.
///
/// Routes without a title, routes marked hidden, and index routes produce
/// no item; the first two take their whole subtree with them. Siblings are
/// stable-sorted by ascending order with unordered items last.
pub fn generate_menu_items(routes: &[RouteNode]) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = routes.iter().filter_map(project).collect();
    items.sort_by(|a, b| compare_order(a.order, b.order));
    items
}

fn project(route: &RouteNode) -> Option<MenuItem> {
    // Index routes are represented by their parent's entry.
    let key = route.path()?;
    let handle = route.handle();

    if handle.hide_in_menu {
        return None;
    }
    let Some(title) = handle.title.clone() else {
        debug!(path = %key, "route has no title, omitted from menu");
        return None;
    };

    Some(MenuItem {
        key: key.to_string(),
        title,
        icon: handle.icon.clone(),
        order: handle.order,
        children: generate_menu_items(route.children()),
    })
}
