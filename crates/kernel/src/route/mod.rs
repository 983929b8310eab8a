//! Route tree: typed nodes, wire records, and the pure transforms over them.
//!
//! - [`RouteTableBuilder`] assembles static module fragments
//! - [`dedup_routes`] merges siblings sharing a path
//! - [`flatten_routes`] builds the identifier index
//! - [`convert_records`] turns server-delivered JSON into typed nodes

mod dedup;
mod flatten;
pub mod modules;
mod node;
mod record;
mod table;

use thiserror::Error;

pub use dedup::dedup_routes;
pub use flatten::{FlatRouteIndex, count_routes, flatten_routes, route_id};
pub use modules::static_routes;
pub use node::{RouteHandle, RouteKey, RouteKind, RouteNode, ViewRef, container_layout};
pub use record::{Conversion, DropReason, DroppedRoute, RouteRecord, convert_records};
pub use table::{RouteTableBuilder, ascending, compare_order};

/// Errors raised while building route nodes.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route group {0} has no layout and no children")]
    EmptyGroup(String),
}
