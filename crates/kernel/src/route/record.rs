//! Wire format for routes delivered by the remote API.
//!
//! Records are loosely shaped JSON: any field may be missing. Conversion
//! into [`RouteNode`] drops records that cannot be keyed or rendered and
//! reports each drop through `tracing` instead of failing the whole batch.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::node::{RouteHandle, RouteKey, RouteKind, RouteNode, ViewRef};

/// A route as serialized on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,
    /// Module identifier of the view (e.g. `/system/user/index.tsx`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ViewRef>,
    #[serde(default)]
    pub handle: RouteHandle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
}

/// Why a record was dropped during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Neither a path nor the index flag.
    MissingPath,
    /// No component and no (valid) children.
    Unrenderable,
}

/// A record that did not survive conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRoute {
    /// Path of the dropped record, or of its nearest keyed ancestor.
    pub location: String,
    pub reason: DropReason,
}

/// Result of converting a batch of records.
#[derive(Debug, Default)]
pub struct Conversion {
    pub routes: Vec<RouteNode>,
    pub dropped: Vec<DroppedRoute>,
}

/// Convert wire records into typed nodes, dropping malformed ones.
pub fn convert_records(records: Vec<RouteRecord>) -> Conversion {
    let mut conversion = Conversion::default();
    conversion.routes = convert_level(records, "", &mut conversion.dropped);

    for dropped in &conversion.dropped {
        warn!(
            location = %dropped.location,
            reason = ?dropped.reason,
            "dropped malformed route record"
        );
    }

    conversion
}

fn convert_level(
    records: Vec<RouteRecord>,
    parent: &str,
    dropped: &mut Vec<DroppedRoute>,
) -> Vec<RouteNode> {
    records
        .into_iter()
        .filter_map(|record| convert_one(record, parent, dropped))
        .collect()
}

fn convert_one(
    record: RouteRecord,
    parent: &str,
    dropped: &mut Vec<DroppedRoute>,
) -> Option<RouteNode> {
    let key = match (record.path, record.index) {
        (Some(path), _) if !path.is_empty() => RouteKey::Path(path),
        (_, true) => RouteKey::Index,
        _ => {
            dropped.push(DroppedRoute {
                location: parent.to_string(),
                reason: DropReason::MissingPath,
            });
            return None;
        }
    };

    let location = key.path().unwrap_or(parent).to_string();
    let children = convert_level(record.children, &location, dropped);

    let kind = match (record.component, children.is_empty()) {
        (Some(view), true) => RouteKind::Leaf { view },
        (layout, false) => RouteKind::Group { layout, children },
        (None, true) => {
            dropped.push(DroppedRoute {
                location,
                reason: DropReason::Unrenderable,
            });
            return None;
        }
    };

    Some(RouteNode::from_parts(key, record.handle, kind))
}

impl From<RouteNode> for RouteRecord {
    fn from(node: RouteNode) -> Self {
        let (key, handle, kind) = node.into_parts();
        let (path, index) = match key {
            RouteKey::Path(path) => (Some(path), false),
            RouteKey::Index => (None, true),
        };
        let (component, children) = match kind {
            RouteKind::Leaf { view } => (Some(view), Vec::new()),
            RouteKind::Group { layout, children } => {
                (layout, children.into_iter().map(RouteRecord::from).collect())
            }
        };
        Self {
            path,
            index,
            component,
            handle,
            children,
        }
    }
}
