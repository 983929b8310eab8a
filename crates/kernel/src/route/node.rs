//! Typed route tree nodes.

use serde::{Deserialize, Serialize};

use super::RouteError;
use super::record::RouteRecord;

/// Reference to a lazily loaded view (page module or layout).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewRef(String);

impl ViewRef {
    /// Create a view reference from its module identifier.
    pub fn new(module: impl Into<String>) -> Self {
        Self(module.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Layout shared by every top-level section of the console.
pub fn container_layout() -> ViewRef {
    ViewRef::new("layout/container")
}

/// Identity of a node among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteKey {
    /// Absolute URL path, e.g. `/system/user`.
    Path(String),
    /// Index route, rendered at the parent's URL.
    Index,
}

impl RouteKey {
    pub fn path(&self) -> Option<&str> {
        match self {
            RouteKey::Path(p) => Some(p),
            RouteKey::Index => None,
        }
    }
}

/// Display and access metadata attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHandle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Sort position among siblings (lower first, absent last).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide_in_menu: bool,
}

/// Structural shape of a node.
///
/// A group without a layout always has at least one child, so a node with
/// neither a view nor children cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    Leaf {
        view: ViewRef,
    },
    Group {
        layout: Option<ViewRef>,
        children: Vec<RouteNode>,
    },
}

/// One navigable unit of the console.
///
/// Serializes in the same shape as [`RouteRecord`], so a route list read from
/// the store can be sent back as server routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RouteRecord")]
pub struct RouteNode {
    key: RouteKey,
    handle: RouteHandle,
    kind: RouteKind,
}

impl RouteNode {
    /// A page served at `path`.
    pub fn leaf(path: impl Into<String>, view: ViewRef) -> Self {
        Self {
            key: RouteKey::Path(path.into()),
            handle: RouteHandle::default(),
            kind: RouteKind::Leaf { view },
        }
    }

    /// An index page rendered at its parent's URL.
    pub fn index(view: ViewRef) -> Self {
        Self {
            key: RouteKey::Index,
            handle: RouteHandle::default(),
            kind: RouteKind::Leaf { view },
        }
    }

    /// A section rendered inside `layout`. Infallible because the layout
    /// makes the node renderable even before children are attached.
    pub fn layout(path: impl Into<String>, layout: ViewRef, children: Vec<RouteNode>) -> Self {
        Self {
            key: RouteKey::Path(path.into()),
            handle: RouteHandle::default(),
            kind: RouteKind::Group {
                layout: Some(layout),
                children,
            },
        }
    }

    /// A pure grouping node. Fails when `children` is empty.
    pub fn group(path: impl Into<String>, children: Vec<RouteNode>) -> Result<Self, RouteError> {
        let path = path.into();
        if children.is_empty() {
            return Err(RouteError::EmptyGroup(path));
        }
        Ok(Self {
            key: RouteKey::Path(path),
            handle: RouteHandle::default(),
            kind: RouteKind::Group {
                layout: None,
                children,
            },
        })
    }

    /// Assemble a node from already validated parts.
    pub(crate) fn from_parts(key: RouteKey, handle: RouteHandle, kind: RouteKind) -> Self {
        Self { key, handle, kind }
    }

    pub(crate) fn into_parts(self) -> (RouteKey, RouteHandle, RouteKind) {
        (self.key, self.handle, self.kind)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.handle.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.handle.icon = Some(icon.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.handle.order = Some(order);
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handle.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handle.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.handle.keep_alive = Some(keep_alive);
        self
    }

    pub fn hidden_in_menu(mut self) -> Self {
        self.handle.hide_in_menu = true;
        self
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn path(&self) -> Option<&str> {
        self.key.path()
    }

    pub fn is_index(&self) -> bool {
        self.key == RouteKey::Index
    }

    pub fn handle(&self) -> &RouteHandle {
        &self.handle
    }

    pub fn kind(&self) -> &RouteKind {
        &self.kind
    }

    /// The view rendered for this node: a leaf's page or a group's layout.
    pub fn view(&self) -> Option<&ViewRef> {
        match &self.kind {
            RouteKind::Leaf { view } => Some(view),
            RouteKind::Group { layout, .. } => layout.as_ref(),
        }
    }

    pub fn children(&self) -> &[RouteNode] {
        match &self.kind {
            RouteKind::Leaf { .. } => &[],
            RouteKind::Group { children, .. } => children,
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(RouteNode::node_count).sum::<usize>()
    }

    /// Append children, turning a leaf into a group whose layout is the
    /// leaf's former view.
    pub(crate) fn append_children(&mut self, extra: Vec<RouteNode>) {
        if extra.is_empty() {
            return;
        }
        match &mut self.kind {
            RouteKind::Group { children, .. } => children.extend(extra),
            RouteKind::Leaf { view } => {
                self.kind = RouteKind::Group {
                    layout: Some(view.clone()),
                    children: extra,
                };
            }
        }
    }

    /// Replace the children of a group. Callers must keep a layout-less
    /// group non-empty.
    pub(crate) fn map_children(&mut self, f: impl FnOnce(Vec<RouteNode>) -> Vec<RouteNode>) {
        if let RouteKind::Group { children, .. } = &mut self.kind {
            let taken = std::mem::take(children);
            *children = f(taken);
        }
    }
}
