//! Menu allowlist: restricts which generated menu items are displayed.
//!
//! The allowlist is a presentation filter only. Routes hidden here stay in
//! the route list and flat index and remain reachable by URL, so it must not
//! be used as an authorization check.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::MenuError;
use super::generator::MenuItem;

/// Allowlist compiled into the binary.
const BUILTIN_ALLOWLIST: &str = include_str!("../../config/menu_allowlist.toml");

/// Rule for one menu key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowRule {
    /// The item and its entire subtree are shown.
    All,
    /// The item is shown; its children are filtered by the nested list.
    Nested(Allowlist),
}

/// Mapping from menu key to rule, for one level of the menu tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Allowlist(BTreeMap<String, AllowRule>);

impl Allowlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// The allowlist shipped with the console.
    pub fn builtin() -> Result<Self, MenuError> {
        Self::from_toml(BUILTIN_ALLOWLIST)
    }

    /// Parse an allowlist from TOML: `true` allows a key with its subtree,
    /// a table restricts its children, `false` is the same as absent.
    pub fn from_toml(source: &str) -> Result<Self, MenuError> {
        Ok(toml::from_str(source)?)
    }

    /// Allow `key` with its whole subtree.
    pub fn allow(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), AllowRule::All);
        self
    }

    /// Allow `key`, restricting its children to `children`.
    pub fn nest(mut self, key: impl Into<String>, children: Allowlist) -> Self {
        self.0.insert(key.into(), AllowRule::Nested(children));
        self
    }

    pub fn rule(&self, key: &str) -> Option<&AllowRule> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only the items this level allows, recursing into nested rules.
    pub fn filter(&self, menus: &[MenuItem]) -> Vec<MenuItem> {
        menus
            .iter()
            .filter_map(|menu| match self.0.get(&menu.key)? {
                AllowRule::All => Some(menu.clone()),
                AllowRule::Nested(nested) => Some(MenuItem {
                    key: menu.key.clone(),
                    title: menu.title.clone(),
                    icon: menu.icon.clone(),
                    order: menu.order,
                    children: nested.filter(&menu.children),
                }),
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRule {
    Flag(bool),
    Nested(BTreeMap<String, RawRule>),
}

fn from_raw(raw: BTreeMap<String, RawRule>) -> Allowlist {
    Allowlist(
        raw.into_iter()
            .filter_map(|(key, rule)| match rule {
                RawRule::Flag(true) => Some((key, AllowRule::All)),
                RawRule::Flag(false) => None,
                RawRule::Nested(nested) => Some((key, AllowRule::Nested(from_raw(nested)))),
            })
            .collect(),
    )
}

impl<'de> Deserialize<'de> for Allowlist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, RawRule>::deserialize(deserializer).map(from_raw)
    }
}

impl Serialize for AllowRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AllowRule::All => serializer.serialize_bool(true),
            AllowRule::Nested(nested) => nested.serialize(serializer),
        }
    }
}
