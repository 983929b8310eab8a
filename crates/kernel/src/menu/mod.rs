//! Navigation menus derived from the route tree.
//!
//! Menus are regenerated whenever the route list changes:
//! - [`generate_menu_items`] projects titled routes into menu items
//! - [`Allowlist`] restricts which of those items are displayed

mod allowlist;
mod generator;

use thiserror::Error;

pub use allowlist::{AllowRule, Allowlist};
pub use generator::{MenuItem, generate_menu_items};

/// Menu configuration errors.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("invalid menu allowlist: {0}")]
    Allowlist(#[from] toml::de::Error),
}
