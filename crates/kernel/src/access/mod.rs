//! Access control data: effective routes, flat index, and filtered menus.
//!
//! [`AccessState`] transitions are pure functions of an [`AccessBaseline`];
//! [`AccessStore`] applies them and performs the side effects (publishing
//! to subscribers and registering routes for navigation).
//!
//! Menu filtering is presentation only. A route hidden from the menu is
//! still in `route_list` and `flat_route_list`; authorization must check
//! route roles and permissions instead.

mod state;
mod store;

pub use state::{AccessBaseline, AccessState};
pub use store::AccessStore;
