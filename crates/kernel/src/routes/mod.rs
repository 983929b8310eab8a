//! HTTP route handlers.

pub mod access;
pub mod agent;
pub mod health;
pub mod ipo;
pub mod navigation;
pub mod stock;
pub mod system;
