//! Meridian Console Kernel Library
//!
//! Route and menu composition for the console, the cached IPO query layer,
//! and the HTTP surface exposing both. The `meridian` binary serves
//! [`build_router`].

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod menu;
pub mod navigation;
pub mod query;
pub mod route;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use config::Config;
pub use state::AppState;

/// Assemble every route handler with the CORS and trace layers.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config());

    Router::new()
        .merge(routes::health::router())
        .merge(routes::access::router())
        .merge(routes::navigation::router())
        .merge(routes::ipo::router())
        .merge(routes::stock::router())
        .merge(routes::agent::router())
        .merge(routes::system::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    }
}
