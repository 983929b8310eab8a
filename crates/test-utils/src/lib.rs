//! Meridian test utilities.
//!
//! Fixtures for integration testing: configuration, the server route
//! payload the console receives, IPO API responses, and JSON assertion
//! helpers.

use std::time::Duration;

use meridian_kernel::Config;
use meridian_kernel::route::{RouteNode, ViewRef, container_layout};
use serde_json::{Value as JsonValue, json};
use url::Url;

/// Configuration pointing the API client at `api_base_url`, with short
/// timeouts and no retry delay.
pub fn test_config(api_base_url: Url) -> Config {
    Config {
        port: 0,
        api_base_url,
        api_timeout: Duration::from_secs(5),
        api_retry_delay: Duration::ZERO,
        cors_allowed_origins: vec!["*".to_string()],
        load_remote_routes: false,
    }
}

/// Configuration for tests that never reach the remote API.
pub fn offline_config() -> Config {
    // Port 9 (discard) is never served in test environments.
    let url = Url::parse("http://127.0.0.1:9/api/").unwrap_or_else(|e| panic!("{e}"));
    test_config(url)
}

/// Server route records as delivered by `get-async-routes`.
///
/// The personal-center children carry no component and are dropped during
/// conversion.
pub fn server_route_records() -> JsonValue {
    json!([
        {
            "path": "/home",
            "component": "/home/index.tsx",
            "handle": {"icon": "HomeOutlined", "title": "common.menu.home", "order": 1}
        },
        {
            "path": "/ai-assistant",
            "handle": {"icon": "RobotOutlined", "title": "common.menu.aiAssistant", "order": 2},
            "children": [
                {
                    "path": "/ai-assistant/qa",
                    "component": "/ai-assistant/qa/index.tsx",
                    "handle": {"icon": "CommentOutlined", "title": "common.menu.qa"}
                },
                {
                    "path": "/ai-assistant/documents",
                    "component": "/ai-assistant/documents/index.tsx",
                    "handle": {"icon": "FileTextOutlined", "title": "common.menu.documents"}
                }
            ]
        },
        {
            "path": "/system",
            "handle": {
                "icon": "SettingOutlined",
                "title": "common.menu.system",
                "order": 5,
                "roles": ["admin"]
            },
            "children": [
                {
                    "path": "/system/audit",
                    "component": "/system/audit/index.tsx",
                    "handle": {
                        "icon": "AuditOutlined",
                        "title": "common.menu.audit",
                        "roles": ["admin"],
                        "permissions": ["permission:button:export"]
                    }
                }
            ]
        },
        {
            "path": "/personal-center",
            "handle": {"order": 7, "title": "common.menu.personalCenter"},
            "children": [
                {"path": "/personal-center/my-profile", "handle": {"title": "common.menu.profile"}},
                {"path": "/personal-center/settings", "handle": {"title": "common.menu.settings"}}
            ]
        }
    ])
}

/// `get-async-routes` success envelope around [`server_route_records`].
pub fn async_routes_envelope() -> JsonValue {
    json!({
        "status": "success",
        "data": server_route_records()
    })
}

/// One IPO row in API shape.
pub fn ipo_record(id: i64, ipo_date: &str) -> JsonValue {
    json!({
        "id": id,
        "stock_code": format!("{:06}", 600_000 + id),
        "name": format!("Company {id}"),
        "market": "A股",
        "exchange": "上交所",
        "listing_status": "approved",
        "ipo_date": ipo_date,
        "source": "lixingren"
    })
}

/// One page of the IPO list endpoint.
pub fn ipo_page(records: Vec<JsonValue>, total: u64, page: u32, page_size: u32) -> JsonValue {
    json!({
        "data": records,
        "total": total,
        "page": page,
        "page_size": page_size,
        "filters": {}
    })
}

/// A small two-level tree: `/a` with one child, `/b` as a leaf.
pub fn sample_tree() -> Vec<RouteNode> {
    vec![
        RouteNode::layout(
            "/a",
            container_layout(),
            vec![RouteNode::leaf("/a/x", ViewRef::new("pages/a/x")).title("X")],
        )
        .title("A")
        .order(2),
        RouteNode::leaf("/b", ViewRef::new("pages/b")).title("B").order(1),
    ]
}

/// Assertion helpers for JSON responses.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Keys of a serialized menu list, top level only.
    pub fn menu_keys(menus: &Value) -> Vec<String> {
        menus
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|m| m["key"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Assert that a serialized flat route index holds `id`.
    pub fn has_route(flat: &Value, id: &str) {
        assert!(
            flat.get(id).is_some(),
            "Expected route '{id}' in flat index, got keys: {:?}",
            flat.as_object().map(|o| o.keys().collect::<Vec<_>>())
        );
    }
}
