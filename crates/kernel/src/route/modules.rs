//! Statically compiled route modules of the console.
//!
//! Each function returns one independently authored fragment; titles are
//! i18n keys resolved by the client.

use super::node::{RouteNode, ViewRef, container_layout};
use super::table::RouteTableBuilder;

/// Top-level menu positions.
pub mod order {
    pub const HOME: i32 = 1;
    pub const AI_ASSISTANT: i32 = 2;
    pub const STOCK_DATA: i32 = 3;
    pub const IPO: i32 = 4;
    pub const SYSTEM: i32 = 5;
    pub const ABOUT: i32 = 6;
    pub const PERSONAL_CENTER: i32 = 7;
}

const CRUD_PERMISSIONS: [&str; 3] = [
    "permission:button:add",
    "permission:button:update",
    "permission:button:delete",
];

fn page(module: &str) -> ViewRef {
    ViewRef::new(format!("pages/{module}"))
}

pub fn home() -> Vec<RouteNode> {
    vec![
        RouteNode::layout(
            "/home",
            container_layout(),
            vec![
                RouteNode::index(page("home"))
                    .title("common.menu.home")
                    .icon("HomeOutlined"),
            ],
        )
        .title("common.menu.home")
        .icon("HomeOutlined")
        .order(order::HOME),
    ]
}

pub fn ai_assistant() -> Vec<RouteNode> {
    let pages = [
        ("smart-table", "common.menu.smartTable", "TableOutlined"),
        ("free-style", "common.menu.freeStyle", "MessageOutlined"),
        ("free-style-cards", "common.menu.freeStyleCards", "AppstoreOutlined"),
        ("qa", "common.menu.qa", "CommentOutlined"),
        ("documents", "common.menu.documents", "FileTextOutlined"),
        ("sessions", "common.menu.sessions", "HistoryOutlined"),
    ];

    let children = pages
        .into_iter()
        .map(|(slug, title, icon)| {
            RouteNode::leaf(
                format!("/ai-assistant/{slug}"),
                page(&format!("ai-assistant/{slug}")),
            )
            .title(title)
            .icon(icon)
        })
        .collect();

    vec![
        RouteNode::layout("/ai-assistant", container_layout(), children)
            .title("common.menu.aiAssistant")
            .icon("RobotOutlined")
            .order(order::AI_ASSISTANT),
    ]
}

pub fn stock_data() -> Vec<RouteNode> {
    vec![
        RouteNode::layout(
            "/stock-data",
            container_layout(),
            vec![
                RouteNode::leaf("/stock-data/stocks", page("stock-data/stocks"))
                    .title("common.menu.stocks")
                    .icon("StockOutlined"),
                RouteNode::leaf("/stock-data/ipo", page("ipo"))
                    .title("common.menu.ipo")
                    .icon("RiseOutlined"),
                RouteNode::leaf("/stock-data/shareholders", page("stock-data/shareholders"))
                    .title("common.menu.shareholders")
                    .icon("TeamOutlined"),
            ],
        )
        .title("common.menu.stockData")
        .icon("LineChartOutlined")
        .order(order::STOCK_DATA),
    ]
}

pub fn ipo() -> Vec<RouteNode> {
    vec![
        RouteNode::layout(
            "/ipo",
            container_layout(),
            vec![
                RouteNode::leaf("/ipo/list", page("ipo"))
                    .title("common.menu.ipoList")
                    .icon("UnorderedListOutlined")
                    .roles(["admin", "user"]),
            ],
        )
        .title("common.menu.ipoData")
        .icon("StockOutlined")
        .order(order::IPO)
        .roles(["admin", "user"]),
    ]
}

pub fn system() -> Vec<RouteNode> {
    let managed = [
        ("user", "common.menu.user", "UserOutlined"),
        ("role", "common.menu.role", "TeamOutlined"),
        ("menu", "common.menu.menu", "MenuOutlined"),
        ("dept", "common.menu.dept", "ApartmentOutlined"),
    ];
    let tools = [
        ("data-sync", "sync", "common.menu.dataSync", "SyncOutlined"),
        ("cache", "cache", "common.menu.cache", "DatabaseOutlined"),
        ("monitor", "monitor", "common.menu.monitor", "DashboardOutlined"),
    ];

    let mut children: Vec<RouteNode> = managed
        .into_iter()
        .map(|(slug, title, icon)| {
            let node = RouteNode::leaf(format!("/system/{slug}"), page(&format!("system/{slug}")))
                .title(title)
                .icon(icon)
                .roles(["admin"])
                .permissions(CRUD_PERMISSIONS);
            if slug == "dept" {
                node.keep_alive(false)
            } else {
                node
            }
        })
        .collect();

    children.extend(tools.into_iter().map(|(slug, module, title, icon)| {
        RouteNode::leaf(format!("/system/{slug}"), page(&format!("system/{module}")))
            .title(title)
            .icon(icon)
            .roles(["admin"])
    }));

    vec![
        RouteNode::layout("/system", container_layout(), children)
            .title("common.menu.system")
            .icon("SettingOutlined")
            .order(order::SYSTEM)
            .roles(["admin"]),
    ]
}

pub fn about() -> Vec<RouteNode> {
    vec![
        RouteNode::layout(
            "/about",
            container_layout(),
            vec![
                RouteNode::index(page("about"))
                    .title("common.menu.about")
                    .icon("CopyrightOutlined"),
            ],
        )
        .title("common.menu.about")
        .icon("CopyrightOutlined")
        .order(order::ABOUT),
    ]
}

pub fn personal_center() -> Vec<RouteNode> {
    vec![
        RouteNode::layout(
            "/personal-center",
            container_layout(),
            vec![
                RouteNode::leaf(
                    "/personal-center/my-profile",
                    page("personal-center/my-profile"),
                )
                .title("common.menu.profile")
                .icon("ProfileCardIcon"),
                RouteNode::leaf("/personal-center/settings", page("personal-center/settings"))
                    .title("common.menu.settings")
                    .icon("RiUserSettingsLine"),
            ],
        )
        .title("common.menu.personalCenter")
        .icon("RiAccountCircleLine")
        .order(order::PERSONAL_CENTER),
    ]
}

/// The complete static route table.
pub fn static_routes() -> Vec<RouteNode> {
    RouteTableBuilder::new()
        .fragment("home", home())
        .fragment("ai-assistant", ai_assistant())
        .fragment("stock-data", stock_data())
        .fragment("ipo", ipo())
        .fragment("system", system())
        .fragment("about", about())
        .fragment("personal-center", personal_center())
        .build()
}
