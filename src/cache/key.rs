//! Cache keys and route-dependent TTLs.

use std::time::Duration;

/// Coarse classification of an upstream route, used only to pick a TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCategory {
    Trending,
    Latest,
    Detail,
    Episodes,
    Search,
    Default,
}

impl RouteCategory {
    /// Classify by substring. Checked in a fixed order, first match wins,
    /// so `/search/trending` is `Trending`.
    pub fn from_route(route: &str) -> Self {
        if route.contains("trending") {
            Self::Trending
        } else if route.contains("latest") {
            Self::Latest
        } else if route.contains("detail") {
            Self::Detail
        } else if route.contains("episode") {
            Self::Episodes
        } else if route.contains("search") {
            Self::Search
        } else {
            Self::Default
        }
    }

    pub fn ttl(self) -> Duration {
        match self {
            Self::Trending | Self::Latest => Duration::from_secs(300),
            Self::Detail | Self::Episodes => Duration::from_secs(600),
            Self::Search => Duration::from_secs(180),
            Self::Default => Duration::from_secs(300),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Latest => "latest",
            Self::Detail => "detail",
            Self::Episodes => "episodes",
            Self::Search => "search",
            Self::Default => "default",
        }
    }
}

/// TTL for a route; independent of the query string
pub fn ttl_for_route(route: &str) -> Duration {
    RouteCategory::from_route(route).ttl()
}

/// `api:<route>:<search>` where `search` is the raw query string including
/// its leading `?`, or empty when the request had no query.
pub fn cache_key(route: &str, search: &str) -> String {
    format!("api:{}:{}", route, search)
}
