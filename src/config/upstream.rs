// ============================================================================
// Upstream Client Configuration
// ============================================================================

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the HTTP client that talks to content providers
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent sent with every upstream request
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn default_user_agent() -> String {
        format!("dracin-gateway/{}", env!("CARGO_PKG_VERSION"))
    }

    pub(crate) fn from_env() -> Self {
        Self {
            timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            user_agent: std::env::var("UPSTREAM_USER_AGENT")
                .ok()
                .filter(|ua| !ua.is_empty())
                .unwrap_or_else(Self::default_user_agent),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: Self::default_user_agent(),
        }
    }
}
