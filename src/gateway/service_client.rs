// ============================================================================
// Upstream Client
// ============================================================================
//
// HTTP client for content providers.
// Handles:
// - Upstream URL construction (base URL + route + inbound query)
// - A single GET per provider attempt, no retries
// - Classifying the outcome as success (2xx) or failure
//
// The body of a successful response is returned as raw bytes, never decoded.
//
// ============================================================================

use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::config::{ProviderConfig, UpstreamConfig};

/// Why a single provider attempt failed
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for forwarding API requests to content providers
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        // Configure connection pooling and keep-alive
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client })
    }

    /// GET `route` from one provider, forwarding the inbound query
    pub async fn fetch(
        &self,
        provider: &ProviderConfig,
        route: &str,
        query: Option<&str>,
    ) -> Result<Bytes, UpstreamError> {
        let url = build_upstream_url(&provider.base_url, route, query)?;

        tracing::debug!(provider = %provider.id, url = %url, "Fetching from upstream");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

/// Append `route` to the provider's base path and set every inbound query
/// parameter on the result.
///
/// Setting a parameter replaces the first existing pair with that name in
/// place and drops any later duplicates; a new name is appended. Applied in
/// inbound order, so for a repeated inbound key the last value wins.
pub fn build_upstream_url(
    base_url: &str,
    route: &str,
    query: Option<&str>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    let path = format!("{}{}", url.path().trim_end_matches('/'), route);
    url.set_path(&path);

    let inbound: Vec<(String, String)> = match query {
        Some(query) => form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        None => Vec::new(),
    };
    if inbound.is_empty() {
        return Ok(url);
    }

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in inbound {
        set_query_pair(&mut pairs, key, value);
    }

    url.query_pairs_mut().clear().extend_pairs(pairs.iter());

    Ok(url)
}

fn set_query_pair(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter().position(|(existing, _)| *existing == key) {
        Some(first) => {
            pairs[first].1 = value;
            let mut index = 0;
            pairs.retain(|(existing, _)| {
                let keep = index <= first || *existing != key;
                index += 1;
                keep
            });
        }
        None => pairs.push((key, value)),
    }
}
