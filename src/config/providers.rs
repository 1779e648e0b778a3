// ============================================================================
// Provider Table
// ============================================================================
//
// Static table of upstream content providers. Loaded once at startup from
// the JSON file named by PROVIDERS_FILE, or the built-in table when unset.
// There is no runtime mutation: changing providers means restarting with a
// new table.
//
// Attempt order is the total order (priority, declaration index) over the
// enabled providers.
//
// Serialized as an object keyed by provider id, in declaration order:
//   { "<id>": { "name", "baseUrl", "enabled", "priority" }, ... }
//
// ============================================================================

use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// One upstream content provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Unique key, echoed in the `X-Source` response header
    pub id: String,
    pub display_name: String,
    /// Absolute origin plus path prefix; the route is appended to it
    pub base_url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lower is tried first
    pub priority: i32,
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_url: impl Into<String>,
        enabled: bool,
        priority: i32,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            base_url: base_url.into(),
            enabled,
            priority,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderConfigError {
    #[error("provider id must not be empty")]
    EmptyId,

    #[error("provider id '{0}' may only contain ASCII letters, digits, '-' and '_'")]
    InvalidId(String),

    #[error("duplicate provider id '{0}'")]
    DuplicateId(String),

    #[error("provider '{id}' has an invalid base URL: {reason}")]
    InvalidBaseUrl { id: String, reason: String },

    #[error("failed to parse provider table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read provider table: {0}")]
    Io(#[from] std::io::Error),
}

/// Validated, immutable provider table in declaration order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderTable {
    providers: Vec<ProviderConfig>,
}

/// One entry of the serialized table; the id is the map key
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceEntry<'a> {
    name: &'a str,
    base_url: &'a str,
    enabled: bool,
    priority: i32,
}

impl Serialize for ProviderTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.providers.iter().map(|provider| {
            (
                provider.id.as_str(),
                SourceEntry {
                    name: &provider.display_name,
                    base_url: &provider.base_url,
                    enabled: provider.enabled,
                    priority: provider.priority,
                },
            )
        }))
    }
}

impl ProviderTable {
    pub fn new(providers: Vec<ProviderConfig>) -> Result<Self, ProviderConfigError> {
        let mut seen = std::collections::HashSet::new();

        for provider in &providers {
            validate_id(&provider.id)?;
            if !seen.insert(provider.id.as_str()) {
                return Err(ProviderConfigError::DuplicateId(provider.id.clone()));
            }
            validate_base_url(provider)?;
        }

        Ok(Self { providers })
    }

    /// Table compiled into the binary, used when no PROVIDERS_FILE is given
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                ProviderConfig::new(
                    "sansekai",
                    "Sansekai Dramabox",
                    "https://api.sansekai.my.id/api/dramabox",
                    true,
                    1,
                ),
                ProviderConfig::new(
                    "dramabos_dramabox",
                    "Dramabos Dramabox",
                    "https://dramabos.asia/api/dramabox",
                    true,
                    2,
                ),
                ProviderConfig::new(
                    "dramabos_reelshort",
                    "Dramabos ReelShort",
                    "https://dramabos.asia/api/reelshort",
                    false,
                    3,
                ),
                ProviderConfig::new(
                    "dramabos_meloshort",
                    "Dramabos MeloShort",
                    "https://dramabos.asia/api/meloshort",
                    false,
                    4,
                ),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProviderConfigError> {
        let providers: Vec<ProviderConfig> = serde_json::from_str(json)?;
        Self::new(providers)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub(crate) fn from_env() -> anyhow::Result<Self> {
        match std::env::var("PROVIDERS_FILE") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)
                .map_err(|e| anyhow::anyhow!("PROVIDERS_FILE '{}': {}", path, e)),
            _ => Ok(Self::builtin()),
        }
    }

    /// Every provider, including disabled ones, in declaration order
    pub fn all(&self) -> &[ProviderConfig] {
        &self.providers
    }

    /// Enabled providers in the order they must be attempted
    pub fn attempt_order(&self) -> Vec<&ProviderConfig> {
        let mut enabled: Vec<(usize, &ProviderConfig)> = self
            .providers
            .iter()
            .enumerate()
            .filter(|(_, provider)| provider.enabled)
            .collect();
        enabled.sort_by_key(|(index, provider)| (provider.priority, *index));
        enabled.into_iter().map(|(_, provider)| provider).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.providers.iter().filter(|p| p.enabled).count()
    }
}

fn validate_id(id: &str) -> Result<(), ProviderConfigError> {
    if id.is_empty() {
        return Err(ProviderConfigError::EmptyId);
    }
    // The id goes out verbatim as a header value
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ProviderConfigError::InvalidId(id.to_string()));
    }
    Ok(())
}

fn validate_base_url(provider: &ProviderConfig) -> Result<(), ProviderConfigError> {
    let invalid = |reason: String| ProviderConfigError::InvalidBaseUrl {
        id: provider.id.clone(),
        reason,
    };

    let url = Url::parse(&provider.base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}
