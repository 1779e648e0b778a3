// ============================================================================
// Cache Store Configuration
// ============================================================================

/// Which key-value store backs the response cache
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    /// Shared Redis instance, entries expire through `SET .. EX`
    Redis,
    /// Process-local map, entries expire on read
    Memory,
    /// No caching: every lookup misses and writes are dropped
    Disabled,
}

impl std::str::FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "none" | "disabled" | "off" => Ok(Self::Disabled),
            _ => anyhow::bail!(
                "Invalid cache backend: {}. Must be 'redis', 'memory' or 'none'",
                s
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: Option<String>,
}

impl CacheConfig {
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        let backend: CacheBackend = std::env::var("CACHE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;
        let redis_url = std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty());

        if backend == CacheBackend::Redis && redis_url.is_none() {
            anyhow::bail!("REDIS_URL must be set when CACHE_BACKEND=redis");
        }

        Ok(Self { backend, redis_url })
    }
}
