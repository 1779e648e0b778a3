use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::{
    opts, register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

/// Requests by dispatch target: preflight | api | admin | info
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "dracin_gateway_requests_total",
            "Total number of inbound requests by dispatch target"
        ),
        &["kind"]
    )
    .unwrap()
});

/// Cache lookups by result: hit | miss | error
pub static CACHE_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "dracin_gateway_cache_lookups_total",
            "Total number of cache lookups by result"
        ),
        &["result"]
    )
    .unwrap()
});

pub static CACHE_WRITE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "dracin_gateway_cache_write_failures_total",
        "Total number of background cache writes that failed"
    ))
    .unwrap()
});

/// Upstream attempts by provider and outcome: success | failure
pub static UPSTREAM_ATTEMPTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "dracin_gateway_upstream_attempts_total",
            "Total number of upstream provider attempts"
        ),
        &["provider", "outcome"]
    )
    .unwrap()
});

pub static ALL_SOURCES_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "dracin_gateway_all_sources_failed_total",
        "Total number of API requests no provider could serve"
    ))
    .unwrap()
});

pub fn gather_metrics() -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}
