//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the tagr server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog state (collected dynamically)
//! - Core persistence and reconciliation metrics (registered from `tagr_core`)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tagr_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tagr_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "tagr_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Entries in the catalog.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("tagr_catalog_entries", "Number of entries in the catalog").unwrap()
});

/// Unsaved writes pending (1 = dirty, 0 = clean).
pub static CATALOG_DIRTY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "tagr_catalog_dirty",
        "Whether the catalog has writes not yet backed up",
    )
    .unwrap()
});

/// Persistence health (1 = last backup succeeded).
pub static PERSISTENCE_HEALTHY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "tagr_persistence_healthy",
        "Whether the last catalog backup succeeded",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        Box::new(CATALOG_ENTRIES.clone()),
        Box::new(CATALOG_DIRTY.clone()),
        Box::new(PERSISTENCE_HEALTHY.clone()),
    ];

    for metric in collectors.into_iter().chain(tagr_core::metrics::all_metrics()) {
        if let Err(e) = registry.register(metric) {
            error!("Failed to register metric: {}", e);
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let catalog = state.catalog();
    CATALOG_ENTRIES.set(catalog.len() as i64);
    CATALOG_DIRTY.set(i64::from(catalog.is_dirty()));
    PERSISTENCE_HEALTHY.set(i64::from(state.health().is_healthy()));
}

static ENTRY_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/api/v1/entries/[^/]+$").unwrap());
static FILE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/(video-file|static)/.+$").unwrap());

/// Normalize a path for metric labels (collapse per-file paths).
pub fn normalize_path(path: &str) -> String {
    if ENTRY_PATH.is_match(path) {
        return "/api/v1/entries/{file}".to_string();
    }
    FILE_PATH.replace(path, "/$1/{file}").into_owned()
}
