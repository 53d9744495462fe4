//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Persistence (flush outcomes and duration)
//! - Reconciliation (files discovered vs. already known)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Persistence Metrics
// =============================================================================

/// Flush attempts by result.
pub static LIBRARY_FLUSHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tagr_library_flushes_total", "Catalog backup attempts"),
        &["result"], // "success", "failure", "skipped"
    )
    .unwrap()
});

/// Time spent serializing and writing the catalog.
pub static FLUSH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "tagr_library_flush_duration_seconds",
            "Duration of catalog backups",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
    )
    .unwrap()
});

// =============================================================================
// Reconciliation Metrics
// =============================================================================

/// Files seen by reconciliation.
pub static RECONCILE_FILES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "tagr_reconcile_files_total",
            "Files seen while reconciling the media directory",
        ),
        &["kind"], // "new", "known"
    )
    .unwrap()
});

/// All core metrics, for registration by the server.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(LIBRARY_FLUSHES.clone()),
        Box::new(FLUSH_DURATION.clone()),
        Box::new(RECONCILE_FILES.clone()),
    ]
}
