//! Prometheus metrics for the Redfish service.
//!
//! - Render metrics (requests and failures by stage, latency)
//! - Validation metrics (outcome per schema check)
//! - Classification metrics (vendor results, lookup failures)

mod helpers;

pub use helpers::{encode_metrics, ClassifierMetrics, RenderMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Histogram, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "redfish";

lazy_static! {
    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Render calls by outcome (ok, template, parse, schema, validation)
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total resource render calls by outcome",
        &["outcome"]
    ).unwrap();

    /// Time from view fetch to returned document
    pub static ref RENDER_LATENCY: Histogram = register_histogram!(
        format!("{}_render_latency_seconds", METRIC_PREFIX),
        "Resource render latency in seconds",
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]
    ).unwrap();

    /// Schema validations by outcome (passed, failed, skipped)
    pub static ref VALIDATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_validations_total", METRIC_PREFIX),
        "Total schema validations by outcome",
        &["outcome"]
    ).unwrap();

    // ============================================================================
    // Classification Metrics
    // ============================================================================

    /// Classification results by vendor ("unknown" when no rule decided)
    pub static ref CLASSIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_vendor_classifications_total", METRIC_PREFIX),
        "Total vendor classifications by resulting vendor",
        &["vendor"]
    ).unwrap();

    /// Classification failures (invalid_node, directory)
    pub static ref CLASSIFICATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_vendor_classification_failures_total", METRIC_PREFIX),
        "Total vendor classification failures by reason",
        &["reason"]
    ).unwrap();
}
