//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    CLASSIFICATIONS_TOTAL, CLASSIFICATION_FAILURES_TOTAL, RENDERS_TOTAL, RENDER_LATENCY,
    VALIDATIONS_TOTAL,
};
use crate::classifier::{ClassifyError, Vendor};
use crate::render::RenderError;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record a finished render call
    pub fn record_render(result: Result<(), &RenderError>, elapsed_secs: f64) {
        let outcome = match result {
            Ok(()) => "ok",
            Err(RenderError::Template { .. }) => "template",
            Err(RenderError::Parse { .. }) => "parse",
            Err(RenderError::SchemaNotFound(_)) | Err(RenderError::SchemaUnavailable { .. }) => {
                "schema"
            }
            Err(RenderError::Validation { .. }) => "validation",
        };
        RENDERS_TOTAL.with_label_values(&[outcome]).inc();
        RENDER_LATENCY.observe(elapsed_secs);
    }

    pub fn record_validation_skipped() {
        VALIDATIONS_TOTAL.with_label_values(&["skipped"]).inc();
    }

    pub fn record_validation(passed: bool) {
        let outcome = if passed { "passed" } else { "failed" };
        VALIDATIONS_TOTAL.with_label_values(&[outcome]).inc();
    }
}

/// Helper struct for recording classification metrics
pub struct ClassifierMetrics;

impl ClassifierMetrics {
    pub fn record_vendor(vendor: Option<Vendor>) {
        let label = vendor.map(|v| v.as_str()).unwrap_or("unknown");
        CLASSIFICATIONS_TOTAL.with_label_values(&[label]).inc();
    }

    pub fn record_failure(error: &ClassifyError) {
        let reason = match error {
            ClassifyError::InvalidNode(_) => "invalid_node",
            ClassifyError::Directory(_) => "directory",
        };
        CLASSIFICATION_FAILURES_TOTAL
            .with_label_values(&[reason])
            .inc();
    }
}
