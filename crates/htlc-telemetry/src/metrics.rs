//! Prometheus metrics for the swap engine.
//!
//! All metrics follow the naming convention: `htlc_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., operations_total)
//! - **Gauge**: Value that can go up or down (e.g., agreements_open)
//! - **Histogram**: Distribution of values (e.g., operation_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramVec, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // OPERATION METRICS
    // =========================================================================

    /// Invocations by operation and outcome
    pub static ref OPERATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("htlc_engine_operations_total", "Swap and token invocations"),
        &["operation", "outcome"]  // outcome: ok or the error kind
    ).expect("metric creation failed");

    /// Invocation duration including commit
    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "htlc_engine_operation_duration_seconds",
            "Time spent executing an invocation"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    // =========================================================================
    // AGREEMENT METRICS
    // =========================================================================

    /// Agreements currently in the Locked state
    pub static ref AGREEMENTS_OPEN: IntGauge = IntGauge::new(
        "htlc_agreements_open",
        "Agreements locked and not yet settled"
    ).expect("metric creation failed");

    /// Token units moved into custody by Lock
    pub static ref TOKENS_LOCKED: IntCounter = IntCounter::new(
        "htlc_agreements_tokens_locked_total",
        "Token units moved into custody"
    ).expect("metric creation failed");

    /// Token units released from custody by Unlock or Claim
    pub static ref TOKENS_RELEASED: IntCounterVec = IntCounterVec::new(
        Opts::new("htlc_agreements_tokens_released_total", "Token units released from custody"),
        &["settlement"]  // settlement: unlocked/claimed
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT METRICS
    // =========================================================================

    /// Events delivered to observers after commit
    pub static ref EVENTS_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("htlc_events_published_total", "Events published to observers"),
        &["event"]
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Registry the swap metrics are registered with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OPERATIONS.clone()),
        Box::new(OPERATION_DURATION.clone()),
        Box::new(AGREEMENTS_OPEN.clone()),
        Box::new(TOKENS_LOCKED.clone()),
        Box::new(TOKENS_RELEASED.clone()),
        Box::new(EVENTS_PUBLISHED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing an operation. Observation happens on drop.
pub fn time_operation(operation: &str) -> HistogramTimer {
    HistogramTimer::new(&OPERATION_DURATION.with_label_values(&[operation]))
}

/// Record the outcome of one invocation.
pub fn record_operation(operation: &str, outcome: &str) {
    OPERATIONS.with_label_values(&[operation, outcome]).inc();
}
