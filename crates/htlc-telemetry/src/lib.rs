//! # HTLC Telemetry
//!
//! Logging and metrics for the HTLC swap engine.
//!
//! ## Components
//!
//! - Tracing subscriber setup (pretty or JSON, `EnvFilter` driven)
//! - Structured logging macros with consistent field names
//! - Prometheus metrics for swap operations and custody flows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use htlc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `htlc-swap` | Service name on log lines |
//! | `HTLC_LOG_LEVEL` | `info` | Log level filter |
//! | `HTLC_JSON_LOGS` | `false` | JSON log output |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, record_operation, register_metrics, time_operation, MetricsHandle,
    AGREEMENTS_OPEN, EVENTS_PUBLISHED, OPERATIONS, TOKENS_LOCKED, TOKENS_RELEASED,
};
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// Prometheus registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_tracing(&config)?;

    Ok(TelemetryGuard {
        config,
        metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    config: TelemetryConfig,
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    /// Configuration telemetry was started with.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Handle to the metrics registry.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry");
    }
}
