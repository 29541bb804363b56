//! Telemetry module
//!
//! Structured logging and run metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{increment, install_recorder, set_gauge, CounterMetric, GaugeMetric};

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::TelemetryConfig;

/// Handle to the installed telemetry; renders metrics at the end of a run
pub struct TelemetryGuard {
    metrics: Option<PrometheusHandle>,
}

impl TelemetryGuard {
    /// Prometheus exposition text for everything recorded so far
    pub fn render_metrics(&self) -> Option<String> {
        self.metrics.as_ref().map(|h| h.render())
    }
}

/// Initialize logging and the metrics recorder
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let format = if config.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(&config.log_level, format)?;

    let metrics = match install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics recorder unavailable");
            None
        }
    };

    Ok(TelemetryGuard { metrics })
}
