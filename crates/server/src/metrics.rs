//! Prometheus metrics
//!
//! Counters and histograms go through the `metrics` facade; the Prometheus
//! recorder renders them at `/metrics`. Without an installed recorder the
//! macros are no-ops, which is what tests rely on.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!("intake_turns_total", "Turns processed, by dialog action");
    metrics::describe_counter!(
        "intake_records_created_total",
        "Service requests persisted"
    );
    metrics::describe_counter!(
        "intake_persistence_failures_total",
        "Failed record store writes"
    );
    metrics::describe_counter!(
        "intake_malformed_events_total",
        "Webhook bodies that could not be parsed"
    );
    metrics::describe_histogram!(
        "intake_turn_latency_seconds",
        "Time spent processing one turn"
    );

    Ok(handle)
}

/// Record one processed turn
pub fn record_turn(action: &'static str, latency: Duration) {
    metrics::counter!("intake_turns_total", "action" => action).increment(1);
    metrics::histogram!("intake_turn_latency_seconds").record(latency.as_secs_f64());
}

/// Record a webhook body that never reached the engine
pub fn record_malformed() {
    metrics::counter!("intake_malformed_events_total").increment(1);
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
