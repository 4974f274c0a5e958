use crate::models::ActionType;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

static METRICS: OnceLock<Metrics> = OnceLock::new();

struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    document_commands_total: IntCounterVec,
    role_guard_decisions_total: IntCounterVec,
}

impl Metrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;

        let document_commands_total = IntCounterVec::new(
            Opts::new(
                "document_commands_total",
                "Document commands dispatched, by action and outcome",
            ),
            &["action", "outcome"],
        )?;

        let role_guard_decisions_total = IntCounterVec::new(
            Opts::new(
                "role_guard_decisions_total",
                "Role navigation guard decisions",
            ),
            &["decision"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(document_commands_total.clone()))?;
        registry.register(Box::new(role_guard_decisions_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            document_commands_total,
            role_guard_decisions_total,
        })
    }
}

/// Register the process-wide collectors. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }
    let metrics = Metrics::new()?;
    let _ = METRICS.set(metrics);
    Ok(())
}

/// Text exposition of every registered collector.
pub fn get_metrics() -> anyhow::Result<String> {
    let metrics = METRICS
        .get()
        .ok_or_else(|| anyhow::anyhow!("Metrics registry not initialized"))?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn record_http(method: &str, path: &str, status: u16, seconds: f64) {
    if let Some(metrics) = METRICS.get() {
        let status = status.to_string();
        let labels = [method, path, status.as_str()];
        metrics.http_requests_total.with_label_values(&labels).inc();
        metrics
            .http_request_duration_seconds
            .with_label_values(&labels)
            .observe(seconds);
    }
}

pub fn record_command(action: ActionType, outcome: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .document_commands_total
            .with_label_values(&[action.as_str(), outcome])
            .inc();
    }
}

pub fn record_guard(decision: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .role_guard_decisions_total
            .with_label_values(&[decision])
            .inc();
    }
}
