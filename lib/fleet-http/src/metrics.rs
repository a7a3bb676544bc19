//! Prometheus metrics for the fleet API

use crate::middleware::{Middleware, MiddlewareContext};
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use tracing::debug;

/// Metric handles share their underlying series, so clones record into the
/// same registry.
#[derive(Clone)]
pub struct MetricsCollector {
    /// Total HTTP requests received
    pub http_requests_total: IntCounterVec,
    /// HTTP request duration in seconds
    pub http_request_duration_seconds: HistogramVec,
    /// HTTP responses by status code
    pub http_responses_total: IntCounterVec,
    /// Requests that failed on the server side
    pub http_errors_total: IntCounter,
    /// Vessels currently held by the registry
    pub vessels_registered: IntGauge,
    /// Closest-port resolutions by winning port
    pub closest_port_resolutions_total: IntCounterVec,
    pub registry: Arc<Registry>,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            ),
            &["method", "route"],
        )?;

        let http_responses_total = IntCounterVec::new(
            Opts::new("http_responses_total", "Total HTTP responses by status"),
            &["status"],
        )?;

        let http_errors_total = IntCounter::new("http_errors_total", "Total HTTP server errors")?;

        let vessels_registered = IntGauge::new(
            "fleet_vessels_registered",
            "Number of vessels currently registered",
        )?;

        let closest_port_resolutions_total = IntCounterVec::new(
            Opts::new(
                "fleet_closest_port_resolutions_total",
                "Closest-port resolutions by resulting port",
            ),
            &["port"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_responses_total.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;
        registry.register(Box::new(vessels_registered.clone()))?;
        registry.register(Box::new(closest_port_resolutions_total.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            http_responses_total,
            http_errors_total,
            vessels_registered,
            closest_port_resolutions_total,
            registry,
        })
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn record_resolution(&self, port_name: &str) {
        self.closest_port_resolutions_total
            .with_label_values(&[port_name])
            .inc();
    }

    pub fn set_vessel_count(&self, count: usize) {
        self.vessels_registered.set(count as i64);
    }
}

/// Records request, response and error metrics
pub struct MetricsMiddleware {
    pub collector: MetricsCollector,
}

impl MetricsMiddleware {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }
}

#[async_trait::async_trait]
impl Middleware for MetricsMiddleware {
    fn name(&self) -> &'static str {
        "MetricsMiddleware"
    }

    async fn on_request(&self, context: &MiddlewareContext) -> Result<()> {
        self.collector
            .http_requests_total
            .with_label_values(&[context.method_label(), &context.route])
            .inc();
        Ok(())
    }

    async fn on_response(&self, context: &MiddlewareContext, status: u16) -> Result<()> {
        debug!("Recording response metrics for {} {} -> {}", context.method, context.route, status);

        self.collector
            .http_responses_total
            .with_label_values(&[&status.to_string()])
            .inc();
        self.collector
            .http_request_duration_seconds
            .with_label_values(&[context.method_label(), &context.route])
            .observe(context.elapsed().as_secs_f64());
        Ok(())
    }

    async fn on_error(&self, _context: &MiddlewareContext, _error: &str) -> Result<()> {
        self.collector.http_errors_total.inc();
        Ok(())
    }
}
