//! Prometheus metrics for webtester
//!
//! Exposes one histogram, `webtester_http_duration_seconds`, labelled by the
//! route that served the request.

use std::sync::Arc;

use prometheus::{
    self, Encoder, HistogramOpts, HistogramTimer, HistogramVec, Registry, TextEncoder,
};

/// Label used for requests no route matched.
pub const UNMATCHED: &str = "unmatched";

/// Metrics registry
///
/// Thread-safe; histogram observations are atomic, so concurrent requests
/// never lose updates.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    /// Request duration in seconds, by route path
    pub http_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Create a new registry with the webtester metrics registered
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "webtester_http_duration_seconds",
                "Duration of HTTP requests.",
            ),
            &["path"],
        )?;
        registry.register(Box::new(http_duration_seconds.clone()))?;

        Ok(Self { registry, http_duration_seconds })
    }

    /// Start a timer that observes into the `path` series when dropped
    pub fn start_timer(&self, path: &str) -> HistogramTimer {
        self.http_duration_seconds
            .with_label_values(&[path])
            .start_timer()
    }

    /// Number of observations recorded for `path`
    pub fn observation_count(&self, path: &str) -> u64 {
        self.http_duration_seconds
            .with_label_values(&[path])
            .get_sample_count()
    }

    /// Content type of [`Metrics::encode`] output
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Encode all metrics to Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Failed to encode metrics as UTF-8: {}", e))
        })
    }
}

/// Shared metrics handle
pub type SharedMetrics = Arc<Metrics>;

/// Create a new shared metrics instance
pub fn create_metrics() -> Result<SharedMetrics, prometheus::Error> {
    Ok(Arc::new(Metrics::new()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_observes_on_drop() {
        let metrics = Metrics::new().expect("should create metrics");

        {
            let _timer = metrics.start_timer("/healthz");
        }
        drop(metrics.start_timer("/healthz"));
        drop(metrics.start_timer("/"));

        assert_eq!(metrics.observation_count("/healthz"), 2);
        assert_eq!(metrics.observation_count("/"), 1);
    }

    #[test]
    fn test_encode_contains_histogram() {
        let metrics = Metrics::new().expect("should create metrics");
        drop(metrics.start_timer("/status/{status_code}"));

        let output = metrics.encode().expect("should encode metrics");
        assert!(output.contains("# TYPE webtester_http_duration_seconds histogram"));
        assert!(output.contains(
            "webtester_http_duration_seconds_count{path=\"/status/{status_code}\"} 1"
        ));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = Metrics::new().expect("should create metrics");
        let b = Metrics::new().expect("should create metrics");
        drop(a.start_timer("/"));

        assert_eq!(a.observation_count("/"), 1);
        assert_eq!(b.observation_count("/"), 0);
    }
}
