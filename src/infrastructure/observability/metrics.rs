//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::Provenance;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("semantic_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record the outcome and latency of a cache query
pub fn record_cache_query(provenance: Provenance, duration: Duration) {
    let labels = [("provenance", provenance.as_str())];

    counter!("semantic_cache_queries_total", &labels).increment(1);
    histogram!("semantic_cache_query_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a single remote generation attempt
pub fn record_generation_attempt(provider: &'static str, status: &'static str) {
    counter!(
        "generation_attempts_total",
        "provider" => provider,
        "status" => status
    )
    .increment(1);
}

/// Record an entry evicted to stay within capacity
pub fn record_eviction() {
    counter!("semantic_cache_evictions_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_metrics_rendered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_cache_query(Provenance::SimilarityHit, Duration::from_millis(5));
            record_eviction();
            record_generation_attempt("huggingface", "unavailable");
        });

        let rendered = handle.render();

        assert!(rendered.contains("semantic_cache_queries_total"));
        assert!(rendered.contains("provenance=\"similarity-hit\""));
        assert!(rendered.contains("semantic_cache_evictions_total"));
        assert!(rendered.contains("status=\"unavailable\""));
    }

    #[test]
    fn test_disabled_metrics_not_initialized() {
        let config = MetricsConfig {
            enabled: false,
            ..Default::default()
        };

        assert!(init_metrics(&config).is_none());
    }
}
