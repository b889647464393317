use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and register the evaluator metrics.
/// `render()` on the returned handle produces the scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("decisions_total").absolute(0);
    counter!("decisions_executable").absolute(0);
    counter!("decisions_failed").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("decision_latency_seconds").record(0.0);

    handle
}
