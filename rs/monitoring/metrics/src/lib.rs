//! Prometheus plumbing shared by keel components.

pub mod buckets;

use prometheus::core::Collector;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};

/// A wrapper around `prometheus::Registry` with constructors that register
/// the metric as they create it.
///
/// Creation panics on malformed names and duplicate registrations; both are
/// wiring defects caught the first time a process starts, not runtime
/// conditions.
#[derive(Clone)]
pub struct MetricsRegistry(Registry);

impl MetricsRegistry {
    pub fn new() -> Self {
        MetricsRegistry(Registry::new())
    }

    /// The underlying registry, for exposition endpoints and test helpers.
    pub fn prometheus_registry(&self) -> &Registry {
        &self.0
    }

    pub fn int_counter(&self, name: &str, help: &str) -> IntCounter {
        self.register(
            IntCounter::with_opts(Opts::new(name, help))
                .unwrap_or_else(|err| panic!("failed to create metric {}: {}", name, err)),
        )
    }

    pub fn int_counter_vec(&self, name: &str, help: &str, label_names: &[&str]) -> IntCounterVec {
        self.register(
            IntCounterVec::new(Opts::new(name, help), label_names)
                .unwrap_or_else(|err| panic!("failed to create metric {}: {}", name, err)),
        )
    }

    pub fn int_gauge(&self, name: &str, help: &str) -> IntGauge {
        self.register(
            IntGauge::with_opts(Opts::new(name, help))
                .unwrap_or_else(|err| panic!("failed to create metric {}: {}", name, err)),
        )
    }

    pub fn int_gauge_vec(&self, name: &str, help: &str, label_names: &[&str]) -> IntGaugeVec {
        self.register(
            IntGaugeVec::new(Opts::new(name, help), label_names)
                .unwrap_or_else(|err| panic!("failed to create metric {}: {}", name, err)),
        )
    }

    pub fn histogram(&self, name: &str, help: &str, buckets: Vec<f64>) -> Histogram {
        self.register(
            Histogram::with_opts(HistogramOpts::new(name, help).buckets(buckets))
                .unwrap_or_else(|err| panic!("failed to create metric {}: {}", name, err)),
        )
    }

    pub fn histogram_vec(
        &self,
        name: &str,
        help: &str,
        buckets: Vec<f64>,
        label_names: &[&str],
    ) -> HistogramVec {
        self.register(
            HistogramVec::new(HistogramOpts::new(name, help).buckets(buckets), label_names)
                .unwrap_or_else(|err| panic!("failed to create metric {}: {}", name, err)),
        )
    }

    fn register<M: Collector + Clone + 'static>(&self, metric: M) -> M {
        self.0
            .register(Box::new(metric.clone()))
            .unwrap_or_else(|err| panic!("failed to register metric: {}", err));
        metric
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_metrics_are_gathered() {
        let registry = MetricsRegistry::new();
        let counter = registry.int_counter("keel_test_total", "A test counter.");
        counter.inc();
        let families = registry.prometheus_registry().gather();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].get_name(), "keel_test_total");
    }

    #[test]
    #[should_panic(expected = "failed to register metric")]
    fn duplicate_registration_panics() {
        let registry = MetricsRegistry::new();
        let _ = registry.int_counter("keel_test_total", "A test counter.");
        let _ = registry.int_counter("keel_test_total", "A test counter.");
    }
}
