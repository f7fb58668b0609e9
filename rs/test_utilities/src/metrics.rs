//! Helpers to read metric values back in tests.

use keel_metrics::MetricsRegistry;
use prometheus::proto::MetricFamily;
use std::collections::BTreeMap;

fn family(families: &[MetricFamily], name: &str) -> Option<MetricFamily> {
    families.iter().find(|f| f.get_name() == name).cloned()
}

/// Returns the value of the int counter `name`, if registered.
pub fn fetch_int_counter(registry: &MetricsRegistry, name: &str) -> Option<u64> {
    family(&registry.prometheus_registry().gather(), name)
        .map(|f| f.get_metric()[0].get_counter().get_value() as u64)
}

/// Returns the value of the int gauge `name`, if registered.
pub fn fetch_int_gauge(registry: &MetricsRegistry, name: &str) -> Option<i64> {
    family(&registry.prometheus_registry().gather(), name)
        .map(|f| f.get_metric()[0].get_gauge().get_value() as i64)
}

/// Returns the values of the labeled int gauge `name`, keyed by label
/// values in label-name order.
pub fn fetch_int_gauge_vec(registry: &MetricsRegistry, name: &str) -> BTreeMap<Vec<String>, i64> {
    family(&registry.prometheus_registry().gather(), name)
        .map(|f| {
            f.get_metric()
                .iter()
                .map(|m| {
                    let labels = m
                        .get_label()
                        .iter()
                        .map(|l| l.get_value().to_string())
                        .collect();
                    (labels, m.get_gauge().get_value() as i64)
                })
                .collect()
        })
        .unwrap_or_default()
}
