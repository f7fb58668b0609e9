use keel_metrics::buckets::decimal_buckets;
use keel_metrics::MetricsRegistry;
use prometheus::{Histogram, IntCounter, IntGauge, IntGaugeVec};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// What the height gate is currently doing, exported through the
/// `upgrade_gate_status` gauge.
#[derive(Copy, Clone, Eq, PartialEq, Debug, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum GateStatus {
    /// No plan is pending.
    Idle,
    /// A plan is pending at a future height.
    Pending,
    /// The gate stopped the node; it is awaiting a binary swap.
    Halted,
}

pub(crate) struct UpgradeMetrics {
    pub(crate) scheduled_total: IntCounter,
    pub(crate) cancelled_total: IntCounter,
    pub(crate) applied_total: IntCounter,
    pub(crate) pending_height: IntGauge,
    pub(crate) protocol_version: IntGauge,
    pub(crate) apply_duration: Histogram,
    gate_status: IntGaugeVec,
}

impl UpgradeMetrics {
    pub fn new(metrics_registry: &MetricsRegistry) -> Self {
        Self {
            scheduled_total: metrics_registry.int_counter(
                "upgrade_scheduled_total",
                "Number of upgrade plans accepted by the scheduler.",
            ),
            cancelled_total: metrics_registry.int_counter(
                "upgrade_cancelled_total",
                "Number of pending upgrade plans cancelled before execution.",
            ),
            applied_total: metrics_registry.int_counter(
                "upgrade_applied_total",
                "Number of upgrades applied by this node.",
            ),
            pending_height: metrics_registry.int_gauge(
                "upgrade_pending_height",
                "Target height of the pending upgrade plan, 0 if none.",
            ),
            protocol_version: metrics_registry.int_gauge(
                "upgrade_protocol_version",
                "The protocol version as of the last applied upgrade.",
            ),
            apply_duration: metrics_registry.histogram(
                "upgrade_apply_duration_seconds",
                "Time spent applying an upgrade, in seconds.",
                // 1ms - 50s
                decimal_buckets(-3, 1),
            ),
            gate_status: metrics_registry.int_gauge_vec(
                "upgrade_gate_status",
                "Current status of the upgrade height gate.",
                &["status"],
            ),
        }
    }

    /// Sets the gauge for `status` and clears all others.
    pub fn observe_gate_status(&self, status: GateStatus) {
        for s in GateStatus::iter() {
            self.gate_status
                .with_label_values(&[s.as_ref()])
                .set((s == status) as i64);
        }
    }
}
