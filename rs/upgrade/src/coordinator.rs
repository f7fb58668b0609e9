//! The upgrade coordinator: scheduling, the per-block height gate, and the
//! read-side queries behind the host's query surface.

use crate::error::{FatalUpgrade, UpgradeError, UpgradeResult};
use crate::handler_registry::{HandlerRegistry, UpgradeHandler};
use crate::metrics::{GateStatus, UpgradeMetrics};
use crate::{client_state, completed, keys, plan_store, upgrade_info, version_ledger};
use keel_config::upgrade::Config;
use keel_interfaces::state_store::{StateReader, StateStore};
use keel_interfaces::upgrade::{ProtocolVersionSetter, UpgradedClientStateProvider};
use keel_logger::{error, info, warn, NodeLogger};
use keel_metrics::MetricsRegistry;
use keel_types::upgrade::{Plan, PlanValidationError, VersionMap};
use keel_types::{Height, Time};
use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// The decision the height gate took for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockAction {
    /// No upgrade executed at this height; the block proceeds normally.
    NoUpgrade,

    /// The pending upgrade executed; the block proceeds with migrated state
    /// already visible to every component that runs after the gate.
    Applied { name: String, height: Height },

    /// An upgrade is due but this binary has no handler for it: the node
    /// must stop at this height and wait for the binary swap. This is a
    /// successful outcome, not an error; the host must report it distinctly
    /// from a crash ("awaiting upgrade") and must not process further
    /// blocks. `marker_written` records whether the on-disk marker for the
    /// process manager could be written.
    Halted { height: Height, marker_written: bool },
}

/// Orchestrates scheduling, the per-block height gate, handler invocation,
/// version-ledger updates, and halt signaling.
///
/// Exactly one instance exists per node process. All methods are synchronous
/// and must be called from the single block-processing thread; the
/// coordinator performs no internal locking.
pub struct UpgradeCoordinator {
    registry: HandlerRegistry,
    skip_heights: BTreeSet<Height>,
    upgrade_info_path: PathBuf,
    client_state_provider: Arc<dyn UpgradedClientStateProvider>,
    version_setter: Option<Arc<dyn ProtocolVersionSetter>>,
    metrics: UpgradeMetrics,
    log: NodeLogger,
}

impl UpgradeCoordinator {
    pub fn new(
        config: &Config,
        registry: HandlerRegistry,
        client_state_provider: Arc<dyn UpgradedClientStateProvider>,
        version_setter: Option<Arc<dyn ProtocolVersionSetter>>,
        metrics_registry: &MetricsRegistry,
        log: NodeLogger,
    ) -> Self {
        if !config.skip_heights.is_empty() {
            warn!(
                log,
                "Upgrade coordinator configured with skip heights";
                "skip_heights" => format!("{:?}", config.skip_heights),
            );
        }
        Self {
            registry,
            skip_heights: config.skip_heights.iter().copied().map(Height::from).collect(),
            upgrade_info_path: config
                .upgrade_info_dir
                .join(upgrade_info::UPGRADE_INFO_FILENAME),
            client_state_provider,
            version_setter,
            metrics: UpgradeMetrics::new(metrics_registry),
            log,
        }
    }

    // ---------------------------------------------------------------------
    // Scheduling, driven by governance.

    /// Schedules `plan`, replacing any pending plan (last write wins).
    ///
    /// Fails if the plan is malformed, if its height is not strictly after
    /// `current_height`, or if an upgrade with the same name already
    /// executed. On failure nothing is mutated.
    pub fn schedule<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        current_height: Height,
        plan: Plan,
    ) -> UpgradeResult<()> {
        plan.validate()?;
        if plan.height <= current_height {
            return Err(UpgradeError::InvalidPlan(
                PlanValidationError::HeightNotInFuture {
                    plan_height: plan.height,
                    current_height,
                },
            ));
        }
        if let Some(completed_at) = completed::done_height(store, &plan.name) {
            return Err(UpgradeError::AlreadyCompleted {
                name: plan.name,
                completed_at,
            });
        }

        if let Some(previous) = plan_store::pending(store) {
            info!(
                self.log,
                "Replacing pending upgrade plan";
                "previous" => %previous,
                "new" => %plan,
            );
        }
        plan_store::set_pending(store, &plan);

        self.metrics.scheduled_total.inc();
        self.metrics.pending_height.set(plan.height.get() as i64);
        self.metrics.observe_gate_status(GateStatus::Pending);
        info!(
            self.log,
            "Upgrade scheduled";
            "name" => %plan.name,
            "height" => plan.height.get(),
            "info" => %plan.info,
        );
        Ok(())
    }

    /// Cancels the pending plan, if any. Returns whether one was removed.
    /// Only meaningful before the plan's height: once the gate applied or
    /// halted, there is nothing pending to cancel.
    pub fn cancel<S: StateStore + ?Sized>(&self, store: &mut S) -> bool {
        match plan_store::clear(store) {
            Some(plan) => {
                self.metrics.cancelled_total.inc();
                self.metrics.pending_height.set(0);
                self.metrics.observe_gate_status(GateStatus::Idle);
                info!(
                    self.log,
                    "Pending upgrade cancelled";
                    "name" => %plan.name,
                    "height" => plan.height.get(),
                );
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // The height gate.

    /// Evaluates the height gate for the block at `height`.
    ///
    /// Must be the first state access of every block, strictly before any
    /// other component's per-block logic, so migrated state is visible to
    /// everything else processing the same block. The host must stop block
    /// processing on `Err(_)` (fatal) and on `Ok(BlockAction::Halted { .. })`
    /// (deliberate stop).
    pub fn begin_block<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        height: Height,
        time: Time,
    ) -> Result<BlockAction, FatalUpgrade> {
        let Some(plan) = plan_store::pending(store) else {
            self.metrics.observe_gate_status(GateStatus::Idle);
            return Ok(BlockAction::NoUpgrade);
        };

        if plan.height > height {
            self.metrics.pending_height.set(plan.height.get() as i64);
            self.metrics.observe_gate_status(GateStatus::Pending);
            return Ok(BlockAction::NoUpgrade);
        }

        if plan.height < height {
            // Reaching this point means the gate was not evaluated at the
            // plan's height: a missed block or a corrupted record. Skipping
            // silently would fork this node off the network.
            error!(
                self.log,
                "Pending upgrade height is in the past";
                "plan" => %plan,
                "current_height" => height.get(),
            );
            return Err(FatalUpgrade::PlanHeightInPast {
                plan_height: plan.height,
                current_height: height,
            });
        }

        match self.registry.lookup(&plan.name) {
            Some(handler) => {
                let name = plan.name.clone();
                self.apply(store, height, &plan, handler)?;
                Ok(BlockAction::Applied { name, height })
            }
            None if self.skip_heights.contains(&height) => {
                info!(
                    self.log,
                    "Skipping upgrade at operator-designated height";
                    "name" => %plan.name,
                    "height" => height.get(),
                );
                plan_store::clear(store);
                self.metrics.pending_height.set(0);
                self.metrics.observe_gate_status(GateStatus::Idle);
                Ok(BlockAction::NoUpgrade)
            }
            None => Ok(self.halt(height, time, &plan)),
        }
    }

    /// Executes the migration for `plan`. All store mutations here are part
    /// of the block's single transaction: either the whole sequence commits
    /// or, after a crash, the gate sees the plan still pending and runs the
    /// identical sequence again.
    fn apply<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        height: Height,
        plan: &Plan,
        handler: &UpgradeHandler,
    ) -> Result<(), FatalUpgrade> {
        info!(
            self.log,
            "Applying upgrade";
            "name" => %plan.name,
            "height" => height.get(),
            "info" => %plan.info,
        );
        let started_at = Instant::now();

        let before = version_ledger::snapshot(store);
        let migrated =
            handler(height, plan, before.clone()).map_err(|err| FatalUpgrade::MigrationFailed {
                name: plan.name.clone(),
                height,
                message: err.to_string(),
            })?;
        self.warn_on_lowered_versions(&before, &migrated);
        version_ledger::restore(store, &migrated);

        completed::record(store, &plan.name, height);

        let snapshot = self.client_state_provider.upgraded_client_state(height);
        client_state::put(store, height, &snapshot)?;

        plan_store::clear(store);

        let protocol_version = increment_protocol_version(store);
        if let Some(setter) = &self.version_setter {
            setter.set_protocol_version(protocol_version);
        }

        self.metrics.applied_total.inc();
        self.metrics.pending_height.set(0);
        self.metrics.protocol_version.set(protocol_version as i64);
        self.metrics.observe_gate_status(GateStatus::Idle);
        self.metrics
            .apply_duration
            .observe(started_at.elapsed().as_secs_f64());
        info!(
            self.log,
            "Upgrade applied";
            "name" => %plan.name,
            "height" => height.get(),
            "protocol_version" => protocol_version,
        );
        Ok(())
    }

    fn warn_on_lowered_versions(&self, before: &VersionMap, after: &VersionMap) {
        for (component, version) in after {
            if let Some(previous) = before.get(component) {
                if version < previous {
                    warn!(
                        self.log,
                        "Migration lowered a component version";
                        "component" => %component,
                        "from" => *previous,
                        "to" => *version,
                    );
                }
            }
        }
    }

    fn halt(&self, height: Height, time: Time, plan: &Plan) -> BlockAction {
        let marker_written =
            match upgrade_info::dump_upgrade_info_to_disk(&self.upgrade_info_path, height, plan) {
                Ok(()) => true,
                Err(err) => {
                    error!(
                        self.log,
                        "Failed to write the upgrade marker";
                        "path" => %self.upgrade_info_path.display(),
                        "error" => %err,
                    );
                    false
                }
            };
        self.metrics.observe_gate_status(GateStatus::Halted);
        warn!(
            self.log,
            "UPGRADE NEEDED: halting block processing until the new binary is installed";
            "name" => %plan.name,
            "height" => height.get(),
            "block_time" => %time,
            "info" => %plan.info,
            "marker_written" => marker_written,
        );
        BlockAction::Halted {
            height,
            marker_written,
        }
    }

    // ---------------------------------------------------------------------
    // Read-side queries, consumed by the host's query surface.

    /// The currently pending plan, if any.
    pub fn pending_plan<S: StateReader + ?Sized>(&self, store: &S) -> Option<Plan> {
        plan_store::pending(store)
    }

    /// The height at which the named upgrade executed, if it ever did.
    pub fn applied_height<S: StateReader + ?Sized>(&self, store: &S, name: &str) -> Option<Height> {
        completed::done_height(store, name)
    }

    /// The completed upgrade with the greatest height, or `None` if no
    /// upgrade ever executed. Selection is strictly by height; names do not
    /// sort by recency.
    pub fn last_completed_upgrade<S: StateReader + ?Sized>(
        &self,
        store: &S,
    ) -> Option<(String, Height)> {
        completed::last_completed(store)
    }

    /// The client-state snapshot recorded at `height`, if any.
    pub fn upgraded_client_state<S: StateReader + ?Sized>(
        &self,
        store: &S,
        height: Height,
    ) -> Option<Vec<u8>> {
        client_state::get(store, height)
    }

    /// The protocol version counter; increments by exactly one per applied
    /// upgrade.
    pub fn protocol_version<S: StateReader + ?Sized>(&self, store: &S) -> u64 {
        protocol_version(store)
    }

    /// The full component version ledger.
    pub fn version_map<S: StateReader + ?Sized>(&self, store: &S) -> VersionMap {
        version_ledger::snapshot(store)
    }

    /// Whether `height` is on the operator-supplied skip list.
    pub fn is_skip_height(&self, height: Height) -> bool {
        self.skip_heights.contains(&height)
    }

    /// Reads the halt marker left by a previous run, if one exists.
    pub fn read_upgrade_info_from_disk(&self) -> io::Result<Option<Plan>> {
        upgrade_info::read_upgrade_info_from_disk(&self.upgrade_info_path)
    }
}

fn protocol_version<S: StateReader + ?Sized>(store: &S) -> u64 {
    store
        .get(keys::PROTOCOL_VERSION_KEY)
        .map(|bytes| keys::decode_u64(&bytes).expect("the protocol version record is corrupted"))
        .unwrap_or(0)
}

fn increment_protocol_version<S: StateStore + ?Sized>(store: &mut S) -> u64 {
    let next = protocol_version(store) + 1;
    store.set(keys::PROTOCOL_VERSION_KEY.to_vec(), keys::encode_u64(next));
    next
}
