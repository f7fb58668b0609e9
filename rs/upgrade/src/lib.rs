//! Coordinated software upgrades for the keel replicated state machine.
//!
//! Network operators schedule a [`Plan`](keel_types::upgrade::Plan) at a
//! future block height; every node independently evaluates the height gate at
//! the start of each block and either applies the registered migration, halts
//! to await a binary swap, or does nothing. Every decision is a pure function
//! of the replicated store content and the block height, so correct nodes
//! cannot diverge.
//!
//! The entry points are [`UpgradeCoordinator`] (scheduling, the per-block
//! gate, queries) and [`HandlerRegistry`] (the application's migration
//! wiring). The leaf modules [`plan_store`], [`version_ledger`],
//! [`completed`], and [`client_state`] define the persisted records the
//! coordinator operates on.

pub mod client_state;
pub mod completed;
pub mod coordinator;
pub mod error;
pub mod handler_registry;
pub mod keys;
mod metrics;
pub mod plan_store;
pub mod upgrade_info;
pub mod version_ledger;

pub use coordinator::{BlockAction, UpgradeCoordinator};
pub use error::{FatalUpgrade, UpgradeError, UpgradeResult};
pub use handler_registry::{HandlerRegistry, MigrationError, UpgradeHandler};
