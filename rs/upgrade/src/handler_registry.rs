//! The registry of migration handlers.
//!
//! Built once at process start from the hosting application's static wiring
//! and handed to the coordinator by value; there is no process-global
//! registry. Whether a node has the handler for a pending plan is exactly
//! what distinguishes "new binary, run the migration" from "old binary, halt
//! and wait for the swap".

use crate::error::{UpgradeError, UpgradeResult};
use keel_types::upgrade::{Plan, VersionMap};
use keel_types::Height;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Error returned by a migration handler. Aborts the upgrade, which is fatal
/// to the block (see [`FatalUpgrade::MigrationFailed`](crate::FatalUpgrade)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationError {
    message: String,
}

impl MigrationError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A migration function: receives the execution height, the plan, and the
/// current version map, and returns the migrated map. Must be deterministic:
/// it runs independently on every node and the results must match bit for
/// bit.
pub type UpgradeHandler =
    Box<dyn Fn(Height, &Plan, VersionMap) -> Result<VersionMap, MigrationError> + Send + Sync>;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, UpgradeHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the migration for the plan named `name`. Registering a name
    /// twice is a wiring defect, reported as
    /// [`UpgradeError::DuplicateHandler`].
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: UpgradeHandler,
    ) -> UpgradeResult<()> {
        match self.handlers.entry(name.into()) {
            Entry::Occupied(entry) => Err(UpgradeError::DuplicateHandler(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(handler);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&UpgradeHandler> {
        self.handlers.get(name)
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn noop_handler() -> UpgradeHandler {
        Box::new(|_height, _plan, versions| Ok(versions))
    }

    #[test]
    fn lookup_of_unregistered_name_is_none() {
        let registry = HandlerRegistry::new();
        assert!(registry.lookup("v2").is_none());
        assert!(!registry.has_handler("v2"));
    }

    #[test]
    fn register_then_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.register("v2", noop_handler()).unwrap();
        assert!(registry.lookup("v2").is_some());
        assert!(registry.has_handler("v2"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register("v2", noop_handler()).unwrap();
        assert_matches!(
            registry.register("v2", noop_handler()),
            Err(UpgradeError::DuplicateHandler(name)) if name == "v2"
        );
        // The original handler survives.
        assert!(registry.has_handler("v2"));
    }

    #[test]
    fn handlers_receive_the_version_map() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                "v2",
                Box::new(|_height, _plan, mut versions: VersionMap| {
                    *versions.entry("bank".to_string()).or_insert(0) += 1;
                    Ok(versions)
                }),
            )
            .unwrap();

        let handler = registry.lookup("v2").unwrap();
        let out = handler(
            Height::new(10),
            &Plan::default(),
            VersionMap::new(),
        )
        .unwrap();
        assert_eq!(out.get("bank"), Some(&1));
    }
}
