//! Per-component version bookkeeping.
//!
//! Migration handlers receive a [`snapshot`] of this ledger, return an
//! updated map, and the coordinator commits it back with [`restore`]. The
//! ledger does not enforce that versions only move forward; that contract
//! belongs to the handlers that produce the new map (the coordinator logs
//! when a version goes backwards). Once a component appears in the ledger its
//! key is never removed.

use crate::keys;
use keel_interfaces::state_store::{StateReader, StateStore};
use keel_types::upgrade::VersionMap;

/// The component's recorded version, 0 if it never appeared in the ledger.
pub fn get<S: StateReader + ?Sized>(store: &S, component: &str) -> u64 {
    store
        .get(&keys::version_key(component))
        .map(|bytes| keys::decode_u64(&bytes).expect("a component version record is corrupted"))
        .unwrap_or(0)
}

pub fn set<S: StateStore + ?Sized>(store: &mut S, component: &str, version: u64) {
    store.set(keys::version_key(component), keys::encode_u64(version));
}

/// The full ledger as a map.
pub fn snapshot<S: StateReader + ?Sized>(store: &S) -> VersionMap {
    store
        .prefix_iter(keys::VERSION_PREFIX)
        .map(|(key, value)| {
            let component = keys::component_from_version_key(&key)
                .expect("a component version key is corrupted")
                .to_string();
            let version =
                keys::decode_u64(&value).expect("a component version record is corrupted");
            (component, version)
        })
        .collect()
}

/// Writes every entry of `versions` to the ledger. Components present in the
/// ledger but absent from `versions` keep their recorded version; entries are
/// never deleted. Also used at genesis to seed the initial versions.
pub fn restore<S: StateStore + ?Sized>(store: &mut S, versions: &VersionMap) {
    for (component, version) in versions {
        set(store, component, *version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_test_utilities::state::FakeStateStore;
    use maplit::btreemap;

    #[test]
    fn unseen_component_is_version_zero() {
        let store = FakeStateStore::new();
        assert_eq!(get(&store, "bank"), 0);
    }

    #[test]
    fn set_then_get() {
        let mut store = FakeStateStore::new();
        set(&mut store, "bank", 3);
        assert_eq!(get(&store, "bank"), 3);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut store = FakeStateStore::new();
        let versions = btreemap! {
            "bank".to_string() => 2u64,
            "staking".to_string() => 1u64,
        };
        restore(&mut store, &versions);
        assert_eq!(snapshot(&store), versions);
    }

    #[test]
    fn restore_does_not_remove_existing_components() {
        let mut store = FakeStateStore::new();
        set(&mut store, "bank", 2);
        restore(&mut store, &btreemap! { "staking".to_string() => 1u64 });
        assert_eq!(get(&store, "bank"), 2);
        assert_eq!(get(&store, "staking"), 1);
    }
}
