//! Client-state snapshots bridging cross-chain light clients across an
//! upgrade.
//!
//! A snapshot is recorded exactly once, in the same store transaction as the
//! migration that executes at its height, and is read many times afterwards
//! by client-update requests from counterparty chains. Snapshots are never
//! mutated; the only removal path is the administrative [`delete`].

use crate::error::FatalUpgrade;
use crate::keys;
use keel_interfaces::state_store::{StateReader, StateStore};
use keel_types::Height;

/// Records the snapshot for `height`. Write-once: a second write at the same
/// height means the surrounding pipeline re-entered a committed height, which
/// is fatal.
pub fn put<S: StateStore + ?Sized>(store: &mut S, height: Height, state: &[u8]) -> Result<(), FatalUpgrade> {
    let key = keys::client_state_key(height);
    if store.get(&key).is_some() {
        return Err(FatalUpgrade::ClientStateAlreadyRecorded(height));
    }
    store.set(key, state.to_vec());
    Ok(())
}

pub fn get<S: StateReader + ?Sized>(store: &S, height: Height) -> Option<Vec<u8>> {
    store.get(&keys::client_state_key(height))
}

/// Administrative purge; a no-op if nothing is recorded at `height`.
pub fn delete<S: StateStore + ?Sized>(store: &mut S, height: Height) {
    store.delete(&keys::client_state_key(height));
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use keel_test_utilities::state::FakeStateStore;

    #[test]
    fn get_is_none_before_put() {
        let store = FakeStateStore::new();
        assert_eq!(get(&store, Height::new(100)), None);
    }

    #[test]
    fn put_once_then_get() {
        let mut store = FakeStateStore::new();
        put(&mut store, Height::new(100), b"ibc client state").unwrap();
        assert_eq!(
            get(&store, Height::new(100)),
            Some(b"ibc client state".to_vec())
        );
    }

    #[test]
    fn second_put_at_same_height_is_fatal_and_preserves_first() {
        let mut store = FakeStateStore::new();
        put(&mut store, Height::new(100), b"first").unwrap();
        assert_matches!(
            put(&mut store, Height::new(100), b"second"),
            Err(FatalUpgrade::ClientStateAlreadyRecorded(h)) if h == Height::new(100)
        );
        assert_eq!(get(&store, Height::new(100)), Some(b"first".to_vec()));
    }

    #[test]
    fn puts_at_distinct_heights_coexist() {
        let mut store = FakeStateStore::new();
        put(&mut store, Height::new(100), b"a").unwrap();
        put(&mut store, Height::new(200), b"b").unwrap();
        assert_eq!(get(&store, Height::new(100)), Some(b"a".to_vec()));
        assert_eq!(get(&store, Height::new(200)), Some(b"b".to_vec()));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = FakeStateStore::new();
        put(&mut store, Height::new(100), b"a").unwrap();
        delete(&mut store, Height::new(100));
        delete(&mut store, Height::new(100));
        assert_eq!(get(&store, Height::new(100)), None);
    }
}
