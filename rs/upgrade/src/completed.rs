//! The append-only record of upgrades that actually executed.
//!
//! Indexed for two lookups: "did an upgrade with this name ever run"
//! ([`done_height`]) and "which upgrade ran last" ([`last_completed`]).
//! Recency is decided strictly by height; plan names carry version-like
//! strings whose lexicographic order has nothing to do with execution order.

use crate::keys;
use keel_interfaces::state_store::{StateReader, StateStore};
use keel_types::Height;

pub fn record<S: StateStore + ?Sized>(store: &mut S, name: &str, height: Height) {
    store.set(keys::completed_key(name), keys::encode_u64(height.get()));
}

/// The height at which the named upgrade executed, if it ever did.
pub fn done_height<S: StateReader + ?Sized>(store: &S, name: &str) -> Option<Height> {
    store.get(&keys::completed_key(name)).map(|bytes| {
        Height::new(keys::decode_u64(&bytes).expect("a completed-upgrade record is corrupted"))
    })
}

/// The completed upgrade with the greatest height, or `None` if no upgrade
/// ever executed.
pub fn last_completed<S: StateReader + ?Sized>(store: &S) -> Option<(String, Height)> {
    let mut last: Option<(String, Height)> = None;
    for (key, value) in store.prefix_iter(keys::COMPLETED_PREFIX) {
        let name = keys::name_from_completed_key(&key)
            .expect("a completed-upgrade key is corrupted")
            .to_string();
        let height =
            Height::new(keys::decode_u64(&value).expect("a completed-upgrade record is corrupted"));
        if last.as_ref().map_or(true, |(_, h)| height > *h) {
            last = Some((name, height));
        }
    }
    last
}
