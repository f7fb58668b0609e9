//! Persistence of the single pending upgrade plan.
//!
//! Validation and notification live in the coordinator; this module is only
//! the record itself. There is at most one pending plan at any time: writing
//! a new one replaces the old one.

use crate::keys;
use keel_interfaces::state_store::{StateReader, StateStore};
use keel_types::upgrade::Plan;

pub fn set_pending<S: StateStore + ?Sized>(store: &mut S, plan: &Plan) {
    let bytes = serde_json::to_vec(plan).expect("serializing an upgrade plan cannot fail");
    store.set(keys::PENDING_PLAN_KEY.to_vec(), bytes);
}

pub fn pending<S: StateReader + ?Sized>(store: &S) -> Option<Plan> {
    store.get(keys::PENDING_PLAN_KEY).map(|bytes| {
        serde_json::from_slice(&bytes).expect("the pending upgrade plan record is corrupted")
    })
}

/// Removes the pending plan, returning it if one was stored.
pub fn clear<S: StateStore + ?Sized>(store: &mut S) -> Option<Plan> {
    let plan = pending(store);
    if plan.is_some() {
        store.delete(keys::PENDING_PLAN_KEY);
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_test_utilities::state::FakeStateStore;
    use keel_types::Height;

    fn plan(name: &str, height: u64) -> Plan {
        Plan {
            name: name.to_string(),
            height: Height::new(height),
            info: String::new(),
        }
    }

    #[test]
    fn pending_is_none_on_fresh_store() {
        let store = FakeStateStore::new();
        assert_eq!(pending(&store), None);
    }

    #[test]
    fn set_then_pending_roundtrips() {
        let mut store = FakeStateStore::new();
        set_pending(&mut store, &plan("v2", 100));
        assert_eq!(pending(&store), Some(plan("v2", 100)));
    }

    #[test]
    fn set_replaces_previous_plan() {
        let mut store = FakeStateStore::new();
        set_pending(&mut store, &plan("first", 100));
        set_pending(&mut store, &plan("second", 200));
        assert_eq!(pending(&store), Some(plan("second", 200)));
    }

    #[test]
    fn clear_returns_removed_plan_once() {
        let mut store = FakeStateStore::new();
        set_pending(&mut store, &plan("v2", 100));
        assert_eq!(clear(&mut store), Some(plan("v2", 100)));
        assert_eq!(clear(&mut store), None);
        assert_eq!(pending(&store), None);
    }
}
