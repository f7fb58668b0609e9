//! An in-memory stand-in for the replicated store.

use keel_interfaces::state_store::{StateReader, StateStore};
use std::collections::BTreeMap;

/// BTreeMap-backed [`StateStore`].
///
/// `Clone` is cheap enough for tests to fork the store before a begin-block
/// call; the clone plays the role of the state a node restarts with after
/// crashing before the block committed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FakeStateStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl FakeStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateReader for FakeStateStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn prefix_iter<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        Box::new(
            self.entries
                .range(prefix.to_vec()..)
                .take_while(move |(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }
}

impl StateStore for FakeStateStore {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }
}
