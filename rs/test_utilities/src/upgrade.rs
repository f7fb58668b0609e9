//! Fakes for the upgrade coordinator's host hooks.

use keel_interfaces::upgrade::{ProtocolVersionSetter, UpgradedClientStateProvider};
use keel_types::Height;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Deterministic [`UpgradedClientStateProvider`]: the returned blob is a
/// fixed tag followed by the height, so tests can predict the exact bytes.
#[derive(Clone, Debug, Default)]
pub struct FakeClientStateProvider;

impl FakeClientStateProvider {
    pub fn expected_bytes(height: Height) -> Vec<u8> {
        format!("client-state@{}", height).into_bytes()
    }
}

impl UpgradedClientStateProvider for FakeClientStateProvider {
    fn upgraded_client_state(&self, height: Height) -> Vec<u8> {
        Self::expected_bytes(height)
    }
}

/// Records every protocol version pushed by the coordinator.
#[derive(Clone, Debug, Default)]
pub struct RecordingVersionSetter {
    version: Arc<AtomicU64>,
}

impl RecordingVersionSetter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last version observed, 0 if none was ever set.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl ProtocolVersionSetter for RecordingVersionSetter {
    fn set_protocol_version(&self, version: u64) {
        self.version.store(version, Ordering::SeqCst);
    }
}
