//! Host hooks consumed by the upgrade coordinator.

use keel_types::Height;

/// Derives the serialized light-client state recorded at an upgrade
/// boundary, from the chain header and commitment data of the block being
/// processed.
///
/// The returned bytes must be a pure function of the committed chain history
/// at `height`: two nodes processing the same blocks must produce identical
/// bytes, which end up byte-compared by counterparty chains.
pub trait UpgradedClientStateProvider: Send + Sync {
    fn upgraded_client_state(&self, height: Height) -> Vec<u8>;
}

/// Receives the externally visible protocol version whenever it changes.
///
/// The counter persisted in the replicated store is authoritative; this hook
/// only mirrors it into the host, e.g. for the version advertised over RPC.
pub trait ProtocolVersionSetter: Send + Sync {
    fn set_protocol_version(&self, version: u64);
}
