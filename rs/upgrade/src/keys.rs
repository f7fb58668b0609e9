//! Key layout of the upgrade subsystem inside the replicated store.
//!
//! Every record lives under a single-byte prefix. Heights are encoded as
//! 8-byte big-endian integers so that lexicographic key order equals numeric
//! height order.

use keel_types::Height;

/// The pending plan record (at most one).
pub const PENDING_PLAN_KEY: &[u8] = &[0x00];
/// Prefix of completed-upgrade records, keyed by plan name.
pub const COMPLETED_PREFIX: &[u8] = &[0x01];
/// Prefix of per-component version records, keyed by component name.
pub const VERSION_PREFIX: &[u8] = &[0x02];
/// The protocol version counter.
pub const PROTOCOL_VERSION_KEY: &[u8] = &[0x03];
/// Prefix of upgraded client-state snapshots, keyed by height.
pub const CLIENT_STATE_PREFIX: &[u8] = &[0x04];

pub fn completed_key(name: &str) -> Vec<u8> {
    [COMPLETED_PREFIX, name.as_bytes()].concat()
}

pub fn version_key(component: &str) -> Vec<u8> {
    [VERSION_PREFIX, component.as_bytes()].concat()
}

pub fn client_state_key(height: Height) -> Vec<u8> {
    [CLIENT_STATE_PREFIX, &height.get().to_be_bytes()[..]].concat()
}

/// Recovers the plan name from a key produced by [`completed_key`].
pub fn name_from_completed_key(key: &[u8]) -> Option<&str> {
    key.strip_prefix(COMPLETED_PREFIX)
        .and_then(|name| std::str::from_utf8(name).ok())
}

/// Recovers the component name from a key produced by [`version_key`].
pub fn component_from_version_key(key: &[u8]) -> Option<&str> {
    key.strip_prefix(VERSION_PREFIX)
        .and_then(|name| std::str::from_utf8(name).ok())
}

pub fn encode_u64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

pub fn decode_u64(bytes: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_prefixes_are_disjoint() {
        // Names can be arbitrary UTF-8, so disjointness rests entirely on
        // the prefix byte.
        assert_ne!(PENDING_PLAN_KEY[0], COMPLETED_PREFIX[0]);
        assert_ne!(COMPLETED_PREFIX[0], VERSION_PREFIX[0]);
        assert_ne!(VERSION_PREFIX[0], PROTOCOL_VERSION_KEY[0]);
        assert_ne!(PROTOCOL_VERSION_KEY[0], CLIENT_STATE_PREFIX[0]);
    }

    #[test]
    fn completed_key_roundtrip() {
        let key = completed_key("v2-neutron");
        assert_eq!(name_from_completed_key(&key), Some("v2-neutron"));
    }

    #[test]
    fn version_key_roundtrip() {
        let key = version_key("bank");
        assert_eq!(component_from_version_key(&key), Some("bank"));
    }

    #[test]
    fn client_state_keys_sort_by_height() {
        assert!(client_state_key(Height::new(9)) < client_state_key(Height::new(10)));
        assert!(client_state_key(Height::new(255)) < client_state_key(Height::new(256)));
    }

    #[test]
    fn u64_encoding_roundtrip() {
        assert_eq!(decode_u64(&encode_u64(0)), Some(0));
        assert_eq!(decode_u64(&encode_u64(u64::MAX)), Some(u64::MAX));
        assert_eq!(decode_u64(b"short"), None);
    }
}
