use ic_interfaces_registry::RegistryClient;
use ic_registry_client_helpers::node::NodeRegistry;
use ic_types::{NodeId, RegistryVersion};
use std::io::ErrorKind;
use thiserror::Error;

/// Custom error type for SEV status operations
#[derive(Error, Debug)]
pub enum SevStatusError {
    /// Error when interacting with the registry
    #[error("Registry error: {0}")]
    RegistryError(String),

    /// Error when node record is not found
    #[error("Node record not found for node ID {0}")]
    NodeRecordNotFound(NodeId),

    /// Error when accessing SEV firmware
    #[cfg(target_os = "linux")]
    #[error("SEV firmware error: {0}")]
    FirmwareError(#[from] std::io::Error),
}

/// Result type for SEV status operations
pub type SevStatusResult<T> = Result<T, SevStatusError>;

/// Tracks the status of AMD SEV (Secure Encrypted Virtualization) for this node
#[derive(Debug, Clone)]
pub struct SevStatus {
    /// Whether the SEV firmware is available on this host
    pub firmware_available: bool,
    /// Whether SEV is enabled for this node in the registry
    pub enabled_in_registry: bool,
}

impl SevStatus {
    /// Checks if SEV is fully available and configured (both firmware available and enabled in registry)
    pub fn is_sev_available(&self) -> bool {
        self.firmware_available && self.enabled_in_registry
    }
}

/// Creates a new SevStatus instance by checking:
/// 1. If SEV firmware is available on Linux (always false on non-Linux)
/// 2. If SEV is enabled for this node in the registry
///
/// # Arguments
/// * `node_id` - The ID of this node
/// * `registry_client` - The registry client to query node configuration
///
/// # Returns
/// A Result containing the SevStatus or an error
pub fn create_sev_status(
    node_id: NodeId,
    registry_client: &dyn RegistryClient,
) -> SevStatusResult<SevStatus> {
    let firmware_available = check_firmware_available();
    let enabled_in_registry = check_registry_enabled(node_id, registry_client)?;

    Ok(SevStatus {
        firmware_available,
        enabled_in_registry,
    })
}

/// Checks if the SEV firmware is available
/// Always returns false on non-Linux platforms
fn check_firmware_available() -> SevStatusResult<bool> {
    #[cfg(target_os = "linux")]
    {
        // Only attempt to use SEV on Linux
        use sev::firmware::guest::Firmware;
        use std::path::Path;

        // Check if the device file exists
        if !Path::new("/dev/sev-guest").exists() {
            return false;
        }

        Firmware::open().map_err(|e| SevStatusError::FirmwareError(e))
    }

    #[cfg(not(target_os = "linux"))]
    {
        // Always return false on non-Linux platforms
        false
    }
}

/// Checks if SEV is enabled for this node in the registry
fn check_registry_enabled(
    node_id: NodeId,
    registry_client: &dyn RegistryClient,
) -> SevStatusResult<bool> {
    let latest_version = registry_client.get_latest_version();

    // Get the node record for this node
    let node_record = registry_client
        .get_node_record(node_id, latest_version)
        .map_err(|e| SevStatusError::RegistryError(e.to_string()))?
        .ok_or_else(|| SevStatusError::NodeRecordNotFound(node_id))?;

    // Check if chip_id is present, which indicates SEV is enabled for this node
    Ok(node_record.chip_id.is_some())
}
