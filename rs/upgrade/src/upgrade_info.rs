//! The on-disk halt marker.
//!
//! Deliberately outside the replicated store: the external process manager
//! reads the marker after the node stopped, without a running store engine,
//! and a store-level transaction abort must never roll the marker back. The
//! format is the plan's JSON encoding (`name`, `height`, `info`).

use keel_types::upgrade::Plan;
use keel_types::Height;
use keel_utils::fs::write_atomically;
use std::fs;
use std::io;
use std::path::Path;

/// File name of the marker inside the configured upgrade-info directory.
pub const UPGRADE_INFO_FILENAME: &str = "upgrade-info.json";

/// Writes the marker for `plan` to `path`, creating parent directories as
/// needed. The recorded height is `height`, the height the gate actually
/// stopped at, which wins over `plan.height`.
pub fn dump_upgrade_info_to_disk(path: &Path, height: Height, plan: &Plan) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut recorded = plan.clone();
    recorded.height = height;
    write_atomically(path, |writer| {
        serde_json::to_writer(&mut *writer, &recorded).map_err(io::Error::from)
    })
}

/// Reads a previously dumped marker. A missing file is the normal "no halt
/// has happened" case, not an error.
pub fn read_upgrade_info_from_disk(path: &Path) -> io::Result<Option<Plan>> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    let plan = serde_json::from_slice(&contents)?;
    Ok(Some(plan))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(name: &str, height: u64) -> Plan {
        Plan {
            name: name.to_string(),
            height: Height::new(height),
            info: "release notes".to_string(),
        }
    }

    #[test]
    fn absent_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UPGRADE_INFO_FILENAME);
        assert_eq!(read_upgrade_info_from_disk(&path).unwrap(), None);
    }

    #[test]
    fn dump_height_overrides_plan_height() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UPGRADE_INFO_FILENAME);
        dump_upgrade_info_to_disk(&path, Height::new(101), &plan("test_upgrade", 100)).unwrap();

        let read = read_upgrade_info_from_disk(&path).unwrap().unwrap();
        assert_eq!(read, plan("test_upgrade", 101));
    }

    #[test]
    fn dump_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper").join(UPGRADE_INFO_FILENAME);
        dump_upgrade_info_to_disk(&path, Height::new(100), &plan("v2", 100)).unwrap();
        assert!(read_upgrade_info_from_disk(&path).unwrap().is_some());
    }

    #[test]
    fn dump_replaces_previous_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UPGRADE_INFO_FILENAME);
        dump_upgrade_info_to_disk(&path, Height::new(100), &plan("old", 100)).unwrap();
        dump_upgrade_info_to_disk(&path, Height::new(200), &plan("new", 200)).unwrap();

        let read = read_upgrade_info_from_disk(&path).unwrap().unwrap();
        assert_eq!(read.name, "new");
        assert_eq!(read.height, Height::new(200));
    }

    #[test]
    fn marker_is_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UPGRADE_INFO_FILENAME);
        dump_upgrade_info_to_disk(&path, Height::new(100), &plan("v2", 100)).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            r#"{"name":"v2","height":100,"info":"release notes"}"#
        );
    }
}
