//! Crash-safe filesystem helpers.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write to `dst`, using a `.tmp` sibling of `dst` as the
/// temporary file.
///
/// # Pre-conditions
///   * `dst` is not a directory.
///   * The parent directory of `dst` must be writeable.
///
/// # Panics
///
///   Doesn't panic unless `action` panics.
pub fn write_atomically<PDst, F>(dst: PDst, action: F) -> io::Result<()>
where
    F: FnOnce(&mut io::BufWriter<&fs::File>) -> io::Result<()>,
    PDst: AsRef<Path>,
{
    let tmp_path = tmp_sibling(dst.as_ref());
    write_atomically_using_tmp_file(dst, tmp_path.as_path(), action)
}

/// Atomically write to `dst` file, using `tmp` as the temporary file.
///
/// The content is written to `tmp`, synced, and `tmp` is then renamed over
/// `dst`, so a reader racing the write (or reading after a crash) observes
/// either the previous content or the new content, never a mix. For the
/// rename to be atomic, `tmp` must be on the same filesystem as `dst`.
pub fn write_atomically_using_tmp_file<PDst, PTmp, F>(
    dst: PDst,
    tmp: PTmp,
    action: F,
) -> io::Result<()>
where
    F: FnOnce(&mut io::BufWriter<&fs::File>) -> io::Result<()>,
    PDst: AsRef<Path>,
    PTmp: AsRef<Path>,
{
    let cleanup = |err: io::Error| {
        let _ = fs::remove_file(tmp.as_ref());
        err
    };

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp.as_ref())?;
    {
        let mut writer = io::BufWriter::new(&file);
        action(&mut writer).map_err(cleanup)?;
        writer.flush().map_err(cleanup)?;
    }
    file.sync_all().map_err(cleanup)?;
    fs::rename(tmp.as_ref(), dst.as_ref()).map_err(cleanup)?;
    Ok(())
}

// bla.txt -> bla.txt.tmp
fn tmp_sibling(dst: &Path) -> PathBuf {
    let mut name = dst
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("tmp"));
    name.push(".tmp");
    dst.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("data.json");
        write_atomically(&dst, |w| w.write_all(b"content")).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"content");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("data.json");
        fs::write(&dst, b"old").unwrap();
        write_atomically(&dst, |w| w.write_all(b"new")).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn failed_action_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("data.json");
        fs::write(&dst, b"old").unwrap();
        let result = write_atomically(&dst, |w| {
            w.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "simulated failure"))
        });
        assert!(result.is_err());
        assert_eq!(fs::read(&dst).unwrap(), b"old");
        assert!(!dir.path().join("data.json.tmp").exists());
    }
}
