//! Whole-file replacement for table writes.
//!
//! ```text
//! tiers.json.<uuid>.tmp ── write + fsync ──► rename over tiers.json ──► fsync dir
//! ```
//!
//! A reader opening `tiers.json` sees either the old contents or the new,
//! never a prefix. Concurrent writers each get their own temp file; the last
//! rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

/// Atomically replaces `path` with `bytes`, creating the parent directory.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::other("missing parent dir"))?;
    std::fs::create_dir_all(dir)?;

    let tmp = temp_path(path);
    let written = (|| {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        std::fs::rename(&tmp, path)
    })();
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
        return written;
    }

    // directory entry durability (POSIX)
    if let Ok(d) = std::fs::File::open(dir) {
        let _ = d.sync_all();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiers.json");
        std::fs::write(&path, "{\"elite\":1.0}").unwrap();

        atomic_write(&path, b"{\"elite\":0.9}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"elite\":0.9}");
    }

    #[test]
    fn test_creates_parent_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("shrouds.json");
        atomic_write(&path, b"{}").unwrap();

        let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("shrouds.json")]);
    }

    #[test]
    fn test_temp_names_are_unique() {
        let path = Path::new("/tmp/tiers.json");
        assert_ne!(temp_path(path), temp_path(path));
        assert!(temp_path(path).to_string_lossy().ends_with(".tmp"));
    }
}
