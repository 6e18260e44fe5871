use crate::error::{HistoryError, HistoryResult};
use std::fs;
use std::io;
use std::path::Path;

/// Replace `path` with `contents` through a sibling temp file and a rename, so
/// readers never see a partially written file. Missing parent directories are
/// created.
pub fn write_atomic(path: &Path, contents: &str) -> HistoryResult<()> {
    let write_err = |source: io::Error| HistoryError::StorageWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents).map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");

        write_atomic(&path, "[1]").unwrap();
        write_atomic(&path, "[2]").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[2]");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_write_atomic_reports_path_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();
        let path = blocker.join("data.json");

        let err = write_atomic(&path, "[]").unwrap_err();
        match err {
            HistoryError::StorageWrite { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
