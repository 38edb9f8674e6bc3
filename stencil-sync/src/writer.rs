//! Atomic writer with an unchanged-content gate.
//!
//! ## Write protocol
//!
//! 1. Render content (already done by caller).
//! 2. SHA-256 hash the content and the destination's current bytes.
//! 3. Skip if identical (unless forced).
//! 4. Write to `<path>.stencil.tmp`.
//! 5. Rename to final path (atomic on POSIX).
//!
//! Content passes through verbatim — merged files carry user-owned bytes the
//! writer must not rewrite. There is no persisted hash store: the gate reads
//! the destination each run, so a reader of the destination at any point sees
//! either the previous complete content or the new complete content, never a
//! partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — rendered content matches the destination's bytes.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write a single rendered file.
///
/// `force` bypasses the unchanged-content gate and rewrites the destination
/// even when the bytes match. Returns [`WriteResult`] indicating whether the
/// file was written or skipped.
pub(crate) fn atomic_write(
    path: &Path,
    content: &str,
    force: bool,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.stencil.tmp", path.display()));
    atomic_write_with_tmp(path, content, force, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    force: bool,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    if !force {
        if let Some(existing) = read_existing(path)? {
            if digest(&existing) == digest(content) {
                tracing::debug!("unchanged: {}", path.display());
                return Ok(WriteResult::Unchanged {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    // Atomic rename into place; never leave the tmp sibling behind.
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// The destination's current content, verbatim; `None` when absent.
pub(crate) fn read_existing(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

fn digest(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("version");
        let result = atomic_write(&path, "0.1.3\n", false, false).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert!(path.exists());
    }

    #[test]
    fn second_write_same_content_returns_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.md");
        atomic_write(&path, "same content", false, false).unwrap();
        let result = atomic_write(&path, "same content", false, false).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn changed_content_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.md");
        atomic_write(&path, "v1", false, false).unwrap();
        let result = atomic_write(&path, "v2", false, false).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
    }

    #[test]
    fn force_rewrites_identical_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.md");
        atomic_write(&path, "same", false, false).unwrap();
        let result = atomic_write(&path, "same", true, false).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
    }

    #[test]
    fn dry_run_does_not_write_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.md");
        let result = atomic_write(&path, "content", false, true).unwrap();
        assert!(matches!(result, WriteResult::WouldWrite { .. }));
        assert!(!path.exists(), "dry-run must not create files");
    }

    #[test]
    fn dry_run_on_unchanged_content_still_reports_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.md");
        atomic_write(&path, "stable", false, false).unwrap();
        let result = atomic_write(&path, "stable", false, true).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.md");
        atomic_write(&path, "data", false, false).unwrap();
        let tmp_path = PathBuf::from(format!("{}.stencil.tmp", path.display()));
        assert!(!tmp_path.exists(), ".stencil.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".stencil").join("bin").join("review.sh");
        atomic_write(&path, "#!/bin/sh\n", false, false).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn content_is_written_verbatim() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("verbatim.md");

        // Merged files carry user bytes; the writer must not rewrite them.
        let content = "user line\r\nno trailing newline";
        atomic_write(&path, content, false, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), content);

        let second = atomic_write(&path, content, false, false).unwrap();
        assert!(matches!(second, WriteResult::Unchanged { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("file.md");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("file.md.stencil.tmp");

        let err = atomic_write_with_tmp(&path, "new content", true, false, &tmp_path)
            .expect_err("rename should fail on readonly dir");
        assert!(
            matches!(err, SyncError::WritePermissionDenied { .. }),
            "got: {err:?}"
        );

        let current = fs::read_to_string(&path).unwrap();
        assert_eq!(current, "original", "original file should be intact");
        assert!(!tmp_path.exists(), ".stencil.tmp should be cleaned up");

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();
    }
}
