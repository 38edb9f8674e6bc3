//! Mirror management — the consumer-facing alias of the canonical directory.
//!
//! The mirror is a symbolic link, never a copy: a consumer reading through
//! the mirror path always observes exactly the artifact set in the canonical
//! directory, with no possibility of divergence. Anything already occupying
//! the mirror path that is not the expected link is a conflict the engine
//! refuses to resolve on its own.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{io_err, SyncError};

/// Outcome of one mirror check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MirrorOutcome {
    /// Link created this run.
    Linked { mirror: PathBuf, canonical: PathBuf },
    /// Link already present and pointing at the canonical directory.
    AlreadyLinked { mirror: PathBuf },
    /// Dry-run: the link would have been created.
    WouldLink { mirror: PathBuf },
}

/// Ensure `mirror` is a symbolic link to `canonical`.
///
/// Correct link → no-op. Absent → created (the canonical directory is
/// created first so the link is never dangling). Plain file, plain
/// directory, or a link to some other target → [`SyncError::MirrorConflict`].
pub fn ensure(
    canonical: &Path,
    mirror: &Path,
    dry_run: bool,
) -> Result<MirrorOutcome, SyncError> {
    match std::fs::symlink_metadata(mirror) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let target = std::fs::read_link(mirror).map_err(|e| io_err(mirror, e))?;
            if resolves_to(&target, mirror, canonical) {
                tracing::debug!("mirror already linked: {}", mirror.display());
                Ok(MirrorOutcome::AlreadyLinked {
                    mirror: mirror.to_path_buf(),
                })
            } else {
                Err(SyncError::MirrorConflict {
                    path: mirror.to_path_buf(),
                    detail: format!(
                        "links to {} instead of {}",
                        target.display(),
                        canonical.display()
                    ),
                })
            }
        }
        Ok(meta) => Err(SyncError::MirrorConflict {
            path: mirror.to_path_buf(),
            detail: if meta.is_dir() {
                "existing directory is not a symbolic link".to_string()
            } else {
                "existing file is not a symbolic link".to_string()
            },
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            if dry_run {
                return Ok(MirrorOutcome::WouldLink {
                    mirror: mirror.to_path_buf(),
                });
            }
            std::fs::create_dir_all(canonical).map_err(|e| io_err(canonical, e))?;
            if let Some(parent) = mirror.parent() {
                std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
            symlink_dir(canonical, mirror).map_err(|e| io_err(mirror, e))?;
            tracing::info!(
                "linked mirror {} -> {}",
                mirror.display(),
                canonical.display()
            );
            Ok(MirrorOutcome::Linked {
                mirror: mirror.to_path_buf(),
                canonical: canonical.to_path_buf(),
            })
        }
        Err(err) => Err(io_err(mirror, err)),
    }
}

/// Does the link target resolve to the canonical directory?
///
/// Relative targets resolve against the link's parent. Canonicalization
/// handles `..` components and platform path quirks; when either side cannot
/// be canonicalized the raw paths are compared.
fn resolves_to(target: &Path, mirror: &Path, canonical: &Path) -> bool {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        mirror
            .parent()
            .map(|parent| parent.join(target))
            .unwrap_or_else(|| target.to_path_buf())
    };
    match (std::fs::canonicalize(&resolved), std::fs::canonicalize(canonical)) {
        (Ok(a), Ok(b)) => a == b,
        _ => resolved == canonical,
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
