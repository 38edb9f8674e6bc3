//! Error types for stencil-sync.

use std::path::PathBuf;

use thiserror::Error;

use stencil_core::error::ProfileError;
use stencil_render::RenderError;

/// All errors that can arise from sync operations.
///
/// Inside an installation run these are per-entry: one failing manifest entry
/// is recorded and the batch continues. They abort the whole run only when
/// raised before the manifest loop (profile load, placeholder resolution).
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering layer (template missing or unreadable).
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from profile loading or placeholder resolution.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination (or its temporary sibling) is not writable.
    #[error("write permission denied at {path}")]
    WritePermissionDenied { path: PathBuf },

    /// The destination has an unmatched or duplicated marker pair; merging
    /// is refused rather than guessing the boundary.
    #[error("malformed markers in {path}: {detail}")]
    MalformedMarkers { path: PathBuf, detail: String },

    /// The mirror path exists but is not the expected alias.
    #[error("mirror conflict at {path}: {detail}")]
    MirrorConflict { path: PathBuf, detail: String },
}

/// Convenience constructor for path-annotated I/O errors.
///
/// Permission failures get their own variant so reports can name them
/// instead of burying them in a generic I/O message.
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    let path = path.into();
    if source.kind() == std::io::ErrorKind::PermissionDenied {
        return SyncError::WritePermissionDenied { path };
    }
    SyncError::Io { path, source }
}
