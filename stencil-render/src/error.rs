//! Error types for stencil-render.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template loading.
///
/// Rendering itself never fails: unresolved placeholders are reported on the
/// [`crate::engine::Rendered`] value, not as errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source template file does not exist.
    #[error("template not found at {path}")]
    TemplateNotFound { path: PathBuf },

    /// Filesystem error while reading a template.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
