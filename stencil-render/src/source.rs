//! Template loading from the versioned source tree.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::RenderError;

/// Read the template at `path`.
///
/// Returns [`RenderError::TemplateNotFound`] when the file is absent so the
/// sync engine can fail the single manifest entry without aborting the batch.
pub fn load_template(path: &Path) -> Result<String, RenderError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(RenderError::TemplateNotFound {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(RenderError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_existing_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("greeting.tmpl");
        std::fs::write(&path, "hello {{PROJECT_NAME}}\n").unwrap();
        let content = load_template(&path).expect("load");
        assert_eq!(content, "hello {{PROJECT_NAME}}\n");
    }

    #[test]
    fn missing_template_is_template_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_template(&dir.path().join("ghost.tmpl")).unwrap_err();
        match err {
            RenderError::TemplateNotFound { path } => {
                assert!(path.ends_with("ghost.tmpl"));
            }
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }
}
