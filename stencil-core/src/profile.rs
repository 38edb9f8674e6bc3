//! Profile store — named YAML profile documents under a source root.
//!
//! # Storage layout
//!
//! ```text
//! <source root>/                 (default: ~/.stencil/)
//!   profiles/
//!     <name>.yaml                (one document per named profile)
//!   templates/
//!     ...                        (versioned template tree)
//! ```
//!
//! # API pattern
//!
//! Every function takes an explicit `source_root`; the `_at` suffix from the
//! path helpers carries through so tests always run against a `TempDir`,
//! never the real `~/.stencil`. [`default_source_root`] is the only place
//! that consults the home directory.

use std::path::{Path, PathBuf};

use crate::error::ProfileError;
use crate::types::{Profile, ProfileName};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<source root>/profiles/` — pure, no I/O.
pub fn profiles_dir_at(source_root: &Path) -> PathBuf {
    source_root.join("profiles")
}

/// `<source root>/templates/` — pure, no I/O.
pub fn templates_dir_at(source_root: &Path) -> PathBuf {
    source_root.join("templates")
}

/// `<source root>/profiles/<name>.yaml` — pure, no I/O.
pub fn profile_path_at(source_root: &Path, name: &ProfileName) -> PathBuf {
    profiles_dir_at(source_root).join(format!("{}.yaml", name.0))
}

/// `~/.stencil` — the source root used when the CLI gets no `--source`.
pub fn default_source_root() -> Result<PathBuf, ProfileError> {
    dirs::home_dir()
        .map(|home| home.join(".stencil"))
        .ok_or(ProfileError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// 2. Listing
// ---------------------------------------------------------------------------

/// Names of all profile documents under `<source root>/profiles/`, sorted.
///
/// Returns an empty list when the directory does not exist.
pub fn list_names_at(source_root: &Path) -> Result<Vec<ProfileName>, ProfileError> {
    let dir = profiles_dir_at(source_root);
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<ProfileName> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".yaml").map(ProfileName::from)
        })
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(names)
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load the named profile from `<source root>/profiles/<name>.yaml`.
///
/// Returns `ProfileError::ProfileNotFound` if absent,
/// `ProfileError::Parse` (with path + line context) if malformed YAML.
/// Pure read; never mutates the source tree.
pub fn load_at(source_root: &Path, name: &ProfileName) -> Result<Profile, ProfileError> {
    let path = profile_path_at(source_root, name);
    if !path.exists() {
        return Err(ProfileError::ProfileNotFound {
            name: name.0.clone(),
            path,
        });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ProfileError::Parse { path, source: e })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
