//! Manifest construction — toolkit-managed files plus profile outputs.
//!
//! The manifest is rebuilt from the profile on every invocation; nothing is
//! cached between runs.

use std::path::Path;

use stencil_core::{profile, ManifestEntry, Profile, SyncPolicy};

/// Canonical artifact directory under the target root. The mirror manager
/// aliases this directory; toolkit-managed files live inside it.
pub const CANONICAL_DIR: &str = ".stencil";

/// Files installed for every profile, regardless of its declared outputs.
/// Both exist purely to be reproducible, so they are `overwrite_managed`.
const TOOLKIT_FILES: &[(&str, &str, SyncPolicy)] = &[
    (
        "toolkit/version.tmpl",
        ".stencil/version",
        SyncPolicy::OverwriteManaged,
    ),
    (
        "toolkit/roles.md.tmpl",
        ".stencil/roles.md",
        SyncPolicy::OverwriteManaged,
    ),
];

/// Build the manifest for one installation run.
///
/// Entry order is stable: the fixed toolkit set first, then the profile's
/// declared outputs in document order. All paths come back absolute
/// (templates under `<source>/templates/`, destinations under the target
/// root). Pure; no I/O.
pub fn build(profile: &Profile, source_root: &Path, target_root: &Path) -> Vec<ManifestEntry> {
    let templates = profile::templates_dir_at(source_root);
    let mut entries = Vec::with_capacity(TOOLKIT_FILES.len() + profile.outputs.len());

    for (template, destination, policy) in TOOLKIT_FILES {
        entries.push(ManifestEntry {
            source_template: templates.join(template),
            destination: target_root.join(destination),
            policy: *policy,
        });
    }

    for output in &profile.outputs {
        entries.push(ManifestEntry {
            source_template: templates.join(&output.template),
            destination: target_root.join(&output.destination),
            policy: output.policy,
        });
    }

    entries
}

/// The canonical artifact directory for a target root.
pub fn canonical_dir(target_root: &Path) -> std::path::PathBuf {
    target_root.join(CANONICAL_DIR)
}
