//! Unified diff preview for `stencil diff`.
//!
//! Renders what `install` would leave at each destination (including the
//! merged result for marker-merge entries) and compares it to the bytes on
//! disk. No files are written.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use stencil_core::{profile, resolver, ManifestEntry, PlaceholderMap, ProfileName, SyncPolicy};
use stencil_render::{load_template, render};

use crate::error::SyncError;
use crate::manifest;
use crate::merge::{self, MergePlan};
use crate::writer::read_existing;

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for one profile against one target root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub profile: String,
    pub diffs: Vec<FileDiff>,
}

/// Render what `install` would produce and compare to current content.
///
/// `update` mirrors the install flag: with it set, unmarked marker-merge
/// destinations diff against the prepended result; without it they are
/// skipped, exactly as install would skip them. Entries that would fail
/// (missing template, malformed markers) produce no diff; install reports
/// them properly.
pub fn preview(
    source_root: &Path,
    target_root: &Path,
    profile_name: &ProfileName,
    update: bool,
) -> Result<DiffReport, SyncError> {
    let profile = profile::load_at(source_root, profile_name)?;
    let map = resolver::resolve(&profile)?;
    let entries = manifest::build(&profile, source_root, target_root);

    let mut diffs = Vec::new();
    for entry in &entries {
        match entry_diff(entry, &map, target_root, update) {
            Ok(Some(diff)) => diffs.push(diff),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("diff skipped for {}: {err}", entry.destination.display());
            }
        }
    }

    Ok(DiffReport {
        profile: profile_name.0.clone(),
        diffs,
    })
}

fn entry_diff(
    entry: &ManifestEntry,
    map: &PlaceholderMap,
    target_root: &Path,
    update: bool,
) -> Result<Option<FileDiff>, SyncError> {
    let template = load_template(&entry.source_template)?;
    let segment = render(&template, map).text.replace("\r\n", "\n");
    let existing = read_existing(&entry.destination)?;

    let proposed = match entry.policy {
        SyncPolicy::OverwriteManaged => segment,
        SyncPolicy::CreateIfMissing => {
            if existing.is_some() {
                return Ok(None);
            }
            segment
        }
        SyncPolicy::MarkerMerge => {
            match merge::plan_merge(&entry.destination, existing.as_deref(), &segment, update)? {
                MergePlan::Fresh(content)
                | MergePlan::Merged(content)
                | MergePlan::Prepended(content) => content,
                MergePlan::NeedsUpdateFlag => return Ok(None),
            }
        }
    };

    let current = existing.unwrap_or_default();
    if current == proposed {
        return Ok(None);
    }

    let relative = entry
        .destination
        .strip_prefix(target_root)
        .unwrap_or(entry.destination.as_path());
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(&current, &proposed)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(Some(FileDiff {
        path: entry.destination.clone(),
        unified_diff: unified,
    }))
}
