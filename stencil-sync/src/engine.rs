//! Sync policy engine — renders and applies every manifest entry.
//!
//! One failing entry never aborts the batch: its outcome is recorded as
//! `Failed` and the remaining entries still run. The caller turns
//! [`InstallReport::failed_count`] into the process exit status.

use std::path::{Path, PathBuf};

use serde::Serialize;

use stencil_core::{profile, resolver, ManifestEntry, PlaceholderMap, ProfileName, SyncPolicy};
use stencil_render::{load_template, render};

use crate::error::SyncError;
use crate::manifest;
use crate::merge::{self, MergePlan};
use crate::mirror::{self, MirrorOutcome};
use crate::writer::{atomic_write, read_existing, WriteResult};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for one installation run.
///
/// `update` and `force` are deliberately independent: the first only unlocks
/// the prepend-onto-unmarked-file branch of `marker_merge`, the second only
/// bypasses the unchanged-content gate.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Report every action without mutating the filesystem.
    pub dry_run: bool,
    /// Permit prepending the toolkit segment onto marker-merge destinations
    /// that predate the markers.
    pub update: bool,
    /// Rewrite managed artifacts even when their bytes already match.
    pub force: bool,
    /// Mirror directory override; relative paths resolve under the target
    /// root. Falls back to the profile's `mirror` field.
    pub mirror: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// What happened (or would happen) to one manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryAction {
    /// Destination replaced or merged.
    Written,
    /// Destination did not exist and was created.
    Created,
    /// Rendered bytes already match the destination; nothing written.
    Unchanged,
    /// `create_if_missing` destination exists; left untouched.
    Preserved,
    /// Unmarked `marker_merge` destination; skipped without the update flag.
    NeedsUpdateFlag,
    /// Dry-run: a write would have happened.
    WouldWrite,
    /// The entry hit a fatal error; see `error` on the report.
    Failed,
}

/// Per-entry outcome.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub destination: PathBuf,
    pub policy: SyncPolicy,
    pub action: EntryAction,
    /// Placeholder names left literally intact in the written artifact.
    pub unresolved: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Mirror outcome, reported alongside the entries.
#[derive(Debug, Clone, Serialize)]
pub struct MirrorReport {
    pub mirror: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MirrorOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of one installation run.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub profile: String,
    pub entries: Vec<EntryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<MirrorReport>,
}

impl InstallReport {
    /// Entries that hit a fatal error, plus a failed mirror link.
    pub fn failed_count(&self) -> usize {
        let mirror_failed = self
            .mirror
            .as_ref()
            .map(|m| usize::from(m.error.is_some()))
            .unwrap_or(0);
        self.count(EntryAction::Failed) + mirror_failed
    }

    /// Number of entries with the given action.
    pub fn count(&self, action: EntryAction) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    /// Entries flagged with unresolved placeholders.
    pub fn unresolved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.unresolved.is_empty())
            .count()
    }
}

// ---------------------------------------------------------------------------
// install
// ---------------------------------------------------------------------------

/// Run a full installation: load profile, resolve placeholders, build the
/// manifest, apply every entry, then establish the mirror.
///
/// Errors returned here are pre-manifest (profile missing, required key
/// absent); everything after that point is captured per entry.
pub fn install(
    source_root: &Path,
    target_root: &Path,
    profile_name: &ProfileName,
    opts: &InstallOptions,
) -> Result<InstallReport, SyncError> {
    let profile = profile::load_at(source_root, profile_name)?;
    let map = resolver::resolve(&profile)?;
    let manifest_entries = manifest::build(&profile, source_root, target_root);

    tracing::info!(
        "installing profile '{}' ({} entries) into {}",
        profile_name,
        manifest_entries.len(),
        target_root.display()
    );

    let mut entries = Vec::with_capacity(manifest_entries.len());
    for entry in &manifest_entries {
        entries.push(apply_entry(entry, &map, opts));
    }

    let mirror_target = opts.mirror.clone().or_else(|| profile.mirror.clone());
    let mirror = mirror_target.map(|rel| {
        let mirror_path = if rel.is_absolute() {
            rel
        } else {
            target_root.join(rel)
        };
        let canonical = manifest::canonical_dir(target_root);
        match mirror::ensure(&canonical, &mirror_path, opts.dry_run) {
            Ok(outcome) => MirrorReport {
                mirror: mirror_path,
                outcome: Some(outcome),
                error: None,
            },
            Err(err) => {
                tracing::warn!("mirror failed: {err}");
                MirrorReport {
                    mirror: mirror_path,
                    outcome: None,
                    error: Some(err.to_string()),
                }
            }
        }
    });

    Ok(InstallReport {
        profile: profile_name.0.clone(),
        entries,
        mirror,
    })
}

// ---------------------------------------------------------------------------
// Per-entry application
// ---------------------------------------------------------------------------

fn apply_entry(
    entry: &ManifestEntry,
    map: &PlaceholderMap,
    opts: &InstallOptions,
) -> EntryReport {
    match try_apply(entry, map, opts) {
        Ok((action, unresolved)) => EntryReport {
            destination: entry.destination.clone(),
            policy: entry.policy,
            action,
            unresolved,
            error: None,
        },
        Err(err) => {
            tracing::warn!("entry failed for {}: {err}", entry.destination.display());
            EntryReport {
                destination: entry.destination.clone(),
                policy: entry.policy,
                action: EntryAction::Failed,
                unresolved: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    }
}

fn try_apply(
    entry: &ManifestEntry,
    map: &PlaceholderMap,
    opts: &InstallOptions,
) -> Result<(EntryAction, Vec<String>), SyncError> {
    let template = load_template(&entry.source_template)?;
    let rendered = render(&template, map);
    let unresolved: Vec<String> = rendered.unresolved.iter().cloned().collect();
    if !unresolved.is_empty() {
        tracing::warn!(
            "unresolved placeholders in {}: {}",
            entry.destination.display(),
            unresolved.join(", ")
        );
    }
    // Toolkit-rendered text is always LF; user bytes are never touched here.
    let segment = rendered.text.replace("\r\n", "\n");

    let action = match entry.policy {
        SyncPolicy::OverwriteManaged => to_action(
            atomic_write(&entry.destination, &segment, opts.force, opts.dry_run)?,
            EntryAction::Written,
        ),
        SyncPolicy::CreateIfMissing => {
            if entry.destination.exists() {
                EntryAction::Preserved
            } else {
                to_action(
                    atomic_write(&entry.destination, &segment, false, opts.dry_run)?,
                    EntryAction::Created,
                )
            }
        }
        SyncPolicy::MarkerMerge => {
            let existing = read_existing(&entry.destination)?;
            match merge::plan_merge(&entry.destination, existing.as_deref(), &segment, opts.update)?
            {
                MergePlan::Fresh(content) => to_action(
                    atomic_write(&entry.destination, &content, opts.force, opts.dry_run)?,
                    EntryAction::Created,
                ),
                MergePlan::Merged(content) | MergePlan::Prepended(content) => to_action(
                    atomic_write(&entry.destination, &content, opts.force, opts.dry_run)?,
                    EntryAction::Written,
                ),
                MergePlan::NeedsUpdateFlag => EntryAction::NeedsUpdateFlag,
            }
        }
    };

    Ok((action, unresolved))
}

fn to_action(result: WriteResult, wrote: EntryAction) -> EntryAction {
    match result {
        WriteResult::Written { .. } => wrote,
        WriteResult::Unchanged { .. } => EntryAction::Unchanged,
        WriteResult::WouldWrite { .. } => EntryAction::WouldWrite,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
