//! Drift detection — advisory staleness audit over a manifest.
//!
//! Compares the modification time of each source template against its
//! installed artifact. Independent of the write path: never renders and
//! never mutates state, so checking for drift cannot cause marker-merge
//! churn. A human or automation step decides when to act.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;

use stencil_core::{profile, ManifestEntry, ProfileName, SyncPolicy};
use stencil_render::RenderError;

use crate::error::{io_err, SyncError};
use crate::manifest;

/// Staleness classification for one installed artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    /// Destination exists and is at least as new as its source template.
    Current,
    /// Source template is strictly newer than the installed artifact.
    Outdated,
    /// Destination does not exist.
    Missing,
}

/// One drift observation; never mutates state.
#[derive(Debug, Clone)]
pub struct DriftRecord {
    pub destination: PathBuf,
    pub installed_mtime: Option<SystemTime>,
    pub source_mtime: SystemTime,
    pub status: DriftStatus,
}

/// Audit every managed manifest entry.
///
/// `create_if_missing` entries are exempt — by definition they are allowed
/// to diverge once created. A missing source template is an error: the
/// manifest references a template the source tree no longer carries.
pub fn check(manifest: &[ManifestEntry]) -> Result<Vec<DriftRecord>, SyncError> {
    let mut records = Vec::new();
    for entry in manifest {
        if entry.policy == SyncPolicy::CreateIfMissing {
            continue;
        }

        let source_mtime = mtime(&entry.source_template)?.ok_or_else(|| {
            SyncError::Render(RenderError::TemplateNotFound {
                path: entry.source_template.clone(),
            })
        })?;
        let installed_mtime = mtime(&entry.destination)?;

        let status = match installed_mtime {
            None => DriftStatus::Missing,
            Some(installed) if source_mtime > installed => DriftStatus::Outdated,
            Some(_) => DriftStatus::Current,
        };
        records.push(DriftRecord {
            destination: entry.destination.clone(),
            installed_mtime,
            source_mtime,
            status,
        });
    }
    Ok(records)
}

/// Convenience: load the profile, build its manifest, and audit it.
pub fn check_profile(
    source_root: &Path,
    target_root: &Path,
    profile_name: &ProfileName,
) -> Result<Vec<DriftRecord>, SyncError> {
    let profile = profile::load_at(source_root, profile_name)?;
    let entries = manifest::build(&profile, source_root, target_root);
    check(&entries)
}

fn mtime(path: &Path) -> Result<Option<SystemTime>, SyncError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.modified().map_err(|e| io_err(path, e))?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

/// Format age from a filesystem timestamp, compact (`3s`, `5m`, `2h`, `4d`).
pub fn format_system_time_age(timestamp: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(timestamp)
        .unwrap_or_default();
    format_duration(age)
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;
    use tempfile::TempDir;

    fn entry(source: &Path, dest: &Path, policy: SyncPolicy) -> ManifestEntry {
        ManifestEntry {
            source_template: source.to_path_buf(),
            destination: dest.to_path_buf(),
            policy,
        }
    }

    fn set_mtime(path: &Path, unix_seconds: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(unix_seconds, 0)).unwrap();
    }

    #[test]
    fn destination_absent_is_missing() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("a.tmpl");
        fs::write(&tmpl, "x").unwrap();

        let records = check(&[entry(
            &tmpl,
            &dir.path().join("a.out"),
            SyncPolicy::OverwriteManaged,
        )])
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, DriftStatus::Missing);
        assert!(records[0].installed_mtime.is_none());
    }

    #[test]
    fn source_newer_is_outdated() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("a.tmpl");
        let dest = dir.path().join("a.out");
        fs::write(&tmpl, "x").unwrap();
        fs::write(&dest, "x").unwrap();
        set_mtime(&dest, 1_000_000);
        set_mtime(&tmpl, 2_000_000);

        let records = check(&[entry(&tmpl, &dest, SyncPolicy::MarkerMerge)]).unwrap();
        assert_eq!(records[0].status, DriftStatus::Outdated);
    }

    #[test]
    fn destination_as_new_as_source_is_current() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("a.tmpl");
        let dest = dir.path().join("a.out");
        fs::write(&tmpl, "x").unwrap();
        fs::write(&dest, "x").unwrap();
        set_mtime(&tmpl, 1_000_000);
        set_mtime(&dest, 1_000_000);

        let records = check(&[entry(&tmpl, &dest, SyncPolicy::OverwriteManaged)]).unwrap();
        assert_eq!(records[0].status, DriftStatus::Current);

        // Strictly-newer destination is also current.
        set_mtime(&dest, 1_000_001);
        let records = check(&[entry(&tmpl, &dest, SyncPolicy::OverwriteManaged)]).unwrap();
        assert_eq!(records[0].status, DriftStatus::Current);
    }

    #[test]
    fn create_if_missing_entries_are_exempt() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("a.tmpl");
        fs::write(&tmpl, "x").unwrap();

        let records = check(&[entry(
            &tmpl,
            &dir.path().join("a.out"),
            SyncPolicy::CreateIfMissing,
        )])
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_source_template_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = check(&[entry(
            &dir.path().join("ghost.tmpl"),
            &dir.path().join("a.out"),
            SyncPolicy::OverwriteManaged,
        )])
        .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Render(RenderError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn audit_never_mutates_the_destination() {
        let dir = TempDir::new().unwrap();
        let tmpl = dir.path().join("a.tmpl");
        let dest = dir.path().join("a.out");
        fs::write(&tmpl, "new template").unwrap();
        fs::write(&dest, "installed").unwrap();
        set_mtime(&dest, 1_000_000);
        set_mtime(&tmpl, 2_000_000);

        check(&[entry(&tmpl, &dest, SyncPolicy::OverwriteManaged)]).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "installed");
        let mtime_after = FileTime::from_last_modification_time(&fs::metadata(&dest).unwrap());
        assert_eq!(mtime_after.unix_seconds(), 1_000_000);
    }

    #[test]
    fn age_formatting_is_compact() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m");
        assert_eq!(format_duration(Duration::from_secs(3 * 60 * 60)), "3h");
        assert_eq!(format_duration(Duration::from_secs(50 * 60 * 60)), "2d");
    }
}
