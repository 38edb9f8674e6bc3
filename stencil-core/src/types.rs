//! Domain types for stencil profiles and manifests.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde + serde_yaml.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for an installation profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileName(pub String);

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProfileName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProfileName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How the sync engine treats one destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Destination is fully toolkit-owned; always re-rendered and replaced.
    OverwriteManaged,
    /// Destination is user territory once it exists; only created when missing.
    CreateIfMissing,
    /// Destination mixes toolkit and user content, delimited by marker lines.
    MarkerMerge,
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPolicy::OverwriteManaged => write!(f, "overwrite_managed"),
            SyncPolicy::CreateIfMissing => write!(f, "create_if_missing"),
            SyncPolicy::MarkerMerge => write!(f, "marker_merge"),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile document
// ---------------------------------------------------------------------------

/// Project identity values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentitySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

/// Workflow conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkflowSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_style: Option<String>,
}

/// Command strings substituted into generated scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CommandsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<String>,
}

/// Numeric tuning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TuningSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_diff_lines: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_batch_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_limit: Option<u32>,
}

/// One artifact declared by a profile's output set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Template path relative to `<source>/templates/`.
    pub template: PathBuf,
    /// Destination path relative to the target root.
    pub destination: PathBuf,
    pub policy: SyncPolicy,
}

/// A named installation profile, loaded from `<source>/profiles/<name>.yaml`.
///
/// Every section is optional in the document; the resolver supplies
/// documented defaults for any key the profile omits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    #[serde(default)]
    pub identity: IdentitySection,
    #[serde(default)]
    pub workflow: WorkflowSection,
    #[serde(default)]
    pub commands: CommandsSection,
    #[serde(default)]
    pub tuning: TuningSection,
    #[serde(default)]
    pub outputs: Vec<OutputSpec>,
    /// Consumer-facing mirror directory, relative to the target root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// One resolved (template, destination, policy) pairing for a run.
///
/// Both paths are absolute by the time a manifest is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source_template: PathBuf,
    pub destination: PathBuf,
    pub policy: SyncPolicy,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(ProfileName::from("rust-service").to_string(), "rust-service");
    }

    #[test]
    fn newtype_equality() {
        let a = ProfileName::from("x");
        let b = ProfileName::from(String::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn policy_serde_uses_snake_case() {
        let yaml = serde_yaml::to_string(&SyncPolicy::MarkerMerge).expect("serialize");
        assert_eq!(yaml.trim(), "marker_merge");
        let parsed: SyncPolicy = serde_yaml::from_str("create_if_missing").expect("deserialize");
        assert_eq!(parsed, SyncPolicy::CreateIfMissing);
    }

    #[test]
    fn policy_display() {
        assert_eq!(SyncPolicy::OverwriteManaged.to_string(), "overwrite_managed");
        assert_eq!(SyncPolicy::MarkerMerge.to_string(), "marker_merge");
    }

    #[test]
    fn profile_serde_roundtrip() {
        let profile = Profile {
            identity: IdentitySection {
                project_name: Some("copnow".to_string()),
                default_branch: Some("main".to_string()),
                remote: None,
            },
            outputs: vec![OutputSpec {
                template: PathBuf::from("docs/workflow.md.tmpl"),
                destination: PathBuf::from("docs/WORKFLOW.md"),
                policy: SyncPolicy::MarkerMerge,
            }],
            ..Profile::default()
        };
        let yaml = serde_yaml::to_string(&profile).expect("serialize");
        let parsed: Profile = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(parsed, profile);
    }

    #[test]
    fn empty_document_parses_to_default_profile() {
        let parsed: Profile = serde_yaml::from_str("{}").expect("deserialize");
        assert_eq!(parsed, Profile::default());
        assert!(parsed.outputs.is_empty());
        assert!(parsed.mirror.is_none());
    }
}
