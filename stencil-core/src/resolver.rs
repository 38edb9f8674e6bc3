//! Placeholder resolution — profile document → flat placeholder map.
//!
//! Resolution order per key: explicit profile value → documented default →
//! `MissingRequiredKey` (required keys only). Keys a template references
//! without appearing here are NOT an error at this stage; they surface as
//! unresolved placeholders at render time.
//!
//! The map is built once per run and passed by reference afterwards; nothing
//! in the workspace mutates it after construction.

use std::collections::BTreeMap;

use crate::error::ProfileError;
use crate::types::Profile;

/// Flat placeholder key → resolved value mapping.
///
/// Keys follow the UPPER_SNAKE convention used inside `{{...}}` markers.
pub type PlaceholderMap = BTreeMap<String, String>;

/// Documented defaults for every optional placeholder key.
const DEFAULTS: &[(&str, &str)] = &[
    ("DEFAULT_BRANCH", "main"),
    ("REMOTE_NAME", "origin"),
    ("BRANCH_PREFIX", "feature/"),
    ("COMMIT_STYLE", "conventional"),
    ("TEST_COMMAND", "make test"),
    ("BUILD_COMMAND", "make build"),
    ("LINT_COMMAND", "make lint"),
    ("MAX_DIFF_LINES", "400"),
    ("ISSUE_BATCH_SIZE", "10"),
    ("RETRY_LIMIT", "3"),
];

/// Keys that must resolve to an explicit profile value.
const REQUIRED: &[&str] = &["PROJECT_NAME"];

/// The documented default for `key`, if one exists.
pub fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Build the flat placeholder map for `profile`.
///
/// Fails with [`ProfileError::MissingRequiredKey`] when a required key has
/// neither an explicit value nor a default. Pure; no I/O.
pub fn resolve(profile: &Profile) -> Result<PlaceholderMap, ProfileError> {
    let mut map = PlaceholderMap::new();

    insert(&mut map, "PROJECT_NAME", profile.identity.project_name.clone())?;
    insert(&mut map, "DEFAULT_BRANCH", profile.identity.default_branch.clone())?;
    insert(&mut map, "REMOTE_NAME", profile.identity.remote.clone())?;
    insert(&mut map, "BRANCH_PREFIX", profile.workflow.branch_prefix.clone())?;
    insert(&mut map, "COMMIT_STYLE", profile.workflow.commit_style.clone())?;
    insert(&mut map, "TEST_COMMAND", profile.commands.test.clone())?;
    insert(&mut map, "BUILD_COMMAND", profile.commands.build.clone())?;
    insert(&mut map, "LINT_COMMAND", profile.commands.lint.clone())?;
    insert(
        &mut map,
        "MAX_DIFF_LINES",
        profile.tuning.max_diff_lines.map(|n| n.to_string()),
    )?;
    insert(
        &mut map,
        "ISSUE_BATCH_SIZE",
        profile.tuning.issue_batch_size.map(|n| n.to_string()),
    )?;
    insert(
        &mut map,
        "RETRY_LIMIT",
        profile.tuning.retry_limit.map(|n| n.to_string()),
    )?;

    // Injected by the toolkit itself; profiles cannot override it.
    map.insert(
        "TOOLKIT_VERSION".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );

    Ok(map)
}

fn insert(
    map: &mut PlaceholderMap,
    key: &str,
    explicit: Option<String>,
) -> Result<(), ProfileError> {
    let value = match explicit {
        Some(v) => v,
        None => match default_for(key) {
            Some(d) => d.to_string(),
            None if REQUIRED.contains(&key) => {
                return Err(ProfileError::MissingRequiredKey {
                    key: key.to_string(),
                });
            }
            // Optional key with no default: absent from the map; a template
            // referencing it reports an unresolved placeholder downstream.
            None => return Ok(()),
        },
    };
    map.insert(key.to_string(), value);
    Ok(())
}
