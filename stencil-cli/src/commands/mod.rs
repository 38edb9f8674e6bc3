//! Subcommand modules for the stencil CLI.

pub mod diff;
pub mod drift;
pub mod install;
pub mod profiles;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// `--source` override, or `~/.stencil` when omitted.
pub(crate) fn resolve_source_root(source: Option<PathBuf>) -> Result<PathBuf> {
    match source {
        Some(path) => Ok(path),
        None => stencil_core::profile::default_source_root()
            .context("could not determine default source root"),
    }
}
