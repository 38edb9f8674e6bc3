//! `stencil profiles` — list profile documents in the source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stencil_core::profile;

/// Arguments for `stencil profiles`.
#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Source root containing `profiles/` and `templates/` (default: ~/.stencil).
    #[arg(long)]
    pub source: Option<PathBuf>,
}

impl ProfilesArgs {
    pub fn run(self) -> Result<()> {
        let source = super::resolve_source_root(self.source)?;
        let names = profile::list_names_at(&source)
            .with_context(|| format!("failed to list profiles under {}", source.display()))?;

        if names.is_empty() {
            println!(
                "No profiles found under {}.",
                profile::profiles_dir_at(&source).display()
            );
            return Ok(());
        }

        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}
