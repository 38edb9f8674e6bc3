//! `stencil diff` — unified diffs of what install would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stencil_core::ProfileName;
use stencil_sync::preview;

/// Arguments for `stencil diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Target directory the artifacts were installed into.
    pub target: PathBuf,

    /// Profile name.
    #[arg(long, short = 'p')]
    pub profile: String,

    /// Source root containing `profiles/` and `templates/` (default: ~/.stencil).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Diff unmarked merge destinations as if --update were passed to install.
    #[arg(long)]
    pub update: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let source = super::resolve_source_root(self.source)?;
        let report = preview(
            &source,
            &self.target,
            &ProfileName::from(self.profile.clone()),
            self.update,
        )
        .with_context(|| format!("diff failed for profile '{}'", self.profile))?;

        if report.diffs.is_empty() {
            println!("No differences for profile '{}'.", report.profile);
            return Ok(());
        }

        for diff in report.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
