//! `stencil install` — render and write every manifest entry for a profile.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stencil_core::ProfileName;
use stencil_sync::{engine, EntryAction, InstallOptions, InstallReport};

/// Largest exit code used for failed-entry counts; larger batches clamp here
/// so the status can never alias to 0 or collide with signal codes.
const MAX_FAILURE_EXIT: usize = 101;

/// Arguments for `stencil install`.
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Target directory to install into.
    pub target: PathBuf,

    /// Profile name (see `stencil profiles`).
    #[arg(long, short = 'p')]
    pub profile: String,

    /// Source root containing `profiles/` and `templates/` (default: ~/.stencil).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Adopt unmarked merge destinations by prepending the managed region.
    #[arg(long)]
    pub update: bool,

    /// Rewrite managed artifacts even when already current.
    #[arg(long)]
    pub force: bool,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Mirror directory (overrides the profile's `mirror` field).
    #[arg(long)]
    pub mirror: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl InstallArgs {
    pub fn run(self) -> Result<()> {
        let source = super::resolve_source_root(self.source)?;
        let opts = InstallOptions {
            dry_run: self.dry_run,
            update: self.update,
            force: self.force,
            mirror: self.mirror,
        };

        let report = engine::install(
            &source,
            &self.target,
            &ProfileName::from(self.profile.clone()),
            &opts,
        )
        .with_context(|| format!("install failed for profile '{}'", self.profile))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
        } else {
            print_report(&report, self.dry_run);
        }

        let failed = report.failed_count();
        if failed > 0 {
            std::process::exit(failed.min(MAX_FAILURE_EXIT) as i32);
        }
        Ok(())
    }
}

fn print_report(report: &InstallReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report.count(EntryAction::Written)
        + report.count(EntryAction::Created)
        + report.count(EntryAction::WouldWrite);
    let unchanged = report.count(EntryAction::Unchanged);
    let preserved = report.count(EntryAction::Preserved);
    let skipped = report.count(EntryAction::NeedsUpdateFlag);
    let failed = report.failed_count();

    println!(
        "{prefix}✓ profile '{}' ({written} written, {unchanged} unchanged, {preserved} preserved, {skipped} skipped, {failed} failed)",
        report.profile,
    );

    for entry in &report.entries {
        let glyph = match entry.action {
            EntryAction::Written => "✎",
            EntryAction::Created => "+",
            EntryAction::Unchanged => "·",
            EntryAction::Preserved => "≡",
            EntryAction::NeedsUpdateFlag => "⚑",
            EntryAction::WouldWrite => "~",
            EntryAction::Failed => "✗",
        };
        println!("  {glyph}  {}", entry.destination.display());
        if let Some(error) = &entry.error {
            println!("     error: {error}");
        }
        if !entry.unresolved.is_empty() {
            println!("     unresolved: {}", entry.unresolved.join(", "));
        }
    }

    if let Some(mirror) = &report.mirror {
        use stencil_sync::MirrorOutcome;
        match (&mirror.outcome, &mirror.error) {
            (Some(MirrorOutcome::Linked { mirror, canonical }), _) => {
                println!("  +  mirror {} -> {}", mirror.display(), canonical.display());
            }
            (Some(MirrorOutcome::AlreadyLinked { mirror }), _) => {
                println!("  ·  mirror {} (already linked)", mirror.display());
            }
            (Some(MirrorOutcome::WouldLink { mirror }), _) => {
                println!("  ~  mirror {}", mirror.display());
            }
            (None, Some(error)) => println!("  ✗  mirror: {error}"),
            (None, None) => {}
        }
    }

    if skipped > 0 {
        println!("Run again with --update to adopt files that predate the markers.");
    }
}
