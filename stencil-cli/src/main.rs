//! Stencil — template-driven workflow artifact synchronization CLI.
//!
//! # Usage
//!
//! ```text
//! stencil install <target> --profile <name> [--source <dir>] [--update] [--force] [--dry-run] [--mirror <path>] [--json]
//! stencil drift <target> --profile <name> [--source <dir>] [--json]
//! stencil diff <target> --profile <name> [--source <dir>] [--update]
//! stencil profiles [--source <dir>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, drift::DriftArgs, install::InstallArgs, profiles::ProfilesArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    version,
    about = "Keep generated workflow artifacts in sync with versioned templates",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render and install every manifest entry for a profile.
    Install(InstallArgs),

    /// Report staleness between source templates and installed artifacts.
    Drift(DriftArgs),

    /// Show unified diffs of what install would write.
    Diff(DiffArgs),

    /// List profiles available in the source tree.
    Profiles(ProfilesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Install(args) => args.run(),
        Commands::Drift(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Profiles(args) => args.run(),
    }
}
