//! `stencil drift` — staleness visibility between templates and artifacts.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use stencil_core::ProfileName;
use stencil_sync::{
    drift::{check_profile, format_system_time_age},
    DriftRecord, DriftStatus,
};

/// Arguments for `stencil drift`.
#[derive(Args, Debug)]
pub struct DriftArgs {
    /// Target directory the artifacts were installed into.
    pub target: PathBuf,

    /// Profile name whose manifest drives the audit.
    #[arg(long, short = 'p')]
    pub profile: String,

    /// Source root containing `profiles/` and `templates/` (default: ~/.stencil).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DriftArgs {
    pub fn run(self) -> Result<()> {
        let source = super::resolve_source_root(self.source)?;
        let records = check_profile(
            &source,
            &self.target,
            &ProfileName::from(self.profile.clone()),
        )
        .with_context(|| format!("drift check failed for profile '{}'", self.profile))?;

        if self.json {
            print_json(&self.profile, &self.target, &records)?;
            return Ok(());
        }

        print_table(&self.profile, &self.target, &records);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DriftReportJson {
    summary: DriftSummaryJson,
    artifacts: Vec<DriftRecordJson>,
}

#[derive(Serialize)]
struct DriftSummaryJson {
    profile: String,
    entries: usize,
    outdated: usize,
    missing: usize,
}

#[derive(Serialize)]
struct DriftRecordJson {
    destination: String,
    status: DriftStatus,
    installed_at: Option<String>,
    source_at: String,
}

fn rfc3339(timestamp: SystemTime) -> String {
    DateTime::<Utc>::from(timestamp).to_rfc3339()
}

fn print_json(profile: &str, target: &Path, records: &[DriftRecord]) -> Result<()> {
    let payload = DriftReportJson {
        summary: DriftSummaryJson {
            profile: profile.to_string(),
            entries: records.len(),
            outdated: count(records, DriftStatus::Outdated),
            missing: count(records, DriftStatus::Missing),
        },
        artifacts: records
            .iter()
            .map(|record| DriftRecordJson {
                destination: relative_to(record, target),
                status: record.status,
                installed_at: record.installed_mtime.map(rfc3339),
                source_at: rfc3339(record.source_mtime),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize drift JSON")?
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Table output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct DriftTableRow {
    #[tabled(rename = "artifact")]
    artifact: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "installed")]
    installed: String,
    #[tabled(rename = "source age")]
    source_age: String,
}

fn print_table(profile: &str, target: &Path, records: &[DriftRecord]) {
    let outdated = count(records, DriftStatus::Outdated);
    let missing = count(records, DriftStatus::Missing);
    println!(
        "stencil v{} | profile '{}' | {} managed artifacts | {} outdated | {} missing",
        env!("CARGO_PKG_VERSION"),
        profile,
        records.len(),
        outdated,
        missing,
    );

    if records.is_empty() {
        println!("No managed artifacts in this profile's manifest.");
        return;
    }

    println!(
        "Indicators: {} CURRENT  {} OUTDATED  {} MISSING",
        status_indicator(DriftStatus::Current),
        status_indicator(DriftStatus::Outdated),
        status_indicator(DriftStatus::Missing),
    );

    let rows: Vec<DriftTableRow> = records
        .iter()
        .map(|record| DriftTableRow {
            artifact: relative_to(record, target),
            status: format!(
                "{} {}",
                status_indicator(record.status),
                status_label(record.status)
            ),
            installed: record
                .installed_mtime
                .map(format_system_time_age)
                .unwrap_or_else(|| "never".to_string()),
            source_age: format_system_time_age(record.source_mtime),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if outdated + missing > 0 {
        println!("Run 'stencil install' to refresh outdated artifacts.");
    }
}

fn count(records: &[DriftRecord], status: DriftStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

fn relative_to(record: &DriftRecord, target: &Path) -> String {
    record
        .destination
        .strip_prefix(target)
        .unwrap_or(record.destination.as_path())
        .display()
        .to_string()
}

fn status_label(status: DriftStatus) -> &'static str {
    match status {
        DriftStatus::Current => "CURRENT",
        DriftStatus::Outdated => "OUTDATED",
        DriftStatus::Missing => "MISSING",
    }
}

fn status_indicator(status: DriftStatus) -> String {
    match status {
        DriftStatus::Current => "■".green().bold().to_string(),
        DriftStatus::Outdated => "■".yellow().bold().to_string(),
        DriftStatus::Missing => "■".red().bold().to_string(),
    }
}
