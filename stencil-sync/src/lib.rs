//! # stencil-sync
//!
//! The three-way sync policy engine with atomic writes, plus the read-only
//! drift audit, mirror management, and unified diff preview.
//!
//! Call [`install`] to apply a profile's manifest to a target tree, or
//! [`drift::check_profile`] to audit staleness without writing anything.

pub mod diff;
pub mod drift;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod mirror;
pub mod writer;

pub use diff::{preview, DiffReport, FileDiff};
pub use drift::{DriftRecord, DriftStatus};
pub use engine::{install, EntryAction, EntryReport, InstallOptions, InstallReport, MirrorReport};
pub use error::SyncError;
pub use merge::{BEGIN_MARKER, END_MARKER};
pub use mirror::MirrorOutcome;
pub use writer::WriteResult;
