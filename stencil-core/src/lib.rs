//! Stencil core library — profile types, profile store, placeholder resolver.
//!
//! Public API surface:
//! - [`types`] — newtypes, the profile document, manifest entries
//! - [`error`] — [`ProfileError`]
//! - [`profile`] — load / list named profiles under a source root
//! - [`resolver`] — profile → flat [`resolver::PlaceholderMap`]

pub mod error;
pub mod profile;
pub mod resolver;
pub mod types;

pub use error::ProfileError;
pub use resolver::PlaceholderMap;
pub use types::{ManifestEntry, Profile, ProfileName, SyncPolicy};
