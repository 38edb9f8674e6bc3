//! # stencil-render
//!
//! Literal `{{KEY}}` placeholder substitution over plain-text templates.
//!
//! This is deliberately not a templating language: no conditionals, loops,
//! or includes — flat key→value substitution only, with unresolved markers
//! reported rather than failing the render.
//!
//! ## Usage
//!
//! ```rust
//! use stencil_core::PlaceholderMap;
//! use stencil_render::render;
//!
//! let mut map = PlaceholderMap::new();
//! map.insert("DEFAULT_BRANCH".to_string(), "main".to_string());
//! let r = render("branch={{DEFAULT_BRANCH}}", &map);
//! assert_eq!(r.text, "branch=main");
//! ```

pub mod engine;
pub mod error;
pub mod source;

pub use engine::{render, Rendered};
pub use error::RenderError;
pub use source::load_template;
