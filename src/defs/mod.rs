//! SVG Definitions Module - inlining SVG files with shared `<defs>`
//!
//! Implements the SVG side of the build pipeline:
//! - Editor cleanup (Inkscape/Sodipodi attributes, metadata, default ids)
//! - Style canonicalization and `url(#id)` rewriting
//! - A content-hashed registry deduplicating `<defs>` across files
//! - A per-document inliner tying these together with a parse cache

pub mod clean;
pub mod inline;
pub mod registry;
pub mod style;

pub use clean::Cleaner;
pub use inline::{InlineError, SvgInliner};
pub use registry::{DefId, Definition, DefsRegistry};
