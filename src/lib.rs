//! deckxml - XML tree, parser and SVG inlining for slide-deck builds
//!
//! Layers:
//! - `core`: scanning cursor, entity table, positioned parse errors
//! - `dom`: owned element tree, lenient parser, whitespace passes, serializer
//! - `defs`: SVG cleanup and `<defs>` deduplication across files
//! - `strategy`: parallel batch parsing
//!
//! ```
//! let mut root = deckxml::parse("<svg><g>\n  <rect/>\n</g></svg>").unwrap();
//! root.remove_whitespace();
//! assert_eq!(root.stringify(), "<svg><g><rect /></g></svg>");
//! ```

pub mod config;
pub mod core;
pub mod defs;
pub mod dom;
pub mod strategy;

pub use config::{ConfigError, InlineOptions};
pub use crate::core::{CursorState, ParseError};
pub use defs::{DefsRegistry, InlineError, SvgInliner};
pub use dom::{parse, AttrValue, Attributes, Element, Node};
pub use strategy::LoadError;
