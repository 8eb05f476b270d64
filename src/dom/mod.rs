//! DOM Module - Owned XML tree
//!
//! Implements a mutable document model using:
//! - Owned element trees with a tagless virtual root for the top-level forest
//! - Insertion-ordered attribute maps with valueless flags
//! - A forgiving single-pass parser with positioned errors
//! - Deterministic serialization and whitespace normalization

pub mod attributes;
pub mod node;
pub mod parser;
pub mod serialize;
pub mod whitespace;

pub use attributes::{AttrValue, Attributes};
pub use node::{Ancestor, Element, Node};
pub use parser::{parse, Parser};
