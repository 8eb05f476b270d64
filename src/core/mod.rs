//! Core XML scanning primitives
//!
//! This module contains the building blocks the parser is made of:
//! - Cursor: position-tracking character reader with memchr-accelerated searches
//! - Entities: named/numeric character references and output escaping
//! - Error: structured parse errors with line, column and context excerpt

pub mod cursor;
pub mod entities;
pub mod error;

pub use cursor::{Cursor, CursorState};
pub use error::ParseError;
