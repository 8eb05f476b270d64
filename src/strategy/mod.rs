//! Parsing Strategy Module
//!
//! Batch strategies on top of the single-document parser:
//! - Parallel parse of in-memory texts
//! - Parallel load of files, with per-file errors or skip-and-log

pub mod parallel;

pub use parallel::{load_all, load_parallel, parse_map, parse_parallel, LoadError};
