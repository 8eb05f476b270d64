//! Structured parse errors
//!
//! Errors carry the line number, column and a short excerpt of the offending
//! line with a caret under the failing character, so build diagnostics can point
//! at the exact spot in a hand-edited file.

use super::cursor::CursorState;
use thiserror::Error;

/// Characters of context shown before the error position
const CONTEXT_BEFORE: usize = 30;
/// Characters of context shown after the error position
const CONTEXT_AFTER: usize = 10;

/// A fatal error raised while parsing XML text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line_number}, char {column}: {description}\n{context}\n{arrow}")]
pub struct ParseError {
    /// 1-based line number
    pub line_number: usize,
    /// Byte offset where the line starts
    pub line_start: usize,
    /// Byte offset of the error
    pub position: usize,
    /// Character offset of the error within its line
    pub column: usize,
    /// Excerpt of the line around the error
    pub context: String,
    /// Caret line aligned under the error column of `context`
    pub arrow: String,
    /// Human readable description
    pub description: String,
}

impl ParseError {
    /// Build an error for `text` at the cursor snapshot `state`
    pub fn new(text: &str, state: CursorState, description: impl Into<String>) -> Self {
        let position = state.position.min(text.len());
        let line_start = state.line_start.min(position);

        // Walk back at most CONTEXT_BEFORE chars, stopping at the line start
        let mut start = position;
        let mut arrow = String::from("^");
        for (offset, c) in text[..position].char_indices().rev().take(CONTEXT_BEFORE) {
            if c == '\n' {
                break;
            }
            start = offset;
            arrow.insert(0, ' ');
        }

        // Walk forward at most CONTEXT_AFTER chars, stopping at the line end
        let mut end = position;
        for (offset, c) in text[position..].char_indices().take(CONTEXT_AFTER) {
            if c == '\n' {
                break;
            }
            end = position + offset + c.len_utf8();
        }

        ParseError {
            line_number: state.line_number,
            line_start,
            position,
            column: text[line_start..position].chars().count(),
            context: text[start..end].to_string(),
            arrow,
            description: description.into(),
        }
    }
}
