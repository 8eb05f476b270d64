//! Position-tracking character cursor
//!
//! Reads an immutable `&str` one character at a time, tracking the line
//! number and line start so errors can be reported with context.
//!
//! Terminator searches use the memchr crate:
//! - `memmem` for multi-byte literals such as `-->` and `]]>`
//! - `memchr2` for text runs ending at `<` or `&`

use super::error::ParseError;
use memchr::{memchr2, memchr_iter, memmem};

/// Snapshot of a cursor position, used for error attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    /// 1-based line number
    pub line_number: usize,
    /// Byte offset of the first character of the current line
    pub line_start: usize,
    /// Byte offset of the current character
    pub position: usize,
}

/// Character cursor over XML text
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line_number: usize,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `text`
    pub fn new(text: &'a str) -> Self {
        Cursor {
            text,
            pos: 0,
            line_number: 1,
            line_start: 0,
        }
    }

    /// The full input text
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Current byte position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current character, `None` at end of input
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Code point of the current character, `None` at end of input
    #[inline]
    pub fn code(&self) -> Option<u32> {
        self.current().map(u32::from)
    }

    /// Check whether the current character is `c`
    #[inline]
    pub fn is(&self, c: char) -> bool {
        self.current() == Some(c)
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Advance by one character. A newline starts a new line.
    pub fn next(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line_number += 1;
                self.line_start = self.pos;
            }
        }
    }

    /// Snapshot the current position
    pub fn state(&self) -> CursorState {
        CursorState {
            line_number: self.line_number,
            line_start: self.line_start,
            position: self.pos,
        }
    }

    /// Restore a snapshot taken from this cursor.
    ///
    /// A position past the end or inside a multi-byte character is moved
    /// back to the nearest character boundary.
    pub fn set_state(&mut self, state: CursorState) {
        let mut pos = state.position.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        self.pos = pos;
        self.line_number = state.line_number;
        self.line_start = state.line_start.min(pos);
    }

    /// Consume and return the longest run of characters matching `predicate`
    pub fn read_all<F>(&mut self, predicate: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.current() {
            if !predicate(c) {
                break;
            }
            self.next();
        }
        &self.text[start..self.pos]
    }

    /// Skip the longest run of characters matching `predicate`
    pub fn skip_all<F>(&mut self, predicate: F)
    where
        F: Fn(char) -> bool,
    {
        self.read_all(predicate);
    }

    /// Check if the input continues with `literal` at the current position
    #[inline]
    pub fn continues_with(&self, literal: &str) -> bool {
        self.text[self.pos..].starts_with(literal)
    }

    /// Consume `literal` if the input continues with it.
    /// Nothing is consumed when it does not match.
    pub fn read(&mut self, literal: &str) -> bool {
        if !self.continues_with(literal) {
            return false;
        }
        self.advance_to(self.pos + literal.len());
        true
    }

    /// Consume everything up to and including the next `literal`.
    ///
    /// Returns the text before the literal and whether it was found. When the
    /// literal never occurs the rest of the input is consumed and returned.
    pub fn read_until(&mut self, literal: &str) -> (&'a str, bool) {
        let rest = &self.text[self.pos..];
        match memmem::find(rest.as_bytes(), literal.as_bytes()) {
            Some(offset) => {
                self.advance_to(self.pos + offset + literal.len());
                (&rest[..offset], true)
            }
            None => {
                self.advance_to(self.text.len());
                (rest, false)
            }
        }
    }

    /// Consume the run of text before the next ASCII byte `a` or `b`
    pub fn read_to_any(&mut self, a: u8, b: u8) -> &'a str {
        let rest = &self.text[self.pos..];
        let offset = memchr2(a, b, rest.as_bytes()).unwrap_or(rest.len());
        self.advance_to(self.pos + offset);
        &rest[..offset]
    }

    /// Jump forward to `target`, counting the newlines skipped over
    fn advance_to(&mut self, target: usize) {
        let skipped = &self.text.as_bytes()[self.pos..target];
        for offset in memchr_iter(b'\n', skipped) {
            self.line_number += 1;
            self.line_start = self.pos + offset + 1;
        }
        self.pos = target;
    }

    /// Build an error at the current position
    pub fn error(&self, description: impl Into<String>) -> ParseError {
        ParseError::new(self.text, self.state(), description)
    }

    /// Build an error at a previously saved position
    pub fn error_at(&self, state: CursorState, description: impl Into<String>) -> ParseError {
        ParseError::new(self.text, state, description)
    }
}

#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_lowercase_letter(c: char) -> bool {
    c.is_ascii_lowercase()
}

#[inline]
pub fn is_uppercase_letter(c: char) -> bool {
    c.is_ascii_uppercase()
}

#[inline]
pub fn is_letter(c: char) -> bool {
    is_lowercase_letter(c) || is_uppercase_letter(c)
}

/// Tab, line feed, carriage return or space
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' ')
}

/// Tab or space
#[inline]
pub fn is_line_whitespace(c: char) -> bool {
    matches!(c, '\t' | ' ')
}

#[inline]
pub fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tracks_lines() {
        let mut cursor = Cursor::new("a\nbc");
        cursor.next();
        cursor.next();
        assert_eq!(cursor.state(), CursorState { line_number: 2, line_start: 2, position: 2 });
        assert_eq!(cursor.current(), Some('b'));
    }

    #[test]
    fn test_next_at_end_is_noop() {
        let mut cursor = Cursor::new("x");
        cursor.next();
        cursor.next();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.code(), None);
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_read_all() {
        let mut cursor = Cursor::new("element-name>");
        assert_eq!(cursor.read_all(|c| c != '>'), "element-name");
        assert_eq!(cursor.position(), 12);
        assert_eq!(cursor.read_all(is_letter), "");
    }

    #[test]
    fn test_skip_whitespace() {
        let mut cursor = Cursor::new("  \t\n hello");
        cursor.skip_all(is_whitespace);
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.state().line_number, 2);
    }

    #[test]
    fn test_read_literal_is_non_destructive() {
        let mut cursor = Cursor::new("!-x");
        assert!(!cursor.read("!--"));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.read("!-"));
        assert_eq!(cursor.current(), Some('x'));
    }

    #[test]
    fn test_read_until() {
        let mut cursor = Cursor::new("one\ntwo-->rest");
        assert_eq!(cursor.read_until("-->"), ("one\ntwo", true));
        assert_eq!(cursor.current(), Some('r'));
        assert_eq!(cursor.state().line_number, 2);

        let mut cursor = Cursor::new("unterminated");
        assert_eq!(cursor.read_until("]]>"), ("unterminated", false));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_read_to_any() {
        let mut cursor = Cursor::new("héllo &amp; <b>");
        assert_eq!(cursor.read_to_any(b'<', b'&'), "héllo ");
        assert_eq!(cursor.current(), Some('&'));
    }

    #[test]
    fn test_set_state_rewinds() {
        let mut cursor = Cursor::new("ab\ncd");
        let saved = cursor.state();
        cursor.skip_all(|_| true);
        cursor.set_state(saved);
        assert_eq!(cursor.current(), Some('a'));
        assert_eq!(cursor.state().line_number, 1);
    }

    #[test]
    fn test_set_state_inside_multibyte_char() {
        let mut cursor = Cursor::new("aéb");
        cursor.set_state(CursorState { line_number: 1, line_start: 0, position: 2 });
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.current(), Some('é'));

        cursor.set_state(CursorState { line_number: 1, line_start: 9, position: 99 });
        assert!(cursor.is_at_end());
        assert_eq!(cursor.state(), CursorState { line_number: 1, line_start: 4, position: 4 });
    }

    #[test]
    fn test_classifiers() {
        assert!(is_digit('7'));
        assert!(is_letter('q') && is_letter('Q'));
        assert!(!is_letter('é'));
        assert!(is_whitespace('\r'));
        assert!(!is_line_whitespace('\n'));
        assert!(is_line_break('\n'));
    }

    #[test]
    fn test_error_reports_column() {
        let mut cursor = Cursor::new("<a>\n<b>");
        cursor.skip_all(|c| c != 'b');
        let error = cursor.error("boom");
        assert_eq!(error.line_number, 2);
        assert_eq!(error.column, 1);
    }
}
