//! Recursive-descent XML parser
//!
//! Builds an owned tree from XML text by alternating between a text state and
//! a tag state. Open elements live on an explicit stack, so document depth is
//! not limited by the call stack.
//!
//! Malformed input is tolerated rather than rejected:
//! - a closing tag that does not match the innermost open element is ignored
//! - elements still open at end of input are closed implicitly
//! - duplicate attributes keep the last value
//! - unterminated comments, CDATA sections and declarations run to end of input
//!
//! Only undecodable entity references are fatal.

use super::attributes::AttrValue;
use super::node::{Element, Node};
use crate::core::cursor::{is_whitespace, Cursor};
use crate::core::entities;
use crate::core::error::ParseError;
use log::trace;

/// Parse XML text into a tagless root holding the top-level nodes
pub fn parse(text: &str) -> Result<Element, ParseError> {
    Parser::new(text).parse()
}

/// Parser state: the cursor plus the stack of open elements
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    /// Virtual root, bottom of the stack
    root: Element,
    /// Elements opened but not yet closed, innermost last
    open: Vec<Element>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(text),
            root: Element::root(),
            open: Vec::new(),
        }
    }

    /// Run the parser to the end of input
    pub fn parse(mut self) -> Result<Element, ParseError> {
        while !self.cursor.is_at_end() {
            self.text()?;
            self.node()?;
        }
        Ok(self.finish())
    }

    /// Close everything still open and hand back the root
    fn finish(mut self) -> Element {
        if !self.open.is_empty() {
            trace!("closing {} unterminated element(s) at end of input", self.open.len());
        }
        while let Some(element) = self.open.pop() {
            self.top().children.push(Node::Element(element));
        }
        self.root
    }

    /// Innermost open element
    fn top(&mut self) -> &mut Element {
        match self.open.last_mut() {
            Some(element) => element,
            None => &mut self.root,
        }
    }

    fn add_child(&mut self, node: Node) {
        self.top().children.push(node);
    }

    fn close_element(&mut self, tag: &str) {
        if self.open.last().is_some_and(|top| top.tag() == Some(tag)) {
            if let Some(element) = self.open.pop() {
                self.add_child(Node::Element(element));
            }
        } else {
            trace!("ignoring unmatched closing tag </{}> at byte {}", tag, self.cursor.position());
        }
    }

    /// Text state: everything up to the next `<`
    fn text(&mut self) -> Result<(), ParseError> {
        let mut text = String::new();
        loop {
            text.push_str(self.cursor.read_to_any(b'<', b'&'));
            if !self.cursor.is('&') {
                break;
            }
            text.push(self.entity()?);
        }

        if !text.is_empty() {
            self.add_child(Node::Text(text));
        }
        Ok(())
    }

    /// Tag state: dispatch on what follows `<`
    fn node(&mut self) -> Result<(), ParseError> {
        if !self.cursor.is('<') {
            return Ok(());
        }
        self.cursor.next();

        if self.cursor.is('/') {
            self.closing_tag();
            return Ok(());
        }
        if self.cursor.read("!--") {
            let (comment, _) = self.cursor.read_until("-->");
            self.add_child(Node::Comment(comment.to_string()));
            return Ok(());
        }
        if self.cursor.read("![CDATA[") {
            let (cdata, _) = self.cursor.read_until("]]>");
            self.add_child(Node::CData(cdata.to_string()));
            return Ok(());
        }
        if self.cursor.is('!') {
            self.declaration();
            return Ok(());
        }
        self.start_tag()
    }

    /// Markup declaration after `<`, kept raw up to the `>` that is outside
    /// quotes and outside any `[...]` internal subset
    fn declaration(&mut self) {
        self.cursor.next();
        let start = self.cursor.position();
        let mut quote = None;
        let mut depth = 0usize;
        while let Some(c) = self.cursor.current() {
            match (quote, c) {
                (Some(open), _) if c == open => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => break,
                _ => {}
            }
            self.cursor.next();
        }
        let declaration = &self.cursor.text()[start..self.cursor.position()];
        self.cursor.next();
        self.add_child(Node::Declaration(declaration.to_string()));
    }

    fn closing_tag(&mut self) {
        self.cursor.next();
        let tag = self.cursor.read_all(|c| c != '>' && !is_whitespace(c));
        self.cursor.skip_all(|c| c != '>');
        self.cursor.next();
        self.close_element(tag);
    }

    fn start_tag(&mut self) -> Result<(), ParseError> {
        // Processing instructions never have content
        let instruction = self.cursor.read("?");
        let name = self
            .cursor
            .read_all(|c| !is_whitespace(c) && !matches!(c, '>' | '/' | '?'));
        let mut element = if instruction {
            Element::new(format!("?{name}"))
        } else {
            Element::new(name)
        };

        let mut closed = instruction;
        loop {
            self.cursor.skip_all(is_whitespace);
            match self.cursor.current() {
                None => break,
                Some('>') => {
                    self.cursor.next();
                    break;
                }
                Some('/') => {
                    self.cursor.next();
                    closed = true;
                }
                Some('?') => self.cursor.next(),
                Some(_) => {
                    let key = self
                        .cursor
                        .read_all(|c| !is_whitespace(c) && !matches!(c, '>' | '=' | '/'));
                    self.cursor.skip_all(is_whitespace);
                    let value = if self.cursor.is('=') {
                        AttrValue::Text(self.attribute_value()?)
                    } else {
                        AttrValue::Flag
                    };
                    element.attributes.set(key, value);
                }
            }
        }

        if closed {
            self.add_child(Node::Element(element));
        } else {
            self.open.push(element);
        }
        Ok(())
    }

    /// Value after `=`: quoted with `'` or `"`, or bare up to whitespace or `>`
    fn attribute_value(&mut self) -> Result<String, ParseError> {
        self.cursor.skip_all(|c| c == '=' || is_whitespace(c));
        match self.cursor.current() {
            Some(quote @ ('"' | '\'')) => {
                self.cursor.next();
                let value = self.decoded_until(|c| c == quote)?;
                self.cursor.next();
                Ok(value)
            }
            _ => self.decoded_until(|c| is_whitespace(c) || c == '>'),
        }
    }

    /// Read characters until `stop` matches, decoding entity references
    fn decoded_until<F>(&mut self, stop: F) -> Result<String, ParseError>
    where
        F: Fn(char) -> bool,
    {
        let mut value = String::new();
        while let Some(c) = self.cursor.current() {
            if stop(c) {
                break;
            }
            if c == '&' {
                value.push(self.entity()?);
            } else {
                value.push(c);
                self.cursor.next();
            }
        }
        Ok(value)
    }

    /// Decode `&name;`, `&#N;` or `&#xH;`. The trailing `;` is optional.
    fn entity(&mut self) -> Result<char, ParseError> {
        let start = self.cursor.state();
        self.cursor.next();

        let decoded = if self.cursor.read("#") {
            let body = self.cursor.read_all(|c| c.is_ascii_alphanumeric());
            entities::decode_numeric(body).ok_or_else(|| {
                self.cursor
                    .error_at(start, format!("Invalid character reference '&#{body};'"))
            })
        } else {
            let name = self.cursor.read_all(|c| c.is_ascii_alphanumeric());
            entities::lookup(name)
                .ok_or_else(|| self.cursor.error_at(start, format!("Unknown entity '&{name};'")))
        }?;

        if self.cursor.is(';') {
            self.cursor.next();
        }
        Ok(decoded)
    }
}
