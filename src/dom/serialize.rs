//! Deterministic XML output
//!
//! Attributes are written sorted by key so the same tree always produces the
//! same text, which keeps output stable enough to hash.

use super::node::{Element, Node};
use crate::core::entities::{encode_comment, encode_text};

impl Element {
    /// Serialize this element (or the root's forest) to a string
    pub fn stringify(&self) -> String {
        let mut output = String::new();
        self.write_to(&mut output);
        output
    }

    /// Append the serialized form to `output`
    pub fn write_to(&self, output: &mut String) {
        let Some(tag) = self.tag() else {
            write_children(&self.children, output);
            return;
        };

        output.push('<');
        output.push_str(tag);
        for (key, value) in self.attributes.sorted() {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&encode_text(value.as_str()));
            output.push('"');
        }

        if self.children.is_empty() {
            output.push_str(if tag.starts_with('?') { " ?>" } else { " />" });
            return;
        }

        output.push('>');
        write_children(&self.children, output);
        output.push_str("</");
        output.push_str(tag);
        output.push('>');
    }
}

impl Node {
    /// Serialize this node to a string
    pub fn stringify(&self) -> String {
        let mut output = String::new();
        self.write_to(&mut output);
        output
    }

    /// Append the serialized form to `output`
    pub fn write_to(&self, output: &mut String) {
        match self {
            Node::Element(element) => element.write_to(output),
            Node::Text(text) => output.push_str(&encode_text(text)),
            Node::CData(cdata) => {
                output.push_str("<![CDATA[");
                output.push_str(cdata);
                output.push_str("]]>");
            }
            Node::Comment(comment) => {
                output.push_str("<!--");
                output.push_str(&encode_comment(comment));
                output.push_str("-->");
            }
            Node::Declaration(declaration) => {
                output.push_str("<!");
                output.push_str(declaration);
                output.push('>');
            }
        }
    }
}

fn write_children(children: &[Node], output: &mut String) {
    for child in children {
        child.write_to(output);
    }
}
