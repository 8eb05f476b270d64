//! Whitespace cleanup and re-indentation
//!
//! Both passes leave elements marked `xml:space="preserve"` untouched,
//! together with everything below them.

use super::node::{Element, Node};

impl Element {
    /// Drop whitespace-only text children, recursively
    pub fn remove_whitespace(&mut self) {
        if self.preserves_space() {
            return;
        }

        self.children.retain(|child| match child {
            Node::Text(text) => !text.trim().is_empty(),
            _ => true,
        });
        for child in self.children.iter_mut().filter_map(Node::as_element_mut) {
            child.remove_whitespace();
        }
    }

    /// Re-indent children with tabs for pretty output.
    ///
    /// A lone text child is trimmed and kept inline. Otherwise every child is
    /// put on its own line one tab deeper than `indent`, and a tagged element
    /// gets a closing newline at `indent`. The virtual root indents its
    /// children at `indent` itself.
    pub fn normalize_whitespace(&mut self, indent: &str) {
        if self.preserves_space() || self.children.is_empty() {
            return;
        }

        if let [Node::Text(text)] = self.children.as_mut_slice() {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                *text = trimmed.to_string();
            }
            return;
        }

        let child_indent = if self.is_root() {
            indent.to_string()
        } else {
            format!("{indent}\t")
        };
        let line_break = format!("\n{child_indent}");

        let mut children = Vec::with_capacity(self.children.len() * 2 + 1);
        for child in std::mem::take(&mut self.children) {
            match child {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        children.push(Node::Text(format!("{line_break}{trimmed}")));
                    }
                }
                mut other => {
                    children.push(Node::Text(line_break.clone()));
                    if let Node::Element(element) = &mut other {
                        element.normalize_whitespace(&child_indent);
                    }
                    children.push(other);
                }
            }
        }

        if !self.is_root() && !children.is_empty() {
            children.push(Node::Text(format!("\n{indent}")));
        }
        self.children = children;
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parser::parse;

    fn normalized(input: &str) -> String {
        let mut root = parse(input).unwrap();
        root.normalize_whitespace("");
        root.stringify()
    }

    #[test]
    fn test_remove_whitespace() {
        let mut root = parse("<a>\n  <b> x </b>\n  <c>  </c>\n</a>").unwrap();
        root.remove_whitespace();
        assert_eq!(root.stringify(), "<a><b> x </b><c /></a>");
    }

    #[test]
    fn test_remove_whitespace_respects_preserve() {
        let input = "<a><t xml:space=\"preserve\"> <tspan> </tspan> </t> <u> <v> </v> </u></a>";
        let mut root = parse(input).unwrap();
        root.remove_whitespace();
        assert_eq!(
            root.stringify(),
            "<a><t xml:space=\"preserve\"> <tspan> </tspan> </t><u><v /></u></a>"
        );
    }

    #[test]
    fn test_nested_preserve_regions() {
        let input = "<a xml:space=\"preserve\"> <b xml:space=\"default\"> </b> </a>";
        let mut root = parse(input).unwrap();
        root.remove_whitespace();
        // the preserve on <a> shields <b> too
        assert_eq!(root.stringify(), input);

        let input = "<r> <a xml:space=\"preserve\"> </a> <b> </b> </r>";
        let mut root = parse(input).unwrap();
        root.remove_whitespace();
        assert_eq!(root.stringify(), "<r><a xml:space=\"preserve\"> </a><b /></r>");
    }

    #[test]
    fn test_normalize_single_text_stays_inline() {
        assert_eq!(normalized("<title>  Hello  </title>"), "\n<title>Hello</title>");
    }

    #[test]
    fn test_normalize_nested() {
        let output = normalized("<svg><g><rect/>text<circle/></g></svg>");
        assert_eq!(
            output,
            "\n<svg>\n\t<g>\n\t\t<rect />\n\t\ttext\n\t\t<circle />\n\t</g>\n</svg>"
        );
    }

    #[test]
    fn test_normalize_with_base_indent() {
        let mut svg = parse("<svg><defs/></svg>").unwrap();
        let svg = svg.first_child_with_tag_mut("svg").unwrap();
        svg.normalize_whitespace("\t\t");
        assert_eq!(svg.stringify(), "<svg>\n\t\t\t<defs />\n\t\t</svg>");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = "<a>\n x <b>  y </b><!-- c --><d><e/> </d>  z</a>";
        let mut once = parse(input).unwrap();
        once.normalize_whitespace("");
        let mut twice = once.clone();
        twice.normalize_whitespace("");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_skips_preserve() {
        let input = "<a><text xml:space=\"preserve\">  a <tspan> b </tspan></text></a>";
        let output = normalized(input);
        assert_eq!(
            output,
            "\n<a>\n\t<text xml:space=\"preserve\">  a <tspan> b </tspan></text>\n</a>"
        );
    }
}
