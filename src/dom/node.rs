//! XML tree nodes
//!
//! A document is an owned tree: every element owns its attributes and its
//! children exclusively, and there are no parent links. Context about
//! ancestors is handed to traversal visitors explicitly instead.

use super::attributes::{AttrValue, Attributes};

/// A node in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with tag, attributes and children
    Element(Element),
    /// Decoded character data (entities already resolved)
    Text(String),
    /// Raw CDATA section content
    CData(String),
    /// Comment content
    Comment(String),
    /// Raw markup declaration between `<!` and `>`, e.g. a DOCTYPE
    Declaration(String),
}

impl Node {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Create a CDATA node
    pub fn cdata(text: impl Into<String>) -> Self {
        Node::CData(text.into())
    }

    /// Create a comment node
    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment(text.into())
    }

    /// Create a markup declaration node from the text between `<!` and `>`
    pub fn declaration(text: impl Into<String>) -> Self {
        Node::Declaration(text.into())
    }

    /// Tag of an element node. None for roots and non-element nodes.
    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.as_element().and_then(Element::tag)
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text of a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Concatenated text and CDATA content. Comments and declarations
    /// contribute nothing.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Node::Text(text) | Node::CData(text) => out.push_str(text),
            Node::Comment(_) | Node::Declaration(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element, or the tagless virtual root holding a forest of top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, None for the virtual root
    pub tag: Option<String>,
    /// Attribute map
    pub attributes: Attributes,
    /// Children in document order
    pub children: Vec<Node>,
}

/// Owned view of an ancestor handed to mutable traversal visitors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub tag: String,
    pub attributes: Attributes,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    /// Create an empty virtual root
    pub fn root() -> Self {
        Element::default()
    }

    /// Create an element from its parts
    pub fn from_parts(tag: impl Into<String>, attributes: Attributes, children: Vec<Node>) -> Self {
        Element {
            tag: Some(tag.into()),
            attributes,
            children,
        }
    }

    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Check if this is a tagless virtual root
    #[inline]
    pub fn is_root(&self) -> bool {
        self.tag.is_none()
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Attribute value as text (flags read as `"true"`)
    #[inline]
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes.value(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.set(name, value);
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttrValue> {
        self.attributes.remove(name)
    }

    /// Append a child
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Check for `xml:space="preserve"`
    pub fn preserves_space(&self) -> bool {
        self.attribute_value("xml:space") == Some("preserve")
    }

    /// First direct child element with the given tag
    pub fn first_child_with_tag(&self, tag: &str) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find(|child| child.tag() == Some(tag))
    }

    /// Mutable variant of [`Element::first_child_with_tag`]
    pub fn first_child_with_tag_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|child| child.tag() == Some(tag))
    }

    /// Direct child elements with the given tag
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .filter(move |child| child.tag() == Some(tag))
    }

    /// First direct child matching `predicate`
    pub fn first_child_with<P>(&self, mut predicate: P) -> Option<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        self.children.iter().find(|child| predicate(*child))
    }

    /// Direct children matching `predicate`
    pub fn children_with<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a Node> + 'a
    where
        P: FnMut(&Node) -> bool + 'a,
    {
        self.children.iter().filter(move |child| predicate(*child))
    }

    /// Remove direct child elements with the given tag
    pub fn remove_children_with_tag(&mut self, tag: &str) {
        self.children.retain(|child| child.tag() != Some(tag));
    }

    /// Remove direct children matching `predicate`, keeping survivor order
    pub fn remove_children_with<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&Node) -> bool,
    {
        self.children.retain(|child| !predicate(child));
    }

    /// Visit every tagged element in pre-order.
    ///
    /// The visitor receives the element and its tagged ancestors, closest
    /// last. A tagless root is walked through but never visited.
    pub fn traverse_nodes<F>(&self, mut visitor: F)
    where
        F: FnMut(&Element, &[&Element]),
    {
        let mut parents = Vec::new();
        walk(self, &mut parents, &mut visitor);
    }

    /// Visit every tagged element in pre-order with mutable access.
    ///
    /// Ancestors are passed as owned snapshots taken after their own visit.
    /// An element's children are walked as they are once its visitor returns.
    pub fn traverse_nodes_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut Element, &[Ancestor]),
    {
        let mut parents = Vec::new();
        walk_mut(self, &mut parents, &mut visitor);
    }

    /// Concatenated text and CDATA content of all descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            child.collect_text(&mut text);
        }
        text
    }
}

fn walk<'a, F>(element: &'a Element, parents: &mut Vec<&'a Element>, visitor: &mut F)
where
    F: FnMut(&Element, &[&Element]),
{
    let tagged = element.tag.is_some();
    if tagged {
        visitor(element, parents.as_slice());
        parents.push(element);
    }
    for child in element.children.iter().filter_map(Node::as_element) {
        walk(child, parents, visitor);
    }
    if tagged {
        parents.pop();
    }
}

fn walk_mut<F>(element: &mut Element, parents: &mut Vec<Ancestor>, visitor: &mut F)
where
    F: FnMut(&mut Element, &[Ancestor]),
{
    if element.tag.is_some() {
        visitor(&mut *element, parents.as_slice());
    }

    let pushed = match &element.tag {
        Some(tag) => {
            parents.push(Ancestor {
                tag: tag.clone(),
                attributes: element.attributes.clone(),
            });
            true
        }
        None => false,
    };
    for child in element.children.iter_mut().filter_map(Node::as_element_mut) {
        walk_mut(child, parents, visitor);
    }
    if pushed {
        parents.pop();
    }
}
