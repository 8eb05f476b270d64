//! Content-addressed registry of shared SVG definitions
//!
//! One registry lives for one build. Every `<defs>` child of every inlined
//! file is offered to it; structurally identical definitions collapse to a
//! single entry keyed by the SHA-256 of their whitespace-free serialization.
//! Only definitions that something actually references end up in the
//! rendered definitions block.

use std::collections::{HashMap, HashSet};

use log::debug;
use sha2::{Digest, Sha256};

use crate::dom::{Element, Node};

/// Handle to a definition stored in a [`DefsRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefId(usize);

/// A stored definition
#[derive(Debug, Clone)]
pub struct Definition {
    /// The element, with its final `id` applied
    pub element: Element,
    /// Hex SHA-256 of the serialized element as first seen
    pub hash: String,
    /// Id the element is referenced by
    pub id: String,
    /// Number of references rewritten to this definition
    pub used: usize,
}

/// Dedup session for `<defs>` content
#[derive(Debug, Default)]
pub struct DefsRegistry {
    definitions: Vec<Definition>,
    by_hash: HashMap<String, usize>,
    used_ids: HashSet<String>,
    counter: u32,
}

impl DefsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition and return its handle.
    ///
    /// Whitespace-only text is stripped before hashing. A definition whose
    /// hash is already known returns the existing handle and is dropped.
    /// Otherwise it keeps its `id` unless that id is missing or already
    /// taken, in which case it gets a fresh `svg-def-N` id.
    pub fn define(&mut self, mut element: Element) -> DefId {
        element.remove_whitespace();
        let hash = format!("{:x}", Sha256::digest(element.stringify().as_bytes()));

        if let Some(&index) = self.by_hash.get(&hash) {
            debug!("definition {} reuses {}", hash, self.definitions[index].id);
            return DefId(index);
        }

        let id = match element.attribute_value("id") {
            Some(id) if !self.used_ids.contains(id) => id.to_string(),
            _ => self.unique_id(),
        };
        self.used_ids.insert(id.clone());
        element.set_attribute("id", id.as_str());

        debug!("new definition {} as #{}", hash, id);
        let index = self.definitions.len();
        self.by_hash.insert(hash.clone(), index);
        self.definitions.push(Definition {
            element,
            hash,
            id,
            used: 0,
        });
        DefId(index)
    }

    fn unique_id(&mut self) -> String {
        loop {
            self.counter += 1;
            let id = format!("svg-def-{}", self.counter);
            if !self.used_ids.contains(&id) {
                return id;
            }
        }
    }

    /// Record a reference to a definition
    pub fn mark_used(&mut self, def: DefId) {
        if let Some(definition) = self.definitions.get_mut(def.0) {
            definition.used += 1;
        }
    }

    #[inline]
    pub fn get(&self, def: DefId) -> Option<&Definition> {
        self.definitions.get(def.0)
    }

    /// Id a definition is referenced by
    #[inline]
    pub fn id(&self, def: DefId) -> Option<&str> {
        self.get(def).map(|definition| definition.id.as_str())
    }

    /// All definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Render the hidden `<svg><defs>` block holding every used definition.
    ///
    /// Returns None when nothing was referenced.
    pub fn render(&self, indent: &str) -> Option<String> {
        let mut defs = Element::new("defs");
        defs.children.extend(
            self.definitions
                .iter()
                .filter(|definition| definition.used > 0)
                .map(|definition| Node::Element(definition.element.clone())),
        );
        if defs.children.is_empty() {
            return None;
        }

        let mut svg = Element::new("svg");
        svg.set_attribute("width", "0");
        svg.set_attribute("height", "0");
        svg.set_attribute("style", "position: fixed; x: 0; y: 0");
        svg.push(defs);
        svg.normalize_whitespace(indent);
        Some(svg.stringify())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn element(text: &str) -> Element {
        let mut root = parse(text).unwrap();
        match root.children.remove(0) {
            Node::Element(element) => element,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_identical_definitions_collapse() {
        let mut registry = DefsRegistry::new();
        let a = registry.define(element(r#"<linearGradient id="g"><stop offset="0"/></linearGradient>"#));
        let b = registry.define(element("<linearGradient id=\"g\">\n  <stop offset=\"0\"/>\n</linearGradient>"));
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.id(a), Some("g"));
    }

    #[test]
    fn test_colliding_id_is_renamed() {
        let mut registry = DefsRegistry::new();
        let a = registry.define(element(r#"<rect id="r1" width="1"/>"#));
        let b = registry.define(element(r#"<rect id="r1" width="2"/>"#));
        assert_ne!(a, b);
        assert_eq!(registry.id(a), Some("r1"));
        assert_eq!(registry.id(b), Some("svg-def-1"));
        assert_eq!(registry.get(b).unwrap().element.attribute_value("id"), Some("svg-def-1"));
    }

    #[test]
    fn test_missing_id_is_generated() {
        let mut registry = DefsRegistry::new();
        let taken = registry.define(element(r#"<rect id="svg-def-1"/>"#));
        let fresh = registry.define(element("<circle/>"));
        assert_eq!(registry.id(taken), Some("svg-def-1"));
        assert_eq!(registry.id(fresh), Some("svg-def-2"));
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let mut registry = DefsRegistry::new();
        let def = registry.define(element("<g/>"));
        let hash = &registry.get(def).unwrap().hash;
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_render_only_used() {
        let mut registry = DefsRegistry::new();
        let used = registry.define(element(r#"<rect id="r1"/>"#));
        registry.define(element(r#"<rect id="r2"/>"#));
        assert_eq!(registry.render(""), None);

        registry.mark_used(used);
        assert_eq!(
            registry.render("").as_deref(),
            Some(concat!(
                r#"<svg height="0" style="position: fixed; x: 0; y: 0" width="0">"#,
                "\n\t<defs>\n\t\t<rect id=\"r1\" />\n\t</defs>\n</svg>"
            ))
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = DefsRegistry::new();
        first.define(element(r#"<rect id="r1"/>"#));
        let mut second = DefsRegistry::new();
        let def = second.define(element(r#"<rect id="r1"/>"#));
        assert_eq!(second.id(def), Some("r1"));
        assert_eq!(second.len(), 1);
    }
}
