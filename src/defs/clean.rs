//! Editor cleanup for SVG files saved by Inkscape and friends
//!
//! Removes:
//! - editor namespace declarations on the root `<svg>`
//! - `sodipodi:*` and `inkscape:*` attributes everywhere
//! - `<metadata>` and `<sodipodi:namedview>` children of the root
//! - auto-generated ids like `path1234`
//!
//! It also re-targets relative `href`s so they resolve from the output
//! document, and rewrites `style` attributes into a sorted canonical form.

use std::path::{Component, Path, PathBuf};

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use super::style::clean_style;
use crate::dom::{Ancestor, AttrValue, Attributes, Element};

const EDITOR_NAMESPACES: &[&str] = &[
    "xmlns:inkscape",
    "xmlns:rdf",
    "xmlns:dc",
    "xmlns:cc",
    "xmlns:svg",
    "xmlns:sodipodi",
];

const EDITOR_CHILDREN: &[&str] = &["metadata", "sodipodi:namedview"];

const HREF_ATTRIBUTES: &[&str] = &["xlink:href", "href"];

static DEFAULT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(layer|text|tspan|rect|path|g|circle|ellipse|defs|svg|a|polygon|image|use)\d+$")
        .expect("BUG: invalid DEFAULT_ID_RE regex literal")
});

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("BUG: invalid SCHEME_RE regex literal")
});

/// Check for an id an editor assigned automatically
#[inline]
pub fn is_default_id(id: &str) -> bool {
    DEFAULT_ID_RE.is_match(id)
}

/// Remove `sodipodi:*` and `inkscape:*` attributes
pub fn clean_attributes(attributes: &mut Attributes) {
    attributes.retain(|key, _| !key.starts_with("sodipodi:") && !key.starts_with("inkscape:"));
}

/// Cleanup pass over one parsed SVG file
#[derive(Debug, Clone, Copy)]
pub struct Cleaner<'a> {
    /// Folder the SVG file was read from
    pub folder: &'a Path,
    /// Folder of the document the SVG is inlined into
    pub target_dir: &'a Path,
    /// Drop auto-generated ids
    pub strip_ids: bool,
    /// Canonicalize `style` attributes
    pub clean_styles: bool,
}

impl Cleaner<'_> {
    /// Clean the root `<svg>` element and everything below it
    pub fn clean(&self, svg: &mut Element) {
        for name in EDITOR_NAMESPACES {
            svg.remove_attribute(name);
        }
        for tag in EDITOR_CHILDREN {
            svg.remove_children_with_tag(tag);
        }
        svg.traverse_nodes_mut(|node, parents| self.clean_node(node, parents));
    }

    fn clean_node(&self, node: &mut Element, parents: &[Ancestor]) {
        // definitions are looked up by id, whatever it looks like
        let in_defs = parents.iter().any(|parent| parent.tag == "defs");
        if self.strip_ids && !in_defs && node.attribute_value("id").is_some_and(is_default_id) {
            node.remove_attribute("id");
        }

        clean_attributes(&mut node.attributes);

        for name in HREF_ATTRIBUTES {
            let Some(AttrValue::Text(href)) = node.attribute(name) else {
                continue;
            };
            if let Some(relative) = relative_href(href, self.folder, self.target_dir) {
                trace!("rewriting {}=\"{}\" to \"{}\"", name, href, relative);
                node.set_attribute(*name, relative);
            }
        }

        if self.clean_styles {
            if let Some(AttrValue::Text(style)) = node.attribute("style") {
                if !style.is_empty() {
                    let cleaned = clean_style(style);
                    node.set_attribute("style", cleaned);
                }
            }
        }
    }
}

/// Re-target a file reference written relative to `folder` so it resolves
/// from `target_dir`.
///
/// Fragment-only references (`#id`), empty values and URLs with a scheme
/// are left alone and yield None. Paths use `/` separators.
pub fn relative_href(href: &str, folder: &Path, target_dir: &Path) -> Option<String> {
    if href.is_empty() || href.starts_with('#') || SCHEME_RE.is_match(href) {
        return None;
    }

    let resolved = normalize(&std::path::absolute(folder.join(href)).ok()?);
    let base = normalize(&std::path::absolute(target_dir).ok()?);

    let from: Vec<Component> = base.components().collect();
    let to: Vec<Component> = resolved.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::with_capacity(from.len() - common + to.len() - common);
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    parts.extend(to[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()));
    Some(parts.join("/"))
}

/// Resolve `.` and `..` lexically
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn cleaned(input: &str) -> String {
        let mut root = parse(input).unwrap();
        let svg = root.first_child_with_tag_mut("svg").unwrap();
        let cleaner = Cleaner {
            folder: Path::new("/deck/images"),
            target_dir: Path::new("/deck/out"),
            strip_ids: true,
            clean_styles: true,
        };
        cleaner.clean(svg);
        svg.stringify()
    }

    #[test]
    fn test_default_ids() {
        assert!(is_default_id("path1234"));
        assert!(is_default_id("g7"));
        assert!(!is_default_id("path"));
        assert!(!is_default_id("logo"));
        assert!(!is_default_id("mypath12"));
    }

    #[test]
    fn test_editor_noise_removed() {
        let output = cleaned(concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="i" xmlns:sodipodi="s" "#,
            r#"inkscape:version="1.2" id="svg8">"#,
            r##"<metadata><rdf:RDF/></metadata><sodipodi:namedview pagecolor="#fff"/>"##,
            r#"<g id="layer1" inkscape:label="Layer 1"><path id="logo" sodipodi:nodetypes="cc" d="M0 0"/></g>"#,
            "</svg>"
        ));
        assert_eq!(
            output,
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><path d="M0 0" id="logo" /></g></svg>"#
        );
    }

    #[test]
    fn test_definition_ids_kept() {
        let output = cleaned(r#"<svg><defs><rect id="rect1"/></defs><rect id="rect2"/></svg>"#);
        assert_eq!(output, r#"<svg><defs><rect id="rect1" /></defs><rect /></svg>"#);
    }

    #[test]
    fn test_strip_ids_disabled() {
        let mut root = parse(r#"<svg><rect id="rect1"/></svg>"#).unwrap();
        let svg = root.first_child_with_tag_mut("svg").unwrap();
        let cleaner = Cleaner {
            folder: Path::new("."),
            target_dir: Path::new("."),
            strip_ids: false,
            clean_styles: false,
        };
        cleaner.clean(svg);
        assert_eq!(svg.stringify(), r#"<svg><rect id="rect1" /></svg>"#);
    }

    #[test]
    fn test_style_cleaned() {
        let output = cleaned(r##"<svg><rect style="stroke:#000;-inkscape-stroke:none;fill:red"/></svg>"##);
        assert_eq!(output, r##"<svg><rect style="fill: red; stroke: #000" /></svg>"##);
    }

    #[test]
    fn test_href_retargeted() {
        let output = cleaned(r##"<svg><image xlink:href="photo.png"/><use href="#r1"/></svg>"##);
        assert_eq!(
            output,
            r##"<svg><image xlink:href="../images/photo.png" /><use href="#r1" /></svg>"##
        );
    }

    #[test]
    fn test_relative_href() {
        let folder = Path::new("/deck/images");
        let target = Path::new("/deck/out");
        assert_eq!(relative_href("a/b.png", folder, target).as_deref(), Some("../images/a/b.png"));
        assert_eq!(relative_href("../x.png", folder, target).as_deref(), Some("../x.png"));
        assert_eq!(relative_href("./c.png", folder, folder).as_deref(), Some("c.png"));
        assert_eq!(relative_href("/deck/out/d.png", folder, target).as_deref(), Some("d.png"));
        assert_eq!(relative_href("#frag", folder, target), None);
        assert_eq!(relative_href("https://example.com/a.png", folder, target), None);
        assert_eq!(relative_href("data:image/png;base64,AAAA", folder, target), None);
    }
}
