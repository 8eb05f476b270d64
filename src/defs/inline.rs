//! Inlining SVG files into a generated document
//!
//! Each file goes through:
//! 1. parse (cached per path)
//! 2. editor cleanup
//! 3. `<defs>` children moved into the shared [`DefsRegistry`], after the
//!    references between them are rewritten
//! 4. `url(#id)` and `#id` references in the body rewritten to the registered ids
//! 5. root attribute overrides, then an optional caller hook
//! 6. re-indent and serialize
//!
//! The definitions block collected along the way is rendered once at the end
//! with [`SvgInliner::definitions`].

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::{debug, info};
use lru::LruCache;
use thiserror::Error;

use super::clean::Cleaner;
use super::registry::{DefId, DefsRegistry};
use super::style::{rewrite_url_refs, url_refs};
use crate::config::InlineOptions;
use crate::core::ParseError;
use crate::dom::{parse, AttrValue, Element, Node};

const FRAGMENT_ATTRIBUTES: &[&str] = &["xlink:href", "href"];

#[derive(Error, Debug)]
pub enum InlineError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("No <svg> element in {}", path.display())]
    MissingSvg { path: PathBuf },
}

/// Inlines SVG files for one output document
pub struct SvgInliner {
    target_dir: PathBuf,
    registry: DefsRegistry,
    cache: LruCache<PathBuf, Element>,
}

impl SvgInliner {
    /// Parsed files kept by [`SvgInliner::new`]
    pub const DEFAULT_CACHE_CAPACITY: usize = 64;

    /// Create an inliner for the document written to `target`
    pub fn new(target: impl AsRef<Path>) -> Self {
        Self::with_cache_capacity(target, Self::DEFAULT_CACHE_CAPACITY)
    }

    /// Create an inliner keeping up to `capacity` parsed files (at least one)
    pub fn with_cache_capacity(target: impl AsRef<Path>, capacity: usize) -> Self {
        let target_dir = folder_of(target.as_ref()).to_path_buf();
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        SvgInliner {
            target_dir,
            registry: DefsRegistry::new(),
            cache: LruCache::new(capacity),
        }
    }

    #[inline]
    pub fn registry(&self) -> &DefsRegistry {
        &self.registry
    }

    /// Finish the session and keep the collected definitions
    pub fn into_registry(self) -> DefsRegistry {
        self.registry
    }

    /// The hidden definitions block for everything referenced so far
    pub fn definitions(&self, indent: &str) -> Option<String> {
        self.registry.render(indent)
    }

    /// Read, clean and serialize an SVG file
    pub fn inline_file(&mut self, path: impl AsRef<Path>, options: &InlineOptions) -> Result<String, InlineError> {
        self.inline_file_with(path, options, |_| {})
    }

    /// Like [`SvgInliner::inline_file`], calling `process` on the root `<svg>`
    /// before it is serialized
    pub fn inline_file_with<F>(
        &mut self,
        path: impl AsRef<Path>,
        options: &InlineOptions,
        process: F,
    ) -> Result<String, InlineError>
    where
        F: FnOnce(&mut Element),
    {
        let path = path.as_ref();
        let root = self.load(path)?;
        let folder = folder_of(path);
        let output = self.inline_tree(root, folder, path, options, process)?;
        info!("inlined {} ({} shared definitions)", path.display(), self.registry.len());
        Ok(output)
    }

    /// Clean and serialize SVG text whose relative references start at `folder`
    pub fn inline_str(&mut self, text: &str, folder: &Path, options: &InlineOptions) -> Result<String, InlineError> {
        self.inline_str_with(text, folder, options, |_| {})
    }

    pub fn inline_str_with<F>(
        &mut self,
        text: &str,
        folder: &Path,
        options: &InlineOptions,
        process: F,
    ) -> Result<String, InlineError>
    where
        F: FnOnce(&mut Element),
    {
        let root = parse(text).map_err(|source| InlineError::Parse {
            path: folder.to_path_buf(),
            source,
        })?;
        self.inline_tree(root, folder, folder, options, process)
    }

    /// Clean and serialize an already parsed document
    pub fn inline_document(
        &mut self,
        root: Element,
        folder: &Path,
        options: &InlineOptions,
    ) -> Result<String, InlineError> {
        self.inline_document_with(root, folder, options, |_| {})
    }

    pub fn inline_document_with<F>(
        &mut self,
        root: Element,
        folder: &Path,
        options: &InlineOptions,
        process: F,
    ) -> Result<String, InlineError>
    where
        F: FnOnce(&mut Element),
    {
        self.inline_tree(root, folder, folder, options, process)
    }

    fn load(&mut self, path: &Path) -> Result<Element, InlineError> {
        if let Some(root) = self.cache.get(path) {
            debug!("parse cache hit for {}", path.display());
            return Ok(root.clone());
        }

        let text = std::fs::read_to_string(path).map_err(|source| InlineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = parse(&text).map_err(|source| InlineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.cache.put(path.to_path_buf(), root.clone());
        Ok(root)
    }

    fn inline_tree<F>(
        &mut self,
        mut root: Element,
        folder: &Path,
        source: &Path,
        options: &InlineOptions,
        process: F,
    ) -> Result<String, InlineError>
    where
        F: FnOnce(&mut Element),
    {
        let svg = root
            .first_child_with_tag_mut("svg")
            .ok_or_else(|| InlineError::MissingSvg {
                path: source.to_path_buf(),
            })?;

        let cleaner = Cleaner {
            folder,
            target_dir: &self.target_dir,
            strip_ids: options.strip_ids,
            clean_styles: options.clean_styles,
        };
        cleaner.clean(svg);

        let defined = self.collect_definitions(svg);
        rewrite_references(svg, &defined, &mut self.registry);

        for (name, value) in &options.attributes {
            match value {
                Some(value) => svg.set_attribute(name.as_str(), value.as_str()),
                None => {
                    svg.remove_attribute(name);
                }
            }
        }
        process(svg);

        svg.normalize_whitespace("");
        Ok(svg.stringify())
    }

    /// Move the children of every `<defs>` into the registry, keyed by the
    /// id they had in this file.
    ///
    /// A definition is registered only after the local definitions it points
    /// at, so its own references already carry their final ids (and count as
    /// uses) when it is hashed. Reference cycles are broken in document order.
    fn collect_definitions(&mut self, svg: &mut Element) -> HashMap<String, DefId> {
        let mut pending = Vec::new();
        for defs in svg
            .children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .filter(|child| child.tag() == Some("defs"))
        {
            for child in std::mem::take(&mut defs.children) {
                if let Node::Element(element) = child {
                    let references = referenced_ids(&element);
                    pending.push((element, references));
                }
            }
        }
        svg.remove_children_with_tag("defs");

        let local_ids: HashSet<String> = pending
            .iter()
            .filter_map(|(element, _)| element.attribute_value("id"))
            .map(str::to_string)
            .collect();

        let mut defined: HashMap<String, DefId> = HashMap::new();
        while !pending.is_empty() {
            let next = pending
                .iter()
                .position(|(element, references)| {
                    let own_id = element.attribute_value("id");
                    references.iter().all(|id| {
                        Some(id.as_str()) == own_id || !local_ids.contains(id) || defined.contains_key(id)
                    })
                })
                .unwrap_or(0);
            let (mut element, _) = pending.remove(next);

            rewrite_references(&mut element, &defined, &mut self.registry);
            let local_id = element.attribute_value("id").map(str::to_string);
            let def = self.registry.define(element);
            if let Some(local_id) = local_id {
                defined.entry(local_id).or_insert(def);
            }
        }
        defined
    }
}

/// Folder a file lives in, `.` for bare file names
fn folder_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Ids an element and its descendants point at with `url(#id)` or `#id` hrefs
fn referenced_ids(element: &Element) -> HashSet<String> {
    let mut ids = HashSet::new();
    element.traverse_nodes(|node, _| {
        for (name, value) in node.attributes.iter() {
            let AttrValue::Text(text) = value else {
                continue;
            };
            if FRAGMENT_ATTRIBUTES.contains(&name) {
                ids.extend(text.strip_prefix('#').map(str::to_string));
            } else {
                ids.extend(url_refs(text).map(str::to_string));
            }
        }
    });
    ids
}

/// Point `url(#id)` values and `#id` hrefs at the registered ids, counting
/// each reference as a use
fn rewrite_references(element: &mut Element, defined: &HashMap<String, DefId>, registry: &mut DefsRegistry) {
    if defined.is_empty() {
        return;
    }
    element.traverse_nodes_mut(|node, _| {
        let mut rewrites = Vec::new();
        for (name, value) in node.attributes.iter() {
            let AttrValue::Text(text) = value else {
                continue;
            };

            if FRAGMENT_ATTRIBUTES.contains(&name) {
                if let Some(&def) = text.strip_prefix('#').and_then(|id| defined.get(id)) {
                    registry.mark_used(def);
                    if let Some(id) = registry.id(def) {
                        rewrites.push((name.to_string(), format!("#{id}")));
                    }
                }
                continue;
            }

            let rewritten = rewrite_url_refs(text, |id| {
                let def = *defined.get(id)?;
                registry.mark_used(def);
                registry.id(def).map(str::to_string)
            });
            if let Cow::Owned(rewritten) = rewritten {
                rewrites.push((name.to_string(), rewritten));
            }
        }

        for (name, value) in rewrites {
            node.set_attribute(name, value);
        }
    });
}
