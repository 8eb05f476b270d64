//! Parallel batch parsing
//!
//! Uses Rayon to parse many independent documents at once. Each document is
//! still parsed by a single thread; only whole documents are spread across
//! the pool, and results come back in input order.

use std::path::{Path, PathBuf};

use log::warn;
use rayon::prelude::*;
use thiserror::Error;

use crate::core::ParseError;
use crate::dom::{parse, Element};

/// A file that could not be loaded
#[derive(Error, Debug)]
pub enum LoadError {
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
}

impl LoadError {
    /// File the error is about
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Parse multiple texts in parallel
pub fn parse_parallel<S>(texts: &[S]) -> Vec<Result<Element, ParseError>>
where
    S: AsRef<str> + Sync,
{
    texts.par_iter().map(|text| parse(text.as_ref())).collect()
}

/// Parse texts and map each tree on the pool
pub fn parse_map<S, F, T>(texts: &[S], mapper: F) -> Vec<Result<T, ParseError>>
where
    S: AsRef<str> + Sync,
    F: Fn(Element) -> T + Sync + Send,
    T: Send,
{
    texts
        .par_iter()
        .map(|text| parse(text.as_ref()).map(&mapper))
        .collect()
}

/// Read and parse files in parallel
pub fn load_parallel<P>(paths: &[P]) -> Vec<Result<Element, LoadError>>
where
    P: AsRef<Path> + Sync,
{
    paths.par_iter().map(|path| load(path.as_ref())).collect()
}

/// Read and parse files in parallel, keeping only the ones that succeed.
///
/// Failures are logged and skipped.
pub fn load_all<P>(paths: &[P]) -> Vec<(PathBuf, Element)>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match load(path) {
                Ok(root) => Some((path.to_path_buf(), root)),
                Err(err) => {
                    warn!("skipping {}: {}", path.display(), err);
                    None
                }
            }
        })
        .collect()
}

fn load(path: &Path) -> Result<Element, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
