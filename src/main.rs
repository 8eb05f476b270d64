//! deckxml command line
//!
//! ```bash
//! # Re-indent XML files
//! deckxml format slides/intro.svg
//!
//! # Strip whitespace-only text instead
//! deckxml format --compact slides/intro.svg
//!
//! # Print text content
//! deckxml text notes.xml
//!
//! # Inline SVG files for out/index.html, followed by the shared definitions
//! deckxml inline --target out/index.html --options svg.json images/*.svg
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=debug` for cache and dedup details.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use deckxml::config::InlineOptions;
use deckxml::defs::SvgInliner;
use deckxml::strategy::load_parallel;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "deckxml")]
#[command(about = "XML and SVG tooling for slide-deck builds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files and print them re-indented
    Format {
        /// Remove whitespace-only text instead of re-indenting
        #[arg(long)]
        compact: bool,

        /// Base indentation for top-level nodes
        #[arg(long, default_value = "")]
        indent: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the text content of files
    Text {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Inline SVG files and print the shared definitions block
    Inline {
        /// Document the SVGs are inlined into; relative hrefs resolve from its folder
        #[arg(short, long)]
        target: PathBuf,

        /// JSON file with inline options
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Indentation of the definitions block
        #[arg(long, default_value = "")]
        indent: String,

        /// Parsed files kept in memory
        #[arg(long, default_value_t = SvgInliner::DEFAULT_CACHE_CAPACITY)]
        cache: usize,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Format { compact, indent, files } => {
            for root in load_parallel(&files) {
                let mut root = root?;
                if compact {
                    root.remove_whitespace();
                } else {
                    root.normalize_whitespace(&indent);
                }
                println!("{}", root.stringify());
            }
        }
        Commands::Text { files } => {
            for root in load_parallel(&files) {
                println!("{}", root?.text_content());
            }
        }
        Commands::Inline {
            target,
            options,
            indent,
            cache,
            files,
        } => {
            let options = match options {
                Some(path) => InlineOptions::from_json_file(path)?,
                None => InlineOptions::default(),
            };
            let mut inliner = SvgInliner::with_cache_capacity(&target, cache);
            for file in &files {
                println!("{}", inliner.inline_file(file, &options)?);
            }
            if let Some(definitions) = inliner.definitions(&indent) {
                println!("{definitions}");
            }
            info!(
                "inlined {} file(s), {} shared definition(s)",
                files.len(),
                inliner.registry().len()
            );
        }
    }
    Ok(())
}
