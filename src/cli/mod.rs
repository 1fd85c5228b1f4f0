//! Command-line interface for dat-verify.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **verify**: Hash disc images (files or whole folders) and match them against the catalogs
//! - **lookup**: Match a single, already computed MD5
//! - **catalog**: List the catalogs that were loaded
//!
//! ## Usage
//!
//! ```text
//! # Verify a folder of images with name-based disambiguation
//! dat-verify verify ~/isos
//!
//! # Stop at the first catalog containing each hash
//! dat-verify verify game.iso --match-method fast
//!
//! # No paths: prompt for drag-and-dropped files
//! dat-verify verify
//!
//! # JSON output for scripting
//! dat-verify --format json lookup 6aef897c3d6ff0c78aff06ac189178dd --name "Game.iso"
//! ```

use std::path::Path;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::catalog::corpus::Corpus;
use crate::catalog::staleness::catalog_staleness;

pub mod catalog;
pub mod lookup;
pub mod verify;

/// Catalog directory used when `--dat-dir` is not given
pub const DEFAULT_DAT_DIR: &str = "dat";

#[derive(Parser)]
#[command(name = "dat-verify")]
#[command(version)]
#[command(about = "Verify disc images against Redump-style DAT catalogs")]
#[command(
    long_about = "dat-verify computes the MD5 of disc images and looks it up in a directory of Redump-style DAT catalogs.\n\nWhen a hash is listed under several titles (regional or language variants sharing a track), the accurate match method picks the title most similar to the file name."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hash files or folders and match them against the catalogs
    Verify(verify::VerifyArgs),

    /// Match a precomputed MD5 against the catalogs
    Lookup(lookup::LookupArgs),

    /// Inspect the catalog directory
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the corpus, warning about stale or broken catalogs
///
/// # Errors
///
/// Returns an error if the catalog directory is missing or unreadable.
pub fn load_corpus(dat_dir: &Path) -> anyhow::Result<Corpus> {
    let corpus = Corpus::load(dat_dir)?;

    info!(
        "Loaded {} catalogs with {} entries from {}",
        corpus.len(),
        corpus.entry_count(),
        dat_dir.display()
    );

    if let Some(stale) = catalog_staleness(dat_dir, Local::now().date_naive()) {
        warn!(
            "Catalogs were last updated on {}, consider refreshing {}",
            stale.last_update,
            dat_dir.display()
        );
    }

    for failure in corpus.failures() {
        eprintln!("Warning: catalog {} was skipped: {}", failure.catalog, failure.error);
    }

    if corpus.is_empty() {
        eprintln!(
            "Warning: No catalogs found in {}, nothing can be verified.",
            dat_dir.display()
        );
    }

    Ok(corpus)
}
