//! # dat-verify
//!
//! A library for verifying disc images against Redump-style DAT catalogs.
//!
//! Preservation projects publish catalogs listing the MD5 of every track of
//! every known-good dump. `dat-verify` hashes an image, finds the catalog entries
//! carrying that hash, and reports the canonical title of the dump.
//!
//! The same track is often catalogued under several titles (regional releases,
//! language variants, re-issues). The accurate matcher resolves this by picking
//! the title most similar to the image's file name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dat_verify::{Corpus, MatchMethod, Verifier};
//! use std::path::{Path, PathBuf};
//!
//! // Load every DAT in the catalog directory
//! let corpus = Corpus::load(Path::new("dat")).unwrap();
//!
//! // Hash and match a couple of images
//! let verifier = Verifier::new(&corpus, MatchMethod::Accurate);
//! let batch = verifier.verify(&[PathBuf::from("Game X (Disc 1).iso")]);
//!
//! for result in &batch.results {
//!     println!("{} - {}", result.file_name(), result.status.label());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Loading the catalog corpus and checking its age
//! - [`core`]: Core data types for entries, matches, and results
//! - [`matching`]: Fast and ranked matchers, and the similarity measure
//! - [`parsing`]: DAT catalog parser
//! - [`verify`]: File hashing and batch verification
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod verify;

// Re-export commonly used types for convenience
pub use crate::catalog::corpus::{CatalogDocument, Corpus};
pub use crate::core::result::{VerificationResult, VerificationStatus};
pub use crate::core::types::*;
pub use crate::matching::engine::{FastMatcher, RankedMatcher, TitleMatcher};
pub use crate::verify::orchestrator::{VerificationBatch, Verifier};
