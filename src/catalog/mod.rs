//! Catalog corpus storage.
//!
//! A corpus is a directory of DAT files (one per system or collection) that is
//! loaded once and then queried for every file being verified.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dat_verify::Corpus;
//! use std::path::Path;
//!
//! let corpus = Corpus::load(Path::new("dat")).unwrap();
//! for document in corpus.documents() {
//!     println!("{}: {} entries", document.id, document.len());
//! }
//! for failure in corpus.failures() {
//!     eprintln!("{} failed: {}", failure.catalog, failure.error);
//! }
//! ```

pub mod corpus;
pub mod staleness;
