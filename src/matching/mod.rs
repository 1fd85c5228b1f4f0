//! Catalog matching engine.
//!
//! Two strategies implement [`TitleMatcher`]:
//!
//! - [`FastMatcher`]: Returns the last matching entry of the first catalog that
//!   contains the hash, without looking at any later catalog
//! - [`RankedMatcher`]: Considers every entry with the hash in every catalog and
//!   picks the title most similar to the image's file name
//!
//! Disc images are often shared between releases (regions, languages, budget
//! re-issues), so one hash can map to several titles. The file name is the only
//! hint available for picking between them.
//!
//! ## Example
//!
//! ```rust
//! use dat_verify::{Corpus, MatchMethod};
//! use dat_verify::matching::engine::matcher_for;
//!
//! let dat = "<description>Game X (Disc 1)</description>\n\
//!            <rom name=\"x.bin\" md5=\"def456def456def456def456def456de\"/>\n";
//! let corpus = Corpus::from_documents([("ps2.dat", dat)]);
//!
//! let matcher = matcher_for(MatchMethod::Accurate);
//! let found = matcher.find_title(&corpus, "def456def456def456def456def456de", "Game X (Disc 1).iso");
//! assert_eq!(found.unwrap().title, "Game X (Disc 1)");
//! ```
//!
//! [`TitleMatcher`]: engine::TitleMatcher
//! [`FastMatcher`]: engine::FastMatcher
//! [`RankedMatcher`]: engine::RankedMatcher

pub mod engine;
pub mod similarity;
