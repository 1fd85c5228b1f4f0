//! Core data types for catalog verification.
//!
//! - [`CatalogEntry`]: One hash line of a catalog, paired with its game title
//! - [`CatalogId`]: Name of the catalog document an entry came from
//! - [`CatalogMatch`]: The title a matcher picked for a hash
//! - [`MatchMethod`]: Which matching strategy to run
//! - [`VerificationResult`], [`VerificationStatus`]: Per-file outcomes
//!
//! [`CatalogEntry`]: types::CatalogEntry
//! [`CatalogId`]: types::CatalogId
//! [`CatalogMatch`]: types::CatalogMatch
//! [`MatchMethod`]: types::MatchMethod
//! [`VerificationResult`]: result::VerificationResult
//! [`VerificationStatus`]: result::VerificationStatus

pub mod result;
pub mod types;
