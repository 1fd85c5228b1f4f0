//! Verification of files on disk.
//!
//! [`Verifier`](orchestrator::Verifier) hashes each input with a
//! [`ContentHasher`](hasher::ContentHasher) (MD5 by default), runs the hash
//! through the chosen matcher, and records one
//! [`VerificationResult`](crate::core::result::VerificationResult) per file.
//! Files that cannot be read are recorded as hash failures; they never stop the
//! rest of the batch.

pub mod hasher;
pub mod orchestrator;
