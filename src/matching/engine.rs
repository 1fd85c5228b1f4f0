use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::corpus::{CatalogDocument, Corpus};
use crate::core::types::{CatalogEntry, CatalogMatch, MatchMethod};
use crate::matching::similarity::similarity_ratio;

/// Strategy for turning a content hash into a catalog title
pub trait TitleMatcher: Send + Sync {
    /// Find the title for `hash`, or `None` if no catalog entry has it.
    ///
    /// `reference_name` is the file name of the image being verified; strategies
    /// that do not rank candidates ignore it.
    fn find_title(
        &self,
        corpus: &Corpus,
        hash: &str,
        reference_name: &str,
    ) -> Option<CatalogMatch>;
}

/// Build the matcher for a [`MatchMethod`]
#[must_use]
pub fn matcher_for(method: MatchMethod) -> Box<dyn TitleMatcher> {
    match method {
        MatchMethod::Accurate => Box::new(RankedMatcher),
        MatchMethod::Fast => Box::new(FastMatcher),
    }
}

/// Stops at the first catalog, in corpus order, that contains the hash.
///
/// Within that catalog the last matching entry wins. Later catalogs are never
/// consulted, even if one of them has a better-named entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastMatcher;

impl FastMatcher {
    #[must_use]
    pub fn fast_match(corpus: &Corpus, hash: &str) -> Option<CatalogMatch> {
        let hash = hash.to_ascii_lowercase();

        for document in corpus.documents() {
            let mut found = None;
            for entry in document.entries_matching(&hash) {
                info!("{hash} matches \"{}\" ({})", entry.title, entry.source);
                found = Some(entry);
            }
            if let Some(entry) = found {
                return Some(CatalogMatch::from_entry(entry));
            }
        }

        None
    }
}

impl TitleMatcher for FastMatcher {
    fn find_title(&self, corpus: &Corpus, hash: &str, _reference_name: &str) -> Option<CatalogMatch> {
        Self::fast_match(corpus, hash)
    }
}

/// Scores every entry with the hash, across the whole corpus, by similarity
/// of its title to the reference file name.
///
/// A candidate only displaces the running best with a strictly higher score,
/// so ties go to the candidate seen first in corpus order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedMatcher;

/// A scored candidate title
#[derive(Debug, Clone, Copy)]
struct MatchCandidate<'a> {
    entry: &'a CatalogEntry,
    score: f64,
}

impl RankedMatcher {
    #[must_use]
    pub fn ranked_match(corpus: &Corpus, hash: &str, reference_name: &str) -> Option<CatalogMatch> {
        let hash = hash.to_ascii_lowercase();

        // Score documents in parallel, then merge their bests in corpus order
        let per_document: Vec<Option<MatchCandidate<'_>>> = corpus
            .documents()
            .par_iter()
            .map(|document| best_in_document(document, &hash, reference_name))
            .collect();

        let mut best: Option<MatchCandidate<'_>> = None;
        for candidate in per_document.into_iter().flatten() {
            if best.map_or(true, |b| candidate.score > b.score) {
                debug!(
                    "{hash}: \"{}\" ({}) scores {:.3}",
                    candidate.entry.title, candidate.entry.source, candidate.score
                );
                best = Some(candidate);
            }
        }

        best.map(|b| CatalogMatch::from_entry(b.entry).with_score(b.score))
    }
}

impl TitleMatcher for RankedMatcher {
    fn find_title(&self, corpus: &Corpus, hash: &str, reference_name: &str) -> Option<CatalogMatch> {
        Self::ranked_match(corpus, hash, reference_name)
    }
}

fn best_in_document<'a>(
    document: &'a CatalogDocument,
    hash: &'a str,
    reference_name: &str,
) -> Option<MatchCandidate<'a>> {
    let mut best: Option<MatchCandidate<'a>> = None;
    for entry in document.entries_matching(hash) {
        let score = similarity_ratio(reference_name, &entry.title);
        if best.map_or(true, |b| score > b.score) {
            debug!(
                "{hash}: \"{}\" ({}) leads {} with {score:.3}",
                entry.title, entry.source, document.id
            );
            best = Some(MatchCandidate { entry, score });
        }
    }
    best
}
