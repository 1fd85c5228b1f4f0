use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::staleness::LAST_UPDATE_FILE;
use crate::core::types::{CatalogEntry, CatalogId};
use crate::parsing::dat::{parse_entries, read_document, ParseError};

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Catalog directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read catalog directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One parsed catalog document
#[derive(Debug, Clone)]
pub struct CatalogDocument {
    pub id: CatalogId,
    entries: Vec<CatalogEntry>,
}

impl CatalogDocument {
    /// Parse a document from its text
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedCatalog` if a hash line has no preceding
    /// description.
    pub fn from_text(id: CatalogId, text: &str) -> Result<Self, ParseError> {
        let entries = parse_entries(text, &id).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { id, entries })
    }

    /// Every entry whose hash equals `hash`, in document order
    pub fn entries_matching<'a>(
        &'a self,
        hash: &'a str,
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries.iter().filter(move |e| e.hash == hash)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A catalog document that could not be loaded
#[derive(Debug)]
pub struct CatalogFailure {
    pub catalog: CatalogId,
    pub error: ParseError,
}

/// The ordered set of catalog documents consulted during verification.
///
/// Order matters: the fast matcher stops at the first document with a match,
/// and the ranked matcher breaks score ties in favour of earlier documents.
/// [`Corpus::load`] orders documents by file name.
#[derive(Debug, Default)]
pub struct Corpus {
    documents: Vec<CatalogDocument>,
    failures: Vec<CatalogFailure>,
}

impl Corpus {
    /// Load every catalog document in `dir` (non-recursive), sorted by file name.
    ///
    /// Hidden files, subdirectories and the `_last_update` marker are skipped.
    /// Documents that fail to read or parse are recorded in
    /// [`failures`](Self::failures) and left out; they never abort the load.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if the directory is missing or cannot be listed.
    pub fn load(dir: &Path) -> Result<Self, CorpusError> {
        if !dir.is_dir() {
            return Err(CorpusError::NotFound(dir.to_path_buf()));
        }

        let read_dir_error = |source| CorpusError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<(String, PathBuf)> = Vec::new();
        for dir_entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
            let dir_entry = dir_entry.map_err(read_dir_error)?;
            let path = dir_entry.path();
            let name = dir_entry.file_name().to_string_lossy().into_owned();

            if name.starts_with('.') || name == LAST_UPDATE_FILE || !path.is_file() {
                continue;
            }
            paths.push((name, path));
        }
        paths.sort_by(|a, b| a.0.cmp(&b.0));

        let loaded: Vec<(CatalogId, Result<CatalogDocument, ParseError>)> = paths
            .into_par_iter()
            .map(|(name, path)| {
                let id = CatalogId::new(name);
                let document = read_document(&path)
                    .and_then(|text| CatalogDocument::from_text(id.clone(), &text));
                (id, document)
            })
            .collect();

        let corpus = Self::from_results(loaded);
        debug!(
            "Loaded {} catalogs ({} entries) from {}",
            corpus.len(),
            corpus.entry_count(),
            dir.display()
        );
        Ok(corpus)
    }

    /// Build a corpus from in-memory documents, keeping the given order
    pub fn from_documents<I, N, T>(documents: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        let parsed = documents
            .into_iter()
            .map(|(name, text)| {
                let id = CatalogId::new(name);
                let document = CatalogDocument::from_text(id.clone(), text.as_ref());
                (id, document)
            })
            .collect();
        Self::from_results(parsed)
    }

    fn from_results(results: Vec<(CatalogId, Result<CatalogDocument, ParseError>)>) -> Self {
        let mut corpus = Self::default();
        for (catalog, result) in results {
            match result {
                Ok(document) => corpus.documents.push(document),
                Err(error) => {
                    warn!("Skipping catalog {catalog}: {error}");
                    corpus.failures.push(CatalogFailure { catalog, error });
                }
            }
        }
        corpus
    }

    /// Successfully parsed documents, in corpus order
    pub fn documents(&self) -> &[CatalogDocument] {
        &self.documents
    }

    /// Documents that were left out because they failed to load
    pub fn failures(&self) -> &[CatalogFailure] {
        &self.failures
    }

    /// Number of loaded documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total entries across all loaded documents
    pub fn entry_count(&self) -> usize {
        self.documents.iter().map(CatalogDocument::len).sum()
    }
}
