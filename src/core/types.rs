use serde::{Deserialize, Serialize};

/// Identifier for a catalog document in the corpus (its file name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogId(pub String);

impl CatalogId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single (hash, title) pair extracted from a catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Lowercase hex digest
    pub hash: String,

    /// Title from the enclosing `<description>` field
    pub title: String,

    /// Catalog document the entry was read from
    pub source: CatalogId,
}

impl CatalogEntry {
    pub fn new(hash: impl Into<String>, title: impl Into<String>, source: CatalogId) -> Self {
        Self {
            hash: hash.into(),
            title: title.into(),
            source,
        }
    }
}

/// The title a matcher settled on, with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub title: String,
    pub source: CatalogId,

    /// Name similarity in [0, 1]; only set by the ranked matcher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl CatalogMatch {
    #[must_use]
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            title: entry.title.clone(),
            source: entry.source.clone(),
            score: None,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// How titles are chosen for a hash
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Search every catalog and pick the title most similar to the file name
    #[default]
    Accurate,
    /// Stop at the first catalog containing the hash
    Fast,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accurate => write!(f, "accurate"),
            Self::Fast => write!(f, "fast"),
        }
    }
}
