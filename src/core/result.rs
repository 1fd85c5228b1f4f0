use serde::Serialize;

use crate::core::types::{CatalogId, CatalogMatch};

/// Terminal outcome for one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationStatus {
    /// The hash is in the corpus; `title` is the chosen catalog title
    Verified {
        title: String,
        catalog: CatalogId,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },

    /// The hash appears in no catalog entry
    Unverified,

    /// The file could not be hashed
    HashFailure { reason: String },
}

impl VerificationStatus {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Short label used in summaries
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Verified { title, .. } => title,
            Self::Unverified => "Not verified",
            Self::HashFailure { .. } => "Hash failed",
        }
    }
}

impl From<Option<CatalogMatch>> for VerificationStatus {
    fn from(found: Option<CatalogMatch>) -> Self {
        match found {
            Some(m) => Self::Verified {
                title: m.title,
                catalog: m.source,
                score: m.score,
            },
            None => Self::Unverified,
        }
    }
}

/// The result recorded for one input path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub path: String,

    /// Lowercase hex MD5; absent when hashing failed
    pub hash: Option<String>,

    #[serde(flatten)]
    pub status: VerificationStatus,
}

impl VerificationResult {
    #[must_use]
    pub fn hashed(path: impl Into<String>, hash: String, found: Option<CatalogMatch>) -> Self {
        Self {
            path: path.into(),
            hash: Some(hash),
            status: found.into(),
        }
    }

    #[must_use]
    pub fn hash_failure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: None,
            status: VerificationStatus::HashFailure {
                reason: reason.into(),
            },
        }
    }

    /// Final path component, as shown in summaries
    #[must_use]
    pub fn file_name(&self) -> &str {
        std::path::Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_match() {
        let found = CatalogMatch {
            title: "Super Game (USA)".to_string(),
            source: CatalogId::new("Sony - PlayStation.dat"),
            score: Some(0.5),
        };
        let status = VerificationStatus::from(Some(found));
        assert!(status.is_verified());
        assert_eq!(status.label(), "Super Game (USA)");

        let status = VerificationStatus::from(None);
        assert_eq!(status, VerificationStatus::Unverified);
        assert_eq!(status.label(), "Not verified");
    }

    #[test]
    fn test_file_name() {
        let result = VerificationResult::hash_failure("/roms/ps2/Game X.iso", "gone");
        assert_eq!(result.file_name(), "Game X.iso");
        assert!(result.hash.is_none());
    }

    #[test]
    fn test_json_shape() {
        let result = VerificationResult::hashed(
            "a.iso",
            "abc".to_string(),
            Some(CatalogMatch {
                title: "A".to_string(),
                source: CatalogId::new("x.dat"),
                score: None,
            }),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "verified");
        assert_eq!(json["title"], "A");
        assert_eq!(json["catalog"], "x.dat");
        assert!(json.get("score").is_none());
    }
}
