use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::corpus::Corpus;
use crate::core::result::{VerificationResult, VerificationStatus};
use crate::core::types::MatchMethod;
use crate::matching::engine::{matcher_for, TitleMatcher};
use crate::verify::hasher::{ContentHasher, HashError, Md5Hasher};

/// Results of one verification run
#[derive(Debug, Default)]
pub struct VerificationBatch {
    /// One result per completed input path, in input order
    pub results: Vec<VerificationResult>,

    /// Set when the run was cancelled before every path finished
    pub interrupted: bool,

    /// Paths left without a result because of cancellation
    pub skipped: usize,
}

impl VerificationBatch {
    pub fn verified_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_verified()).count()
    }
}

/// Hashes input files and looks the hashes up in a corpus
pub struct Verifier<'a> {
    corpus: &'a Corpus,
    matcher: Box<dyn TitleMatcher>,
    hasher: Box<dyn ContentHasher>,
    cancel: Arc<AtomicBool>,
}

impl<'a> Verifier<'a> {
    /// Create a verifier using MD5 and the matcher for `method`
    #[must_use]
    pub fn new(corpus: &'a Corpus, method: MatchMethod) -> Self {
        Self {
            corpus,
            matcher: matcher_for(method),
            hasher: Box::new(Md5Hasher),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: impl TitleMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Share a cancellation flag; once set, no new file is started and
    /// in-flight hashing stops at the next chunk
    #[must_use]
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Verify every path, in parallel, keeping input order.
    ///
    /// Each path yields exactly one result unless the run is cancelled first;
    /// results completed before cancellation are kept.
    pub fn verify(&self, paths: &[PathBuf]) -> VerificationBatch {
        let outcomes: Vec<Option<VerificationResult>> =
            paths.par_iter().map(|path| self.verify_file(path)).collect();

        let total = outcomes.len();
        let results: Vec<VerificationResult> = outcomes.into_iter().flatten().collect();
        let skipped = total - results.len();

        VerificationBatch {
            results,
            interrupted: skipped > 0 || self.cancel.load(Ordering::Relaxed),
            skipped,
        }
    }

    /// Verify one file; `None` only if cancelled before it finished
    pub fn verify_file(&self, path: &Path) -> Option<VerificationResult> {
        if self.cancel.load(Ordering::Relaxed) {
            return None;
        }

        let shown = path.display().to_string();
        info!("Hashing {shown}");

        let hash = match self.hasher.hash_file(path, &self.cancel) {
            Ok(hash) => hash,
            Err(HashError::Interrupted) => return None,
            Err(e) => {
                warn!("{e}");
                return Some(VerificationResult::hash_failure(shown, e.to_string()));
            }
        };

        let reference_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let found = self.matcher.find_title(self.corpus, &hash, &reference_name);
        let result = VerificationResult::hashed(shown, hash, found);

        match &result.status {
            VerificationStatus::Verified { title, catalog, .. } => {
                info!("Verified {}: {title} ({catalog})", result.path);
            }
            _ => info!("{} does not match any catalog entry", result.path),
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::core::types::CatalogId;
    use crate::matching::engine::RankedMatcher;

    const ABC: &str = "abc123abc123abc123abc123abc123ab";
    const DEF: &str = "def456def456def456def456def456de";

    /// Hashes by file name, failing for names it does not know
    struct TableHasher(HashMap<&'static str, &'static str>);

    impl ContentHasher for TableHasher {
        fn hash_file(&self, path: &Path, cancel: &AtomicBool) -> Result<String, HashError> {
            let name = path.file_name().unwrap().to_str().unwrap();
            if name == "stop.iso" {
                cancel.store(true, Ordering::Relaxed);
                return Err(HashError::Interrupted);
            }
            self.0.get(name).map(|h| (*h).to_string()).ok_or_else(|| HashError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    fn corpus() -> Corpus {
        let dat = |title: &str, hash: &str| {
            format!("\t\t<description>{title}</description>\n\t\t<rom md5=\"{hash}\"/>\n")
        };
        Corpus::from_documents([
            ("1.dat", dat("Game X Demo", DEF)),
            ("2.dat", format!("{}{}", dat("Game X (Disc 1)", DEF), dat("Super Game (USA)", ABC))),
        ])
    }

    fn hasher() -> TableHasher {
        TableHasher(HashMap::from([
            ("Game X (Disc 1).iso", DEF),
            ("super.iso", ABC),
            ("unknown.iso", "00000000000000000000000000000000"),
        ]))
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/isos").join(n)).collect()
    }

    fn single_threaded<T: Send>(f: impl FnOnce() -> T + Send) -> T {
        rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(f)
    }

    #[test]
    fn test_one_result_per_path_in_order() {
        let corpus = corpus();
        let verifier = Verifier::new(&corpus, MatchMethod::Accurate).with_hasher(hasher());
        let input = paths(&["Game X (Disc 1).iso", "missing.iso", "unknown.iso", "super.iso", "super.iso"]);

        let batch = verifier.verify(&input);
        assert!(!batch.interrupted);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.results.len(), 5);
        assert_eq!(batch.verified_count(), 3);

        let r = &batch.results;
        assert_eq!(r[0].path, "/isos/Game X (Disc 1).iso");
        assert_eq!(r[0].status.label(), "Game X (Disc 1)");
        assert!(matches!(r[1].status, VerificationStatus::HashFailure { .. }));
        assert!(r[1].hash.is_none());
        assert_eq!(r[2].status, VerificationStatus::Unverified);
        assert_eq!(r[2].hash.as_deref(), Some("00000000000000000000000000000000"));
        assert_eq!(r[3], r[4]);
        match &r[3].status {
            VerificationStatus::Verified { title, catalog, .. } => {
                assert_eq!(title, "Super Game (USA)");
                assert_eq!(catalog, &CatalogId::new("2.dat"));
            }
            other => panic!("expected verified, got {other:?}"),
        }
    }

    #[test]
    fn test_fast_method_takes_first_catalog() {
        let corpus = corpus();
        let verifier = Verifier::new(&corpus, MatchMethod::Fast).with_hasher(hasher());
        let batch = verifier.verify(&paths(&["Game X (Disc 1).iso"]));
        assert_eq!(batch.results[0].status.label(), "Game X Demo");

        let verifier = Verifier::new(&corpus, MatchMethod::Fast)
            .with_hasher(hasher())
            .with_matcher(RankedMatcher);
        let batch = verifier.verify(&paths(&["Game X (Disc 1).iso"]));
        assert_eq!(batch.results[0].status.label(), "Game X (Disc 1)");
    }

    #[test]
    fn test_cancel_keeps_completed_results() {
        let corpus = corpus();
        let cancel = Arc::new(AtomicBool::new(false));
        let verifier = Verifier::new(&corpus, MatchMethod::Accurate)
            .with_hasher(hasher())
            .with_cancel(Arc::clone(&cancel));
        let input = paths(&["super.iso", "stop.iso", "unknown.iso"]);

        let batch = single_threaded(|| verifier.verify(&input));
        assert!(batch.interrupted);
        assert_eq!(batch.skipped, 2);
        assert_eq!(batch.results.len(), 1);
        assert_eq!(batch.results[0].status.label(), "Super Game (USA)");
        assert!(cancel.load(Ordering::Relaxed));
    }

    #[test]
    fn test_cancelled_before_start() {
        let corpus = corpus();
        let verifier = Verifier::new(&corpus, MatchMethod::Fast)
            .with_hasher(hasher())
            .with_cancel(Arc::new(AtomicBool::new(true)));

        let batch = verifier.verify(&paths(&["super.iso", "unknown.iso"]));
        assert!(batch.interrupted);
        assert_eq!(batch.skipped, 2);
        assert!(batch.results.is_empty());
    }

    #[test]
    fn test_real_files_with_md5() {
        let dir = tempfile::tempdir().unwrap();
        let iso = dir.path().join("hello.iso");
        std::fs::write(&iso, b"hello world").unwrap();

        let dat = "<description>Hello (World)</description>\n\
                   <rom name=\"hello.iso\" md5=\"5EB63BBBE01EEED093CB22BB8F5ACDC3\"/>\n";
        let corpus = Corpus::from_documents([("misc.dat", dat)]);
        let verifier = Verifier::new(&corpus, MatchMethod::Accurate);

        let result = verifier.verify_file(&iso).unwrap();
        assert_eq!(result.hash.as_deref(), Some("5eb63bbbe01eeed093cb22bb8f5acdc3"));
        assert_eq!(result.status.label(), "Hello (World)");
    }

    #[test]
    fn test_missing_file_is_hash_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.iso");
        let corpus = Corpus::default();
        let verifier = Verifier::new(&corpus, MatchMethod::Accurate);

        let batch = verifier.verify(&[missing.clone()]);
        assert_eq!(batch.results.len(), 1);
        let result = &batch.results[0];
        assert_eq!(result.path, missing.display().to_string());
        assert_eq!(result.hash, None);
        assert!(matches!(result.status, VerificationStatus::HashFailure { .. }));
    }
}
