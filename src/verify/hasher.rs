use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hashing interrupted")]
    Interrupted,
}

/// Produces the content hash of a file as lowercase hex
pub trait ContentHasher: Send + Sync {
    /// Hash the file at `path`.
    ///
    /// Implementations should give up with `HashError::Interrupted` once `cancel`
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns `HashError::Io` if the file cannot be read.
    fn hash_file(&self, path: &Path, cancel: &AtomicBool) -> Result<String, HashError>;
}

/// Streaming MD5, the digest Redump catalogs list for every track
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl ContentHasher for Md5Hasher {
    fn hash_file(&self, path: &Path, cancel: &AtomicBool) -> Result<String, HashError> {
        let io_error = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = std::fs::File::open(path).map_err(io_error)?;
        let mut context = md5::Context::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(HashError::Interrupted);
            }
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(e)),
            };
            context.consume(&buffer[..n]);
        }

        Ok(format!("{:x}", context.compute()))
    }
}
