//! Content hashing for duplicate detection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use blake3::Hasher;

use shiwake_core::{ContentHash, Reporter, SortEvent};

use crate::OpsError;

/// Computes content digests of files.
pub trait ContentHasher {
    fn hash_file(&self, path: &Path) -> io::Result<ContentHash>;
}

/// BLAKE3 over the whole file, memory-mapped when large.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn hash_file(&self, path: &Path) -> io::Result<ContentHash> {
        let mut hasher = Hasher::new();
        hasher.update_mmap(path)?;
        Ok(ContentHash::new(*hasher.finalize().as_bytes()))
    }
}

/// Find a file in `dir` (non-recursive) whose content hashes to `digest`.
///
/// Only entries of exactly `size` bytes are hashed. `exclude` is never
/// reported as a match. Entries that cannot be read are reported and
/// skipped. Entries are checked in path order.
pub fn find_same_content(
    dir: &Path,
    size: u64,
    digest: &ContentHash,
    exclude: &Path,
    hasher: &dyn ContentHasher,
    reporter: &dyn Reporter,
) -> Result<Option<PathBuf>, OpsError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(OpsError::ReadDir { path: dir.to_path_buf(), source }),
    };

    let mut same_size: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            entry
                .metadata()
                .is_ok_and(|m| m.is_file() && m.len() == size)
        })
        .map(|entry| entry.path())
        .filter(|path| path != exclude)
        .collect();
    same_size.sort();

    for path in same_size {
        match hasher.hash_file(&path) {
            Ok(existing) if existing == *digest => return Ok(Some(path)),
            Ok(_) => {}
            Err(e) => reporter.report(SortEvent::HashUnreadable {
                path,
                error: e.to_string(),
            }),
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiwake_core::RecordingReporter;
    use tempfile::TempDir;

    #[test]
    fn test_blake3_hash_matches_content() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let c = dir.path().join("c.png");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        fs::write(&c, b"other").unwrap();

        let hasher = Blake3Hasher;
        assert_eq!(hasher.hash_file(&a).unwrap(), hasher.hash_file(&b).unwrap());
        assert_ne!(hasher.hash_file(&a).unwrap(), hasher.hash_file(&c).unwrap());
        assert_eq!(
            hasher.hash_file(&a).unwrap().0,
            *blake3::hash(b"same bytes").as_bytes()
        );
    }

    #[test]
    fn test_find_same_content() {
        let source_dir = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = source_dir.path().join("new.png");
        fs::write(&source, b"pixels").unwrap();
        fs::write(dest.path().join("other_name.png"), b"pixels").unwrap();
        fs::write(dest.path().join("unrelated.png"), b"pixelz").unwrap();

        let hasher = Blake3Hasher;
        let digest = hasher.hash_file(&source).unwrap();
        let reporter = RecordingReporter::new();
        let found = find_same_content(dest.path(), 6, &digest, &source, &hasher, &reporter).unwrap();
        assert_eq!(found, Some(dest.path().join("other_name.png")));
    }

    #[test]
    fn test_find_same_content_missing_dir() {
        let dir = TempDir::new().unwrap();
        let digest = ContentHash::new([0; 32]);
        let reporter = RecordingReporter::new();
        let found = find_same_content(
            &dir.path().join("nope"),
            1,
            &digest,
            Path::new("x"),
            &Blake3Hasher,
            &reporter,
        )
        .unwrap();
        assert!(found.is_none());
    }
}
