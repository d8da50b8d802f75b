//! Source provider abstraction for loading dump bytes.
//!
//! The [`SourceProvider`] trait abstracts file I/O so dumps can be read from
//! disk or from memory without the parser knowing which.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Trait that abstracts where dump bytes come from.
pub trait SourceProvider {
    /// Whether `path` names an existing source. Checked before any read.
    fn exists(&self, path: &Path) -> bool;

    /// Load the full contents of `path`.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, std::io::Error>;
}

/// Default filesystem-backed source provider.
///
/// Delegates to `std::fs::read`; the file handle is closed before the bytes
/// are returned, whatever the parse outcome.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        std::fs::read(path)
    }
}

/// In-memory source provider for testing.
///
/// Maps paths to dump bytes. Lookups normalize the path without requiring
/// filesystem access.
pub struct InMemoryProvider {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Register `contents` under `path`.
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files
            .insert(Self::normalize_path(path.as_ref()), contents.into());
    }

    /// Normalize a path by resolving `.` and `..` components without
    /// touching the filesystem.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                std::path::Component::CurDir => {} // skip "."
                std::path::Component::ParentDir => {
                    // pop unless we are at root
                    if !components.is_empty() {
                        components.pop();
                    }
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceProvider for InMemoryProvider {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&Self::normalize_path(path))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }
}
