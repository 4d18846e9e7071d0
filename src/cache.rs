//! On-disk cache of parsed annotations.
//!
//! Results are stored per file together with a signature of the file
//! content and the lexer settings (a blake3 hash), so a lookup only hits
//! while neither has changed.  The table lives in memory behind a mutex
//! and is written to a JSON file on [`AnnotationCache::flush`].

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::AnnotatedElement;

/// Bumped whenever the stored layout or the signature changes; older
/// files are discarded.
const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    signature: String,
    elements: Vec<AnnotatedElement>,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    entries: &'a BTreeMap<String, CacheEntry>,
}

#[derive(Deserialize)]
struct CacheFile {
    version: u32,
    entries: BTreeMap<String, CacheEntry>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, CacheEntry>,
    dirty: bool,
}

#[derive(Debug)]
pub struct AnnotationCache {
    path: Option<PathBuf>,
    inner: Mutex<Inner>,
}

/// Signature used to validate cache entries: a hash of the lexer
/// settings (see [`AnnotationLexer::fingerprint`]) and the file content.
///
/// [`AnnotationLexer::fingerprint`]: crate::lexer::AnnotationLexer::fingerprint
pub fn signature(content: &str, settings: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(settings.as_bytes());
    hasher.update(&[0]);
    hasher.update(content.as_bytes());
    hasher.finalize().to_hex().to_string()
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl AnnotationCache {
    /// A cache that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// An empty cache that will be written to `path` on flush, replacing
    /// whatever is there.
    pub fn empty_at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Load the cache file at `path`.  A missing file or one written in
    /// another format version gives an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no annotation cache yet");
                return Ok(Self::empty_at(path));
            }
            Err(source) => return Err(Error::Read { path, source }),
        };

        let file: CacheFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(source) => return Err(Error::Cache { path, source }),
        };
        if file.version != FORMAT_VERSION {
            debug!(
                path = %path.display(),
                version = file.version,
                "discarding annotation cache of another format version"
            );
            return Ok(Self::empty_at(path));
        }

        debug!(path = %path.display(), files = file.entries.len(), "loaded annotation cache");
        Ok(Self {
            path: Some(path),
            inner: Mutex::new(Inner {
                entries: file.entries,
                dirty: false,
            }),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Cached elements for `file`, if they were stored for exactly this
    /// `content` and lexer `settings`.
    pub fn get(
        &self,
        file: &Path,
        content: &str,
        settings: &str,
    ) -> Option<Vec<AnnotatedElement>> {
        let inner = self.inner.lock();
        let entry = inner.entries.get(&key(file))?;
        if entry.signature != signature(content, settings) {
            return None;
        }
        Some(entry.elements.clone())
    }

    pub fn put(
        &self,
        file: &Path,
        content: &str,
        settings: &str,
        elements: Vec<AnnotatedElement>,
    ) {
        let mut inner = self.inner.lock();
        inner.entries.insert(
            key(file),
            CacheEntry {
                signature: signature(content, settings),
                elements,
            },
        );
        inner.dirty = true;
    }

    pub fn remove(&self, file: &Path) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.entries.remove(&key(file)).is_some();
        inner.dirty |= removed;
        removed
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        if !inner.entries.is_empty() {
            inner.entries.clear();
            inner.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Write the cache to disk if anything changed since it was loaded.
    ///
    /// The file is replaced atomically through a temporary file in the
    /// same directory.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut inner = self.inner.lock();
        if !inner.dirty {
            return Ok(());
        }

        let json = serde_json::to_vec(&CacheFileRef {
            version: FORMAT_VERSION,
            entries: &inner.entries,
        })
        .map_err(|source| Error::Cache {
            path: path.clone(),
            source,
        })?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_err = |source| Error::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        inner.dirty = false;
        debug!(path = %path.display(), files = inner.entries.len(), "flushed annotation cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_changes_with_content_and_settings() {
        assert_eq!(signature("a", ""), signature("a", ""));
        assert_ne!(signature("a", ""), signature("b", ""));
        assert_ne!(signature("a", ""), signature("a", "covers"));
        assert_ne!(signature("ab", ""), signature("b", "a"));
    }

    #[test]
    fn in_memory_cache_never_touches_disk() {
        let cache = AnnotationCache::in_memory();
        cache.put(Path::new("a.php"), "<?php", "", Vec::new());
        assert!(cache.path().is_none());
        cache.flush().unwrap();
        assert_eq!(cache.len(), 1);
    }
}
