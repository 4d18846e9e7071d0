//! Project scanning.
//!
//! Walks a project directory, honouring `.gitignore` files and the
//! `[scan]` configuration, and annotates every matching PHP file.  Parsed
//! results go through the [`AnnotationCache`], so unchanged files are not
//! parsed again.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use tracing::{debug, warn};

use crate::cache::AnnotationCache;
use crate::config::{Config, ScanConfig};
use crate::error::{Error, Result};
use crate::lexer::AnnotationLexer;
use crate::parser::parse_php;
use crate::types::AnnotatedElement;

/// Annotated elements of one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub elements: Vec<AnnotatedElement>,
    /// Whether the result came from the cache.
    pub cached: bool,
}

/// A file that could not be read or contains a malformed annotation.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    /// Successfully processed files, sorted by path.  Files without
    /// annotations are included with an empty element list.
    pub files: Vec<FileReport>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn element_count(&self) -> usize {
        self.files.iter().map(|f| f.elements.len()).sum()
    }

    pub fn annotation_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.elements)
            .flat_map(|e| e.annotations.values())
            .map(|a| a.len())
            .sum()
    }

    pub fn cached_count(&self) -> usize {
        self.files.iter().filter(|f| f.cached).count()
    }
}

/// Annotate every PHP file below `root`.
///
/// A file that fails is recorded in [`ScanReport::failures`] and the scan
/// continues.  Only an invalid exclude pattern fails the scan itself.
pub fn scan_project(root: &Path, config: &Config, cache: &AnnotationCache) -> Result<ScanReport> {
    let files = collect_files(root, &config.scan)?;
    debug!(root = %root.display(), files = files.len(), "scanning project");

    let mut lexer = config.lexer();
    let mut report = ScanReport::default();

    for path in files {
        match annotate_file(&path, &mut lexer, cache) {
            Ok((elements, cached)) => report.files.push(FileReport {
                path,
                elements,
                cached,
            }),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping file");
                report.failures.push(ScanFailure { path, error });
            }
        }
    }

    Ok(report)
}

/// Annotate a single file, consulting and updating `cache`.
///
/// Returns the elements and whether they came from the cache.
pub fn annotate_file(
    path: &Path,
    lexer: &mut AnnotationLexer,
    cache: &AnnotationCache,
) -> Result<(Vec<AnnotatedElement>, bool)> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = lexer.fingerprint();
    if let Some(elements) = cache.get(path, &content, &settings) {
        debug!(path = %path.display(), "cache hit");
        return Ok((elements, true));
    }

    let elements = if memchr::memmem::find(content.as_bytes(), b"/**").is_some() {
        parse_php(&content, lexer)?
    } else {
        Vec::new()
    };
    cache.put(path, &content, &settings, elements.clone());
    Ok((elements, false))
}

/// Matching files below `root`, sorted by path.
fn collect_files(root: &Path, scan: &ScanConfig) -> Result<Vec<PathBuf>> {
    let walk_err = |source| Error::Walk {
        path: root.to_path_buf(),
        source,
    };

    let mut overrides = OverrideBuilder::new(root);
    for pattern in &scan.exclude {
        overrides.add(&format!("!{pattern}")).map_err(walk_err)?;
    }
    let overrides = overrides.build().map_err(walk_err)?;

    let walker = WalkBuilder::new(root)
        .hidden(!scan.hidden)
        .require_git(false)
        .overrides(overrides)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let matches_extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| scan.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if matches_extension {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
