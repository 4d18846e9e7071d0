//! Project configuration.
//!
//! Read from `.stubbles-annotations.toml` in the project root.  Every key
//! is optional:
//!
//! ```toml
//! [cache]
//! enabled = true
//! path = "/tmp/annotations.json"
//!
//! [scan]
//! extensions = ["php"]
//! exclude = ["vendor/", "tests/fixtures/"]
//! hidden = false
//!
//! [lexer]
//! ignored_tags = ["covers", "dataProvider"]
//! ```

use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lexer::AnnotationLexer;

pub const CONFIG_FILE_NAME: &str = ".stubbles-annotations.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache: CacheConfig,
    pub scan: ScanConfig,
    pub lexer: LexerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Cache file.  Defaults to [`default_cache_path`].
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// File extensions (without dot) that are parsed.
    pub extensions: Vec<String>,
    /// Gitignore-style patterns, relative to the project root, that are
    /// never scanned.
    pub exclude: Vec<String>,
    /// Whether hidden files and directories are scanned.
    pub hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["php".to_string()],
            exclude: vec!["vendor/".to_string()],
            hidden: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexerConfig {
    /// Tag names treated as prose in addition to the standard phpDoc tags.
    pub ignored_tags: Vec<String>,
}

impl Config {
    /// Load `.stubbles-annotations.toml` from `root`, falling back to the
    /// defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The cache file to use, or `None` when caching is disabled.
    pub fn cache_path(&self) -> Option<PathBuf> {
        if !self.cache.enabled {
            return None;
        }
        self.cache.path.clone().or_else(default_cache_path)
    }

    /// A lexer honouring `[lexer] ignored_tags`.
    pub fn lexer(&self) -> AnnotationLexer {
        AnnotationLexer::with_ignored_tags(self.lexer.ignored_tags.iter().cloned())
    }
}

/// `<user cache dir>/stubbles-annotations/annotations.json`, or `None` if
/// the home directory cannot be determined.
pub fn default_cache_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(
        strategy
            .cache_dir()
            .join("stubbles-annotations")
            .join("annotations.json"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.cache.enabled);
        assert_eq!(config.scan.extensions, vec!["php"]);
        assert_eq!(config.scan.exclude, vec!["vendor/"]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scan]
            hidden = true

            [lexer]
            ignored_tags = ["covers"]
            "#,
        )
        .unwrap();
        assert!(config.scan.hidden);
        assert_eq!(config.scan.extensions, vec!["php"]);
        assert_eq!(config.lexer.ignored_tags, vec!["covers"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[cache]\nenable = true\n").is_err());
    }

    #[test]
    fn disabled_cache_has_no_path() {
        let mut config = Config::default();
        config.cache.path = Some(PathBuf::from("/tmp/x.json"));
        assert_eq!(config.cache_path(), Some(PathBuf::from("/tmp/x.json")));
        config.cache.enabled = false;
        assert_eq!(config.cache_path(), None);
    }
}
