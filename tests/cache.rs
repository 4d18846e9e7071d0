//! Tests for the on-disk annotation cache.

mod common;

use std::fs;
use std::path::Path;

use common::{create_workspace, php_elements};
use stubbles_annotations::{AnnotationCache, Error};

const SERVICE: &str = "<?php\n/** @Singleton */\nclass Service\n{\n    /** @Named{db}('main') */\n    public function __construct($db) {}\n}\n";

#[test]
fn hit_requires_identical_content() {
    let cache = AnnotationCache::in_memory();
    let file = Path::new("src/Service.php");
    let elements = php_elements(SERVICE);

    assert!(cache.get(file, SERVICE, "").is_none());
    cache.put(file, SERVICE, "", elements.clone());
    assert_eq!(cache.get(file, SERVICE, ""), Some(elements));

    let edited = SERVICE.replace("Singleton", "Prototype");
    assert!(cache.get(file, &edited, "").is_none());
    assert!(cache.get(Path::new("src/Other.php"), SERVICE, "").is_none());
}

#[test]
fn hit_requires_identical_lexer_settings() {
    let cache = AnnotationCache::in_memory();
    let file = Path::new("src/Service.php");
    cache.put(file, SERVICE, "", php_elements(SERVICE));

    assert!(cache.get(file, SERVICE, "covers").is_none());
    assert!(cache.get(file, SERVICE, "").is_some());
}

#[test]
fn flush_then_open_restores_entries() {
    let dir = create_workspace(&[]);
    let cache_path = dir.path().join("nested").join("annotations.json");
    let file = Path::new("src/Service.php");
    let elements = php_elements(SERVICE);

    let cache = AnnotationCache::open(&cache_path).unwrap();
    assert!(cache.is_empty());
    cache.put(file, SERVICE, "", elements.clone());
    cache.flush().unwrap();
    assert!(cache_path.is_file());

    let reopened = AnnotationCache::open(&cache_path).unwrap();
    assert_eq!(reopened.path(), Some(cache_path.as_path()));
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(file, SERVICE, ""), Some(elements));
}

#[test]
fn remove_and_clear_are_persisted() {
    let dir = create_workspace(&[]);
    let cache_path = dir.path().join("annotations.json");
    let cache = AnnotationCache::open(&cache_path).unwrap();
    cache.put(Path::new("a.php"), SERVICE, "", php_elements(SERVICE));
    cache.put(Path::new("b.php"), SERVICE, "", php_elements(SERVICE));
    cache.flush().unwrap();

    assert!(cache.remove(Path::new("a.php")));
    assert!(!cache.remove(Path::new("a.php")));
    cache.flush().unwrap();
    assert_eq!(AnnotationCache::open(&cache_path).unwrap().len(), 1);

    cache.clear();
    cache.flush().unwrap();
    assert!(AnnotationCache::open(&cache_path).unwrap().is_empty());
}

#[test]
fn other_format_version_is_discarded() {
    let dir = create_workspace(&[("annotations.json", r#"{"version": 0, "entries": {}}"#)]);
    let cache = AnnotationCache::open(dir.path().join("annotations.json")).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = create_workspace(&[("annotations.json", "{ not json")]);
    let cache_path = dir.path().join("annotations.json");
    match AnnotationCache::open(&cache_path) {
        Err(Error::Cache { path, .. }) => assert_eq!(path, cache_path),
        other => panic!("expected a cache error, got {other:?}"),
    }
}

#[test]
fn empty_at_replaces_existing_file_on_flush() {
    let dir = create_workspace(&[("annotations.json", "{ not json")]);
    let cache_path = dir.path().join("annotations.json");

    let cache = AnnotationCache::empty_at(&cache_path);
    cache.put(Path::new("a.php"), SERVICE, "", Vec::new());
    cache.flush().unwrap();

    let contents = fs::read_to_string(&cache_path).unwrap();
    assert!(contents.contains("\"version\":2"));
    assert_eq!(AnnotationCache::open(&cache_path).unwrap().len(), 1);
}
