#![allow(dead_code)]

use std::fs;

use stubbles_annotations::{AnnotatedElement, AnnotationLexer, Annotations, parse_php};

/// Helper: create a temp workspace containing the given files and return
/// its handle (the directory is removed when the handle is dropped).
pub fn create_workspace(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel_path, content) in files {
        let full = dir.path().join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
    }
    dir
}

/// Helper: lex `doc` for `target` and return the annotations of `target`
/// itself, panicking if there are none.
pub fn own_annotations(doc: &str, target: &str) -> Annotations {
    let mut map = stubbles_annotations::lexer::parse(doc, target).expect("docblock should parse");
    map.remove(target)
        .unwrap_or_else(|| panic!("no annotations for {target}: {map:?}"))
}

/// Helper: extract annotated elements from PHP source with a default lexer.
pub fn php_elements(php: &str) -> Vec<AnnotatedElement> {
    parse_php(php, &mut AnnotationLexer::new()).expect("source should parse")
}

/// Helper: the element with the given target.
pub fn element<'a>(elements: &'a [AnnotatedElement], target: &str) -> &'a AnnotatedElement {
    elements
        .iter()
        .find(|e| e.target == target)
        .unwrap_or_else(|| {
            let targets: Vec<_> = elements.iter().map(|e| e.target.as_str()).collect();
            panic!("no element {target}, found {targets:?}")
        })
}
