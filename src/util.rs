//! Small helpers for the PHP source parser.

/// Prefix `name` with `namespace` (`Foo\Bar` + `Baz` → `Foo\Bar\Baz`).
pub(crate) fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}\\{}", ns.trim_matches('\\'), name),
        _ => name.to_string(),
    }
}

/// 1-based line number of a byte offset.
pub(crate) fn line_at(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    memchr::memchr_iter(b'\n', &content.as_bytes()[..end]).count() + 1
}

/// Strip the leading `$` of a PHP variable name.
pub(crate) fn variable_name(raw: &str) -> &str {
    raw.strip_prefix('$').unwrap_or(raw)
}
