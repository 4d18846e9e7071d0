//! Character classes and name rules used by the lexer states.

/// Standard phpDocumentor tags.  These describe the code for humans and
/// are never treated as annotations: the remainder of their line is prose.
pub(crate) const DOC_TAGS: &[&str] = &[
    "abstract",
    "access",
    "api",
    "author",
    "category",
    "copyright",
    "deprecated",
    "example",
    "extends",
    "filesource",
    "final",
    "global",
    "ignore",
    "implements",
    "inheritDoc",
    "inheritdoc",
    "internal",
    "license",
    "link",
    "method",
    "mixin",
    "package",
    "param",
    "property",
    "return",
    "see",
    "since",
    "source",
    "static",
    "subpackage",
    "template",
    "throws",
    "todo",
    "uses",
    "var",
    "version",
];

/// Decides which `@tag` names are prose rather than annotations.
#[derive(Debug, Clone, Default)]
pub(crate) struct TagFilter {
    extra: Vec<String>,
}

impl TagFilter {
    pub(crate) fn with_extra(extra: Vec<String>) -> Self {
        Self { extra }
    }

    /// Vendor tags (`@phpstan-param`, `@psalm-suppress`, `@property-read`)
    /// always contain a dash, which annotation names cannot.
    pub(crate) fn is_prose(&self, name: &str) -> bool {
        name.contains('-') || DOC_TAGS.contains(&name) || self.extra.iter().any(|t| t == name)
    }

    /// The configured tags, sorted and deduplicated, one per line.
    pub(crate) fn fingerprint(&self) -> String {
        let mut tags: Vec<&str> = self.extra.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags.dedup();
        tags.join("\n")
    }
}

/// `^[a-zA-Z_][a-zA-Z_0-9]*$`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(is_identifier_char)
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Characters allowed inside a `[Type]` cast: identifiers plus the
/// namespace separator.
pub(crate) fn is_type_char(c: char) -> bool {
    is_identifier_char(c) || c == '\\'
}

/// A possibly namespaced type name such as `TomTom` or `\foo\Bar`.
pub(crate) fn is_type_name(name: &str) -> bool {
    let name = name.strip_prefix('\\').unwrap_or(name);
    !name.is_empty() && name.split('\\').all(is_identifier)
}

/// Characters that end an annotation name.
pub(crate) fn is_name_terminator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '*' | '(' | '[' | '{')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_foo1"));
        assert!(!is_identifier("1foo"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("foo-bar"));
    }

    #[test]
    fn type_names_allow_namespaces() {
        assert!(is_type_name("TomTom"));
        assert!(is_type_name("\\org\\stubbles\\Foo"));
        assert!(!is_type_name("org\\\\Foo"));
        assert!(!is_type_name("\\"));
        assert!(!is_type_name("9Foo"));
    }

    #[test]
    fn vendor_and_doc_tags_are_prose() {
        let filter = TagFilter::with_extra(vec!["covers".to_string()]);
        assert!(filter.is_prose("param"));
        assert!(filter.is_prose("phpstan-return"));
        assert!(filter.is_prose("covers"));
        assert!(!filter.is_prose("Inject"));
    }
}
