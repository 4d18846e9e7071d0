/// Types describing annotated PHP declarations.
///
/// An [`AnnotatedElement`] is one class-like, method, property, or
/// function whose docblock carried at least one annotation.
use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationMap, Annotations};

/// The kind of PHP declaration an annotation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Interface,
    Trait,
    Enum,
    Method,
    Property,
    Function,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Trait => "trait",
            ElementKind::Enum => "enum",
            ElementKind::Method => "method",
            ElementKind::Property => "property",
            ElementKind::Function => "function",
        }
    }
}

/// A declaration together with the annotations parsed from its docblock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedElement {
    pub kind: ElementKind,
    /// `Foo\Bar`, `Foo\Bar::baz()`, `Foo\Bar->qux`, or `Foo\fn()`.
    pub target: String,
    /// 1-based line of the docblock in its file.
    pub line: usize,
    /// Target key → annotations.  Argument bound annotations of a method
    /// or function appear under `target#argument`.
    pub annotations: AnnotationMap,
}

impl AnnotatedElement {
    /// Annotations attached to the declaration itself.
    pub fn own(&self) -> Option<&Annotations> {
        self.annotations.get(&self.target)
    }

    /// Annotations bound to the argument `name` (without `$`).
    pub fn argument(&self, name: &str) -> Option<&Annotations> {
        self.annotations.get(&format!("{}#{}", self.target, name))
    }

    /// Names of the arguments that carry annotations.
    pub fn annotated_arguments(&self) -> impl Iterator<Item = &str> {
        let prefix = format!("{}#", self.target);
        self.annotations
            .keys()
            .filter_map(move |key| key.strip_prefix(prefix.as_str()))
    }
}
