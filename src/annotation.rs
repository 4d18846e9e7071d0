//! Parsed annotation records.
//!
//! An [`Annotation`] is one `@Name(...)` occurrence from a docblock.  The
//! lexer groups them per target key into [`Annotations`] and returns the
//! whole result as an [`AnnotationMap`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key under which a single unnamed parameter value is stored, e.g. the
/// `'bar'` in `@Named('bar')`.
pub const VALUE_KEY: &str = "__value";

/// Result of lexing one docblock: target key → annotations of that target.
///
/// Annotations bound to a function argument through `{argument}` live
/// under `target#argument`; everything else lives under the target itself.
pub type AnnotationMap = BTreeMap<String, Annotations>;

// ─── Parameter values ───────────────────────────────────────────────────────

/// The literal text scanned for one parameter.
///
/// Values are kept exactly as written (escape sequences resolved for
/// quoted values).  Use [`ParamValue::typed`] for an interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamValue {
    raw: String,
    quoted: bool,
}

impl ParamValue {
    pub fn new(raw: impl Into<String>, quoted: bool) -> Self {
        Self {
            raw: raw.into(),
            quoted,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the value was enclosed in `'` or `"`.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Classify the value.
    ///
    /// Quoted values are always strings.  Unquoted values are recognised
    /// as `null`, booleans, integers, floats, class references
    /// (`Foo\Bar.class`) and class constants (`Foo\Bar::BAZ`).  Class and
    /// constant names are not resolved.
    pub fn typed(&self) -> Value {
        if self.quoted {
            return Value::String(self.raw.clone());
        }

        let raw = self.raw.as_str();
        if raw.eq_ignore_ascii_case("null") {
            return Value::Null;
        }
        if raw.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(int) = raw.parse::<i64>() {
            return Value::Int(int);
        }
        if looks_numeric(raw)
            && let Ok(float) = raw.parse::<f64>()
        {
            return Value::Float(float);
        }
        if let Some(class) = raw.strip_suffix(".class")
            && !class.is_empty()
        {
            return Value::Class(class.to_string());
        }
        if let Some((class, name)) = raw.rsplit_once("::")
            && !class.is_empty()
            && !name.is_empty()
        {
            return Value::Constant {
                class: class.to_string(),
                name: name.to_string(),
            };
        }

        Value::String(raw.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// `f64::from_str` also accepts `inf` and `NaN`, which are not PHP literals.
fn looks_numeric(raw: &str) -> bool {
    !raw.is_empty()
        && raw.bytes().any(|b| b.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

/// Interpretation of an unquoted parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// `Some\Class.class`
    Class(String),
    /// `Some\Class::NAME`
    Constant { class: String, name: String },
    String(String),
}

// ─── Params ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(flatten)]
    pub value: ParamValue,
}

/// Parameters of one annotation in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    entries: Vec<Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter.  Setting an existing name replaces its value but
    /// keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Param { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|p| p.name == name)
    }

    /// Whether any parameter other than [`VALUE_KEY`] is present.
    pub fn has_named(&self) -> bool {
        self.entries.iter().any(|p| p.name != VALUE_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|p| (p.name.as_str(), &p.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Annotation ─────────────────────────────────────────────────────────────

/// One parsed `@Name[Type]{argument}(params)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    name: String,
    #[serde(rename = "type")]
    annotation_type: String,
    target: String,
    params: Params,
}

impl Annotation {
    pub fn new(
        name: impl Into<String>,
        annotation_type: impl Into<String>,
        target: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            name: name.into(),
            annotation_type: annotation_type.into(),
            target: target.into(),
            params,
        }
    }

    /// The name written after `@`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effective type: the cast from `[Type]` if present, otherwise
    /// the name.
    pub fn annotation_type(&self) -> &str {
        &self.annotation_type
    }

    /// Identifier of the annotated element, e.g. `Foo::bar()#baz`.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether the annotation carries a single unnamed value.
    pub fn has_value(&self) -> bool {
        self.params.contains(VALUE_KEY)
    }

    /// The single unnamed value, e.g. `bar` for `@Named('bar')`.
    pub fn value(&self) -> Option<&str> {
        self.param(VALUE_KEY)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains(name)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(ParamValue::as_str)
    }

    pub fn typed_param(&self, name: &str) -> Option<Value> {
        self.params.get(name).map(ParamValue::typed)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.annotation_type != self.name {
            write!(f, "[{}]", self.annotation_type)?;
        }
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if name != VALUE_KEY {
                write!(f, "{name}=")?;
            }
            if value.is_quoted() {
                write!(f, "'{}'", value.as_str().replace('\\', "\\\\").replace('\'', "\\'"))?;
            } else {
                f.write_str(value.as_str())?;
            }
        }
        f.write_str(")")
    }
}

// ─── Annotations of one target ──────────────────────────────────────────────

/// All annotations found for one target key, in docblock order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    target: String,
    annotations: Vec<Annotation>,
}

impl Annotations {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            annotations: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether an annotation of the given type is present.
    pub fn contain(&self, annotation_type: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.annotation_type() == annotation_type)
    }

    /// The first annotation of the given type.
    pub fn first_named(&self, annotation_type: &str) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.annotation_type() == annotation_type)
    }

    /// Every annotation of the given type.
    pub fn named<'a>(&'a self, annotation_type: &'a str) -> impl Iterator<Item = &'a Annotation> {
        self.annotations
            .iter()
            .filter(move |a| a.annotation_type() == annotation_type)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unquoted(raw: &str) -> Value {
        ParamValue::new(raw, false).typed()
    }

    #[test]
    fn typed_recognises_scalars() {
        assert_eq!(unquoted("true"), Value::Bool(true));
        assert_eq!(unquoted("FALSE"), Value::Bool(false));
        assert_eq!(unquoted("null"), Value::Null);
        assert_eq!(unquoted("42"), Value::Int(42));
        assert_eq!(unquoted("-7"), Value::Int(-7));
        assert_eq!(unquoted("3.5"), Value::Float(3.5));
        assert_eq!(unquoted("inf"), Value::String("inf".to_string()));
    }

    #[test]
    fn typed_recognises_class_references() {
        assert_eq!(
            unquoted("org\\stubbles\\Foo.class"),
            Value::Class("org\\stubbles\\Foo".to_string())
        );
        assert_eq!(
            unquoted("Foo::BAR"),
            Value::Constant {
                class: "Foo".to_string(),
                name: "BAR".to_string()
            }
        );
    }

    #[test]
    fn quoted_values_stay_strings() {
        assert_eq!(
            ParamValue::new("42", true).typed(),
            Value::String("42".to_string())
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = Params::new();
        params.insert("a", ParamValue::new("1", false));
        params.insert("b", ParamValue::new("2", false));
        params.insert("a", ParamValue::new("3", false));
        let names: Vec<_> = params.iter().map(|(n, v)| (n, v.as_str())).collect();
        assert_eq!(names, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn display_renders_annotation_syntax() {
        let mut params = Params::new();
        params.insert("foo", ParamValue::new("it's", true));
        params.insert("test", ParamValue::new("42", false));
        let annotation = Annotation::new("Bar", "TomTom", "MyClass", params);
        assert_eq!(annotation.to_string(), "@Bar[TomTom](foo='it\\'s', test=42)");
    }
}
