//! Docblock annotations for PHP sources.
//!
//! Parses annotations such as
//!
//! ```text
//! /**
//!  * @Inject
//!  * @Named{session}('web')
//!  * @Bar[TomTom](foo='bar', test=42)
//!  */
//! ```
//!
//! out of PHP docblocks the way the stubbles framework's dependency
//! injection reads them.
//!
//! - [`lexer`]: the docblock state machine, usable on its own.
//! - [`parser`]: finds the docblocks of classes, methods, properties and
//!   functions in PHP source and lexes them with the right target names.
//! - [`cache`] and [`scan`]: annotate a whole project with an on-disk
//!   cache keyed by file content.
//!
//! ```
//! let annotations = stubbles_annotations::lexer::parse(
//!     "/**\n * @Foo\n * @Bar(key='value')\n */",
//!     "MyClass",
//! )
//! .unwrap();
//! let own = &annotations["MyClass"];
//! assert!(own.contain("Foo"));
//! assert_eq!(own.first_named("Bar").unwrap().param("key"), Some("value"));
//! ```

pub mod annotation;
pub mod cache;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scan;
pub mod types;
mod util;

pub use annotation::{
    Annotation, AnnotationMap, Annotations, ParamValue, Params, VALUE_KEY, Value,
};
pub use cache::AnnotationCache;
pub use config::Config;
pub use error::{AnnotationError, Error, Result};
pub use lexer::AnnotationLexer;
pub use parser::parse_php;
pub use scan::{ScanReport, scan_project};
pub use types::{AnnotatedElement, ElementKind};
