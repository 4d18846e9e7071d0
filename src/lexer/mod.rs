//! Docblock annotation lexer.
//!
//! Scans a docblock one character at a time through a small state machine
//! and collects every `@Name[Type]{argument}(param='value', ...)`
//! annotation it finds:
//!
//! ```text
//! /**
//!  * Prose is skipped.
//!  *
//!  * @Inject
//!  * @Named{session}('web')
//!  * @Bar[TomTom](foo='bar', test=42)
//!  */
//! ```
//!
//! Standard phpDoc tags such as `@param` or `@return` are prose.
//!
//! # Submodules
//!
//! - [`state`]: the nine lexer states and their transitions.
//! - [`table`]: the working table of annotations found so far.
//! - [`names`]: identifier rules and the list of phpDoc tags.

mod names;
mod state;
mod table;

use tracing::trace;

use crate::annotation::AnnotationMap;
use crate::error::AnnotationError;

use self::names::TagFilter;
use self::state::State;
use self::table::Table;

/// Parse `doc_comment` with a fresh lexer.
///
/// `target` identifies the annotated element (`Foo`, `Foo::bar()`, ...);
/// argument bound annotations are keyed by `target#argument`.
pub fn parse(doc_comment: &str, target: &str) -> Result<AnnotationMap, AnnotationError> {
    AnnotationLexer::new().parse(doc_comment, target)
}

/// Reusable annotation lexer.
///
/// All working state is reset at the start of [`AnnotationLexer::parse`],
/// so one instance can parse any number of docblocks in sequence.
#[derive(Debug)]
pub struct AnnotationLexer {
    state: State,
    table: Table,
    tags: TagFilter,
    line: usize,
    column: usize,
}

impl Default for AnnotationLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationLexer {
    pub fn new() -> Self {
        Self {
            state: State::Docblock,
            table: Table::default(),
            tags: TagFilter::default(),
            line: 1,
            column: 1,
        }
    }

    /// A lexer that additionally treats the given tag names as prose,
    /// e.g. PHPUnit's `covers` or `dataProvider`.
    pub fn with_ignored_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: TagFilter::with_extra(tags.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }

    /// Identifies the settings that change what gets parsed.  Two lexers
    /// with equal fingerprints produce equal results for the same input.
    pub fn fingerprint(&self) -> String {
        self.tags.fingerprint()
    }

    /// Parse all annotations from `doc_comment`.
    ///
    /// A leading `/**` is skipped.  End of input counts as a line end, so
    /// `"@Foo"` without a closing `*/` still parses.  Fails if an
    /// annotation is malformed or still open when the input ends.
    pub fn parse(
        &mut self,
        doc_comment: &str,
        target: &str,
    ) -> Result<AnnotationMap, AnnotationError> {
        self.reset();

        if memchr::memchr(b'@', doc_comment.as_bytes()).is_none() {
            return Ok(AnnotationMap::new());
        }

        let skip = opening_len(doc_comment);
        for (offset, ch) in doc_comment.char_indices() {
            if offset >= skip {
                self.feed(ch, target)?;
            }
            self.advance(ch);
        }
        self.feed('\n', target)?;

        if !self.state.is_terminal() {
            return Err(self.malformed(
                target,
                format!(
                    "annotation is not closed, input ended in {} state",
                    self.state.label()
                ),
            ));
        }

        Ok(self.table.finish(target))
    }

    fn reset(&mut self) {
        self.state = State::Docblock;
        self.table.reset();
        self.line = 1;
        self.column = 1;
    }

    fn feed(&mut self, ch: char, target: &str) -> Result<(), AnnotationError> {
        let current = std::mem::replace(&mut self.state, State::Docblock);
        let from = current.label();
        let next = match current.process(ch, &mut self.table, &self.tags) {
            Ok(next) => next,
            Err(message) => return Err(self.malformed(target, message)),
        };
        if next.label() != from {
            trace!(from, to = next.label(), line = self.line, "lexer transition");
        }
        self.state = next;
        Ok(())
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn malformed(&self, target: &str, message: String) -> AnnotationError {
        AnnotationError::Malformed {
            target: target.to_string(),
            line: self.line,
            column: self.column,
            message,
        }
    }
}

/// Byte length of a leading `/**`, including whitespace before it.
fn opening_len(doc_comment: &str) -> usize {
    let trimmed = doc_comment.trim_start();
    if trimmed.starts_with("/**") {
        doc_comment.len() - trimmed.len() + 3
    } else {
        0
    }
}
