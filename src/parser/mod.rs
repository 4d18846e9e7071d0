/// PHP source reflection.
///
/// This module parses PHP source text with the mago_syntax parser, finds
/// the docblock of every class-like declaration, method, property, and
/// function, and runs the annotation lexer over it with the matching
/// target identifier.
///
/// Sub-modules:
/// - [`classes`]: Class, interface, trait, and enum declarations and their members
/// - [`functions`]: Standalone function declarations
/// - [`docblock`]: Locating the docblock that precedes an AST node
mod classes;
mod docblock;
mod functions;

use mago_span::HasSpan;
use mago_syntax::ast::*;
use tracing::{error, warn};

use crate::annotation::AnnotationMap;
use crate::error::AnnotationError;
use crate::lexer::AnnotationLexer;
use crate::types::{AnnotatedElement, ElementKind};
use crate::util::line_at;

/// Context for locating docblock comments.
///
/// Bundles the program's trivia (comments/whitespace) and the raw source
/// text so that extraction functions can look up the `/** ... */` comment
/// preceding any AST node.
pub(crate) struct DocblockCtx<'a> {
    pub trivias: &'a [Trivia<'a>],
    pub content: &'a str,
}

/// Walks a program and collects annotated elements.
pub(crate) struct Extractor<'l> {
    lexer: &'l mut AnnotationLexer,
    elements: Vec<AnnotatedElement>,
}

/// Parse PHP source text and return every declaration whose docblock
/// carries annotations, in source order.
///
/// A malformed annotation fails the whole file.  Source the PHP parser
/// cannot cope with yields no elements.
pub fn parse_php(
    content: &str,
    lexer: &mut AnnotationLexer,
) -> Result<Vec<AnnotatedElement>, AnnotationError> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
        || -> Result<Vec<AnnotatedElement>, AnnotationError> {
            let arena = bumpalo::Bump::new();
            let file_id = mago_database::file::FileId::new("input.php");
            let program = mago_syntax::parser::parse_file_content(&arena, file_id, content);

            let doc_ctx = DocblockCtx {
                trivias: program.trivia.as_slice(),
                content,
            };

            let mut extractor = Extractor {
                lexer: &mut *lexer,
                elements: Vec::new(),
            };
            extractor.extract_from_statements(program.statements.iter(), &doc_ctx, None)?;
            Ok(extractor.elements)
        },
    ));

    match result {
        Ok(elements) => elements,
        Err(_) => {
            error!("parser panicked in parse_php");
            Ok(Vec::new())
        }
    }
}

impl Extractor<'_> {
    /// Recursively walk statements.  Handles declarations at the top
    /// level, inside namespace declarations, and inside blocks.
    pub(crate) fn extract_from_statements<'a>(
        &mut self,
        statements: impl Iterator<Item = &'a Statement<'a>>,
        doc_ctx: &DocblockCtx<'a>,
        namespace: Option<&str>,
    ) -> Result<(), AnnotationError> {
        for statement in statements {
            match statement {
                Statement::Class(class) => {
                    let name = class.name.value;
                    self.extract_class_like(
                        ElementKind::Class,
                        class,
                        name,
                        class.members.iter(),
                        doc_ctx,
                        namespace,
                    )?;
                }
                Statement::Interface(iface) => {
                    let name = iface.name.value;
                    self.extract_class_like(
                        ElementKind::Interface,
                        iface,
                        name,
                        iface.members.iter(),
                        doc_ctx,
                        namespace,
                    )?;
                }
                Statement::Trait(trait_def) => {
                    let name = trait_def.name.value;
                    self.extract_class_like(
                        ElementKind::Trait,
                        trait_def,
                        name,
                        trait_def.members.iter(),
                        doc_ctx,
                        namespace,
                    )?;
                }
                Statement::Enum(enum_def) => {
                    let name = enum_def.name.value;
                    self.extract_class_like(
                        ElementKind::Enum,
                        enum_def,
                        name,
                        enum_def.members.iter(),
                        doc_ctx,
                        namespace,
                    )?;
                }
                Statement::Function(func) => {
                    self.extract_function(func, doc_ctx, namespace)?;
                }
                Statement::Namespace(ns) => {
                    let ns_name = ns
                        .name
                        .as_ref()
                        .map(|ident| ident.value())
                        .filter(|name| !name.is_empty());
                    self.extract_from_statements(ns.statements().iter(), doc_ctx, ns_name)?;
                }
                Statement::Block(block) => {
                    self.extract_from_statements(block.statements.iter(), doc_ctx, namespace)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Lex the docblock preceding `node` (if any) for `target` and record
    /// the element when it carries annotations.
    ///
    /// Returns the recorded element so callers can inspect argument
    /// bindings.
    fn annotate<'a>(
        &mut self,
        kind: ElementKind,
        target: String,
        node: &impl HasSpan,
        doc_ctx: &DocblockCtx<'a>,
    ) -> Result<Option<&AnnotatedElement>, AnnotationError> {
        let Some((doc_text, offset)) =
            docblock::get_docblock_text_for_node(doc_ctx.trivias, doc_ctx.content, node)
        else {
            return Ok(None);
        };

        let annotations: AnnotationMap = self.lexer.parse(doc_text, &target)?;
        if annotations.is_empty() {
            return Ok(None);
        }

        self.elements.push(AnnotatedElement {
            kind,
            target,
            line: line_at(doc_ctx.content, offset as usize),
            annotations,
        });
        Ok(self.elements.last())
    }
}

/// Warn about `{argument}` bindings that name no parameter of the
/// annotated method or function.
fn check_argument_bindings(element: &AnnotatedElement, parameters: &[&str]) {
    for argument in element.annotated_arguments() {
        if !parameters.contains(&argument) {
            warn!(
                target_element = %element.target,
                argument,
                "annotation is bound to an argument that is not a parameter"
            );
        }
    }
}
