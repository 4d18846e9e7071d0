/// Class, interface, trait, and enum extraction.
///
/// A class-like declaration is annotated under its namespace-qualified
/// name.  Its methods are annotated under `Class::method()` (argument
/// bound annotations under `Class::method()#argument`) and its properties
/// under `Class->property`.
use mago_span::HasSpan;
use mago_syntax::ast::*;

use crate::error::AnnotationError;
use crate::types::ElementKind;
use crate::util::{qualify, variable_name};

use super::{DocblockCtx, Extractor, check_argument_bindings};

impl Extractor<'_> {
    /// Annotate a class-like declaration and all of its members.
    pub(crate) fn extract_class_like<'a>(
        &mut self,
        kind: ElementKind,
        node: &impl HasSpan,
        name: &str,
        members: impl Iterator<Item = &'a ClassLikeMember<'a>>,
        doc_ctx: &DocblockCtx<'a>,
        namespace: Option<&str>,
    ) -> Result<(), AnnotationError> {
        let class_name = qualify(namespace, name);
        self.annotate(kind, class_name.clone(), node, doc_ctx)?;
        self.extract_class_like_members(&class_name, members, doc_ctx)
    }

    fn extract_class_like_members<'a>(
        &mut self,
        class_name: &str,
        members: impl Iterator<Item = &'a ClassLikeMember<'a>>,
        doc_ctx: &DocblockCtx<'a>,
    ) -> Result<(), AnnotationError> {
        for member in members {
            match member {
                ClassLikeMember::Method(method) => {
                    let target = format!("{}::{}()", class_name, method.name.value);
                    let parameters: Vec<&str> = method
                        .parameter_list
                        .parameters
                        .iter()
                        .map(|param| variable_name(param.variable.name))
                        .collect();

                    if let Some(element) =
                        self.annotate(ElementKind::Method, target, method, doc_ctx)?
                    {
                        check_argument_bindings(element, &parameters);
                    }
                }
                ClassLikeMember::Property(property) => {
                    // One docblock may cover `public $a, $b;`, so every
                    // declared variable is annotated with the same text.
                    for var in property.variables().iter() {
                        let target = format!("{}->{}", class_name, variable_name(var.name));
                        self.annotate(ElementKind::Property, target, member, doc_ctx)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
