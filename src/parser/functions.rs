/// Standalone function extraction.
///
/// Functions are annotated under their namespace-qualified name followed
/// by `()`, e.g. `App\bootstrap()`.
use mago_syntax::ast::*;

use crate::error::AnnotationError;
use crate::types::ElementKind;
use crate::util::{qualify, variable_name};

use super::{DocblockCtx, Extractor, check_argument_bindings};

impl Extractor<'_> {
    pub(crate) fn extract_function<'a>(
        &mut self,
        func: &Function<'a>,
        doc_ctx: &DocblockCtx<'a>,
        namespace: Option<&str>,
    ) -> Result<(), AnnotationError> {
        let target = format!("{}()", qualify(namespace, func.name.value));
        let parameters: Vec<&str> = func
            .parameter_list
            .parameters
            .iter()
            .map(|param| variable_name(param.variable.name))
            .collect();

        if let Some(element) = self.annotate(ElementKind::Function, target, func, doc_ctx)? {
            check_argument_bindings(element, &parameters);
        }
        Ok(())
    }
}
