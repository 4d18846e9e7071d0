/// Docblock lookup for AST nodes.
use mago_span::HasSpan;
use mago_syntax::ast::*;

/// Find the `/** ... */` comment directly preceding `node`.
///
/// Walks the trivia backwards from the node start.  Whitespace and plain
/// comments between the docblock and the node are skipped; any other
/// source text in between means the docblock belongs to something else.
pub(crate) fn get_docblock_text_for_node<'a>(
    trivia: &'a [Trivia<'a>],
    content: &str,
    node: &impl HasSpan,
) -> Option<(&'a str, u32)> {
    let node_start = node.span().start.offset;
    let candidate_idx = trivia.partition_point(|t| t.span.start.offset < node_start);
    if candidate_idx == 0 {
        return None;
    }

    let content_bytes = content.as_bytes();
    let mut covered_from = node_start;

    for t in trivia[..candidate_idx].iter().rev() {
        let gap = content_bytes
            .get(t.span.end.offset as usize..covered_from as usize)
            .unwrap_or(&[]);
        // Code between docblock and node (`/** @Foo */ $x = 1; class A {}`)
        // means the annotations describe that code, not the node.
        if !gap.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        match t.kind {
            // The offset lets the element report the docblock's line.
            TriviaKind::DocBlockComment => return Some((t.value, t.span.start.offset)),
            TriviaKind::WhiteSpace
            | TriviaKind::SingleLineComment
            | TriviaKind::MultiLineComment
            | TriviaKind::HashComment => {
                covered_from = t.span.start.offset;
            }
        }
    }

    None
}
