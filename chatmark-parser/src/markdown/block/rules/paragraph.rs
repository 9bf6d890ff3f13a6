//! Paragraphs: the fallback rule that always matches.

use crate::markdown::block::BlockState;
use crate::markdown::token::{Nesting, Token, TokenKind};

pub fn paragraph(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    _silent: bool,
) -> bool {
    let md = state.md;
    let terminators = md.block.ruler.rules_for("paragraph");
    let end_line = end_line.min(state.line_max);

    let mut next_line = start_line + 1;
    while next_line < end_line && !state.is_empty(next_line) {
        // Over-indented lines are lazy continuations, not code blocks.
        if state.s_count[next_line] >= state.blk_indent + 4 {
            next_line += 1;
            continue;
        }

        if terminators
            .iter()
            .any(|rule| rule(state, next_line, end_line, true))
        {
            break;
        }
        next_line += 1;
    }

    let content = state
        .get_lines(start_line, next_line, state.blk_indent, false)
        .trim()
        .to_string();

    state.line = next_line;
    let lines = (start_line, next_line);

    let open = state.make_token(TokenKind::ParagraphOpen, "p", Nesting::Open, lines);
    state.push(open);

    let mut inline = state.make_token(TokenKind::Inline, "", Nesting::SelfClosing, lines);
    inline.content = content;
    inline.children = Some(Vec::<Token>::new());
    state.push(inline);

    let close = state.make_token(TokenKind::ParagraphClose, "p", Nesting::Close, lines);
    state.push(close);
    true
}
