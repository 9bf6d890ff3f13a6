//! Indented code blocks (four or more columns).

use crate::markdown::block::BlockState;
use crate::markdown::token::{Nesting, TokenKind};

pub fn code(state: &mut BlockState<'_>, start_line: usize, end_line: usize, _silent: bool) -> bool {
    if state.s_count[start_line] < state.blk_indent + 4 {
        return false;
    }

    let mut next_line = start_line + 1;
    let mut last = next_line;
    while next_line < end_line {
        if state.is_empty(next_line) {
            next_line += 1;
            continue;
        }
        if state.s_count[next_line] >= state.blk_indent + 4 {
            next_line += 1;
            last = next_line;
            continue;
        }
        break;
    }

    state.line = last;
    let mut token = state.make_token(
        TokenKind::CodeBlock,
        "code",
        Nesting::SelfClosing,
        (start_line, last),
    );
    token.content = state.get_lines(start_line, last, 4 + state.blk_indent, false);
    token.content.push('\n');
    state.push(token);
    true
}
