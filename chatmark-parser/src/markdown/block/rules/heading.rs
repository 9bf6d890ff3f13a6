//! ATX headings: `#` through `######`, with optional closing hashes.

use crate::markdown::block::BlockState;
use crate::markdown::common::is_space;
use crate::markdown::token::{Nesting, Token, TokenKind};

pub fn heading(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, silent: bool) -> bool {
    let bytes = state.src.as_bytes();
    let mut pos = state.content_start(start_line);
    let mut max = state.e_marks[start_line];

    if state.s_count[start_line] >= state.blk_indent + 4 {
        return false;
    }
    if pos >= max || bytes[pos] != b'#' {
        return false;
    }

    let mut level = 0;
    while pos < max && bytes[pos] == b'#' && level <= 6 {
        level += 1;
        pos += 1;
    }
    if level > 6 || (pos < max && !is_space(bytes[pos])) {
        return false;
    }

    if silent {
        return true;
    }

    // Drop trailing spaces, then a closing run of `#` if it is separated by a space.
    while max > pos && is_space(bytes[max - 1]) {
        max -= 1;
    }
    let mut closing = max;
    while closing > pos && bytes[closing - 1] == b'#' {
        closing -= 1;
    }
    if closing < max && closing > pos && is_space(bytes[closing - 1]) {
        max = closing;
    } else if closing == pos {
        max = pos;
    }

    state.line = start_line + 1;
    let lines = (start_line, state.line);
    let tag = format!("h{}", level);
    let markup = "#".repeat(level);

    let mut open = state.make_token(TokenKind::HeadingOpen, &tag, Nesting::Open, lines);
    open.markup = markup.clone();
    state.push(open);

    let mut inline = state.make_token(TokenKind::Inline, "", Nesting::SelfClosing, lines);
    inline.content = state.src[pos..max].trim().to_string();
    inline.children = Some(Vec::<Token>::new());
    state.push(inline);

    let mut close = state.make_token(TokenKind::HeadingClose, &tag, Nesting::Close, lines);
    close.markup = markup;
    state.push(close);
    true
}
