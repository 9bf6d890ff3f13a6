//! Fenced code blocks: ```` ``` ```` or `~~~`, three markers or more.

use crate::markdown::block::BlockState;
use crate::markdown::common::is_space;
use crate::markdown::token::{Nesting, TokenKind};

pub fn fence(state: &mut BlockState<'_>, start_line: usize, end_line: usize, silent: bool) -> bool {
    let bytes = state.src.as_bytes();
    let mut pos = state.content_start(start_line);
    let max = state.e_marks[start_line];

    if state.s_count[start_line] >= state.blk_indent + 4 {
        return false;
    }
    if pos + 3 > max {
        return false;
    }

    let marker = bytes[pos];
    if marker != b'~' && marker != b'`' {
        return false;
    }

    let open_start = pos;
    while pos < max && bytes[pos] == marker {
        pos += 1;
    }
    let open_len = pos - open_start;
    if open_len < 3 {
        return false;
    }

    let markup = &state.src[open_start..pos];
    let params = &state.src[pos..max];
    if marker == b'`' && params.contains('`') {
        return false;
    }

    if silent {
        return true;
    }

    let mut next_line = start_line;
    let mut closed = false;
    loop {
        next_line += 1;
        if next_line >= end_line {
            break;
        }

        let line_start = state.content_start(next_line);
        let line_max = state.e_marks[next_line];
        if line_start < line_max && state.s_count[next_line] < state.blk_indent {
            break;
        }
        if line_start >= line_max || bytes[line_start] != marker {
            continue;
        }
        if state.s_count[next_line] >= state.blk_indent + 4 {
            continue;
        }

        let mut p = line_start;
        while p < line_max && bytes[p] == marker {
            p += 1;
        }
        if p - line_start < open_len {
            continue;
        }
        while p < line_max && is_space(bytes[p]) {
            p += 1;
        }
        if p < line_max {
            continue;
        }

        closed = true;
        break;
    }

    let indent = state.s_count[start_line];
    state.line = next_line + usize::from(closed);

    let mut token = state.make_token(
        TokenKind::Fence,
        "code",
        Nesting::SelfClosing,
        (start_line, state.line),
    );
    token.info = params.trim().to_string();
    token.content = state.get_lines(start_line + 1, next_line, indent, true);
    token.markup = markup.to_string();
    state.push(token);
    true
}
