//! Thematic breaks: `***`, `---`, `___`.

use crate::markdown::block::BlockState;
use crate::markdown::common::is_space;
use crate::markdown::token::{Nesting, TokenKind};

pub fn hr(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, silent: bool) -> bool {
    let bytes = state.src.as_bytes();
    let mut pos = state.content_start(start_line);
    let max = state.e_marks[start_line];

    if state.s_count[start_line] >= state.blk_indent + 4 || pos >= max {
        return false;
    }

    let marker = bytes[pos];
    if marker != b'*' && marker != b'-' && marker != b'_' {
        return false;
    }

    let mut count = 0;
    while pos < max {
        let ch = bytes[pos];
        if ch == marker {
            count += 1;
        } else if !is_space(ch) {
            return false;
        }
        pos += 1;
    }
    if count < 3 {
        return false;
    }

    if silent {
        return true;
    }

    state.line = start_line + 1;
    let mut token = state.make_token(
        TokenKind::Hr,
        "hr",
        Nesting::SelfClosing,
        (start_line, state.line),
    );
    token.markup = (marker as char).to_string().repeat(count);
    state.push(token);
    true
}

#[cfg(test)]
mod tests {
    use crate::markdown::engine::Markdown;
    use crate::markdown::token::TokenKind;
    use rstest::rstest;

    #[rstest]
    #[case("***", true)]
    #[case("- - -", true)]
    #[case("___ ", true)]
    #[case("**", false)]
    #[case("*[HTML]: x", false)]
    #[case("-*-", false)]
    fn test_hr_detection(#[case] line: &str, #[case] is_hr: bool) {
        let tokens = Markdown::new().tokenize(line);
        assert_eq!(tokens[0].kind == TokenKind::Hr, is_hr, "line {:?}", line);
    }
}
