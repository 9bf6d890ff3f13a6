//! Core rule wrapping bounded label occurrences in `abbr_open` / `abbr_close` tokens.

use super::pattern::AbbreviationMatcher;
use super::table::AbbreviationTable;
use crate::markdown::pipeline::CoreState;
use crate::markdown::token::{Nesting, Token, TokenKind};

pub fn abbr_replace(state: &mut CoreState<'_>) {
    let table = &state.env.abbreviations;
    if table.is_empty() {
        return;
    }

    let matcher = match AbbreviationMatcher::new(table) {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::warn!(error = %err, "abbreviations left unexpanded");
            return;
        }
    };

    let mut applied = 0;
    for token in state
        .tokens
        .iter_mut()
        .filter(|token| token.kind == TokenKind::Inline)
    {
        if let Some(children) = token.children.as_mut() {
            applied += annotate_children(children, &matcher, table);
        }
    }

    if applied > 0 {
        tracing::debug!(applied, "abbreviations applied");
    }
}

/// Rebuild `children` with every text token split around its labels. Returns the number of
/// annotations produced.
fn annotate_children(
    children: &mut Vec<Token>,
    matcher: &AbbreviationMatcher,
    table: &AbbreviationTable,
) -> usize {
    let original = std::mem::take(children);
    let mut out = Vec::with_capacity(original.len());
    let mut applied = 0;
    // Text already inside an abbreviation is never annotated again.
    let mut abbr_level = 0usize;

    for token in original {
        match token.kind {
            TokenKind::AbbrOpen => abbr_level += 1,
            TokenKind::AbbrClose => abbr_level = abbr_level.saturating_sub(1),
            TokenKind::Text if abbr_level == 0 && matcher.might_match(&token.content) => {
                let count = split_text(&token.content, matcher, table, &mut out);
                if count > 0 {
                    tracing::trace!(text = %token.content, count, "annotated text token");
                    applied += count;
                    continue;
                }
            }
            _ => {}
        }
        out.push(token);
    }

    *children = out;
    applied
}

/// Push the annotated pieces of `text` onto `out`. Returns the number of labels found; when it
/// is zero nothing was pushed.
fn split_text(
    text: &str,
    matcher: &AbbreviationMatcher,
    table: &AbbreviationTable,
    out: &mut Vec<Token>,
) -> usize {
    let mut pos = 0;
    let mut count = 0;

    for range in matcher.find_labels(text) {
        let label = &text[range.clone()];
        let Some(expansion) = table.get(label) else {
            continue;
        };

        out.push(Token::text(&text[pos..range.start]));

        let mut open = Token::new(TokenKind::AbbrOpen, "abbr", Nesting::Open);
        open.attr_push("title", expansion);
        out.push(open);

        out.push(Token::text(label));
        out.push(Token::new(TokenKind::AbbrClose, "abbr", Nesting::Close));

        pos = range.end;
        count += 1;
    }

    if count > 0 && pos < text.len() {
        out.push(Token::text(&text[pos..]));
    }
    count
}
