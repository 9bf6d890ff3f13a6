//! The built-in core rules that turn source text into a full token stream.

use super::CoreState;
use crate::markdown::inlines::{tokenize_inline, InlineContext};
use crate::markdown::token::TokenKind;

/// Unify line endings and replace NUL characters.
pub fn normalize(state: &mut CoreState<'_>) {
    if state.src.contains('\r') {
        state.src = state.src.replace("\r\n", "\n").replace('\r', "\n");
    }
    if state.src.contains('\0') {
        state.src = state.src.replace('\0', "\u{FFFD}");
    }
}

/// Run the block parser over the source.
pub fn block(state: &mut CoreState<'_>) {
    let md = state.md;
    md.block.parse(&state.src, md, state.env, &mut state.tokens);
}

/// Fill the children of every inline token.
pub fn inline(state: &mut CoreState<'_>) {
    let ctx = InlineContext {
        references: &state.env.references,
        max_nesting: state.md.options.max_nesting,
    };
    for token in state
        .tokens
        .iter_mut()
        .filter(|token| token.kind == TokenKind::Inline)
    {
        token.children = Some(tokenize_inline(&token.content, &ctx));
    }
}
