//! Inline stage
//!
//! Turns the raw `content` of each [`TokenKind::Inline`](crate::markdown::token::TokenKind)
//! token into child tokens: text, emphasis, code spans, links and line breaks.

pub mod nodes;
pub mod parser;

pub use nodes::{into_tokens, InlineContent, InlineNode, LinkInline};
pub use parser::{parse_inlines, InlineContext};

use crate::markdown::token::Token;

/// Parse `content` and flatten the result into child tokens.
pub fn tokenize_inline(content: &str, ctx: &InlineContext<'_>) -> Vec<Token> {
    into_tokens(parse_inlines(content, ctx))
}
