//! Inline tree produced by the parser before it is flattened into tokens.
//!
//! Parsing into a small tree first keeps delimiter matching simple: an unclosed `*` frame can
//! still be dissolved back into literal text before anything is emitted.

use crate::markdown::token::{Nesting, Token, TokenKind};

/// Sequence of inline nodes.
pub type InlineContent = Vec<InlineNode>;

#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    /// Plain text segment with no formatting.
    Plain(String),
    /// Strong emphasis delimited by `**` or `__`.
    Strong { marker: char, children: InlineContent },
    /// Emphasis delimited by `*` or `_`.
    Emphasis { marker: char, children: InlineContent },
    /// Code span; `markup` is the backtick run that delimited it.
    Code { content: String, markup: String },
    Link(LinkInline),
    SoftBreak,
    HardBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkInline {
    pub href: String,
    pub title: Option<String>,
    pub children: InlineContent,
    /// `<scheme:...>` autolink rather than `[text](...)`.
    pub auto: bool,
}

/// Flatten a node tree into the token sequence stored in an inline token's `children`.
pub fn into_tokens(content: InlineContent) -> Vec<Token> {
    let mut tokens = Vec::new();
    push_tokens(content, &mut tokens);
    tokens
}

fn push_tokens(content: InlineContent, out: &mut Vec<Token>) {
    for node in content {
        match node {
            InlineNode::Plain(text) => out.push(Token::text(text)),
            InlineNode::Strong { marker, children } => {
                let markup = marker.to_string().repeat(2);
                wrap(
                    out,
                    children,
                    TokenKind::StrongOpen,
                    TokenKind::StrongClose,
                    "strong",
                    &markup,
                );
            }
            InlineNode::Emphasis { marker, children } => {
                let markup = marker.to_string();
                wrap(
                    out,
                    children,
                    TokenKind::EmOpen,
                    TokenKind::EmClose,
                    "em",
                    &markup,
                );
            }
            InlineNode::Code { content, markup } => {
                let mut token = Token::new(TokenKind::CodeInline, "code", Nesting::SelfClosing);
                token.content = content;
                token.markup = markup;
                out.push(token);
            }
            InlineNode::Link(link) => {
                let mut open = Token::new(TokenKind::LinkOpen, "a", Nesting::Open);
                open.attr_push("href", link.href);
                if let Some(title) = link.title {
                    open.attr_push("title", title);
                }
                if link.auto {
                    open.markup = "autolink".to_string();
                    open.info = "auto".to_string();
                }
                let markup = open.markup.clone();
                let info = open.info.clone();
                out.push(open);
                push_tokens(link.children, out);
                let mut close = Token::new(TokenKind::LinkClose, "a", Nesting::Close);
                close.markup = markup;
                close.info = info;
                out.push(close);
            }
            InlineNode::SoftBreak => {
                out.push(Token::new(TokenKind::Softbreak, "br", Nesting::SelfClosing))
            }
            InlineNode::HardBreak => {
                out.push(Token::new(TokenKind::Hardbreak, "br", Nesting::SelfClosing))
            }
        }
    }
}

fn wrap(
    out: &mut Vec<Token>,
    children: InlineContent,
    open_kind: TokenKind,
    close_kind: TokenKind,
    tag: &str,
    markup: &str,
) {
    let mut open = Token::new(open_kind, tag, Nesting::Open);
    open.markup = markup.to_string();
    out.push(open);
    push_tokens(children, out);
    let mut close = Token::new(close_kind, tag, Nesting::Close);
    close.markup = markup.to_string();
    out.push(close);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_flattens_to_open_children_close() {
        let tokens = into_tokens(vec![InlineNode::Link(LinkInline {
            href: "https://example.com".into(),
            title: Some("Example".into()),
            children: vec![InlineNode::Plain("site".into())],
            auto: false,
        })]);

        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::LinkOpen, TokenKind::Text, TokenKind::LinkClose]
        );
        assert_eq!(tokens[0].attr_get("title"), Some("Example"));
    }

    #[test]
    fn test_strong_markup_doubles_marker() {
        let tokens = into_tokens(vec![InlineNode::Strong {
            marker: '_',
            children: vec![InlineNode::Plain("x".into())],
        }]);
        assert_eq!(tokens[0].markup, "__");
        assert_eq!(tokens[2].kind, TokenKind::StrongClose);
    }
}
