//! Flat token stream shared by every pipeline stage.
//!
//! Block rules emit a flat list of open/close pairs. Each block whose text still needs inline
//! parsing gets a single [`TokenKind::Inline`] token; the inline stage fills its `children`.
//! Later core rules (linkify, abbreviations) rewrite those children in place.

use serde::Serialize;
use std::fmt;

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    /// Container for inline children; `content` holds the raw text.
    Inline,
    CodeBlock,
    Fence,
    Hr,
    Text,
    Softbreak,
    Hardbreak,
    CodeInline,
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
    LinkOpen,
    LinkClose,
    AbbrOpen,
    AbbrClose,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::ParagraphOpen => "paragraph_open",
            TokenKind::ParagraphClose => "paragraph_close",
            TokenKind::HeadingOpen => "heading_open",
            TokenKind::HeadingClose => "heading_close",
            TokenKind::Inline => "inline",
            TokenKind::CodeBlock => "code_block",
            TokenKind::Fence => "fence",
            TokenKind::Hr => "hr",
            TokenKind::Text => "text",
            TokenKind::Softbreak => "softbreak",
            TokenKind::Hardbreak => "hardbreak",
            TokenKind::CodeInline => "code_inline",
            TokenKind::StrongOpen => "strong_open",
            TokenKind::StrongClose => "strong_close",
            TokenKind::EmOpen => "em_open",
            TokenKind::EmClose => "em_close",
            TokenKind::LinkOpen => "link_open",
            TokenKind::LinkClose => "link_close",
            TokenKind::AbbrOpen => "abbr_open",
            TokenKind::AbbrClose => "abbr_close",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a token opens a tag, closes one, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nesting {
    Open,
    SelfClosing,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// HTML tag name, empty for tokens rendered by a dedicated rule.
    pub tag: String,
    pub nesting: Nesting,
    pub attrs: Vec<(String, String)>,
    /// Source line range `[start, end)` for block tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<(usize, usize)>,
    pub content: String,
    pub markup: String,
    pub info: String,
    /// Only present on [`TokenKind::Inline`] tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Token>>,
    pub block: bool,
    pub hidden: bool,
}

impl Token {
    pub fn new(kind: TokenKind, tag: &str, nesting: Nesting) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
            nesting,
            attrs: Vec::new(),
            map: None,
            content: String::new(),
            markup: String::new(),
            info: String::new(),
            children: None,
            block: false,
            hidden: false,
        }
    }

    /// Plain text token.
    pub fn text(content: impl Into<String>) -> Self {
        let mut token = Token::new(TokenKind::Text, "", Nesting::SelfClosing);
        token.content = content.into();
        token
    }

    pub fn attr_get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replace the first attribute named `name`, or append it.
    pub fn attr_set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn attr_push(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.push((name.to_string(), value.into()));
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }
}

/// JSON view of a token stream, used by the `tokens` output format.
pub fn tokens_to_json(tokens: &[Token]) -> serde_json::Value {
    serde_json::to_value(tokens).unwrap_or(serde_json::Value::Null)
}
