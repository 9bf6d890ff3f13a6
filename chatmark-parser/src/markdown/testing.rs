//! Testing utilities for token assertions
//!
//! Tests that walk token vectors by index break whenever an unrelated token is added. The
//! fluent API here looks up the n-th inline token and checks its children by meaning:
//!
//! ```rust,ignore
//! let tokens = md.tokenize("*[HTML]: HyperText Markup Language\n\nHTML is great.");
//! assert_tokens(&tokens).inline(0, |inline| {
//!     inline
//!         .child_count(5)
//!         .text(0, "")
//!         .abbr(1, "HTML", "HyperText Markup Language")
//!         .text(4, " is great.")
//! });
//! ```

use crate::markdown::token::{Token, TokenKind};

/// Absolute path of a file relative to the workspace root.
pub fn workspace_path(relative_path: &str) -> std::path::PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let workspace_root = std::path::Path::new(manifest_dir)
        .parent()
        .unwrap_or_else(|| std::path::Path::new(manifest_dir));
    workspace_root.join(relative_path)
}

pub fn assert_tokens(tokens: &[Token]) -> TokensAssertion<'_> {
    TokensAssertion { tokens }
}

pub struct TokensAssertion<'a> {
    tokens: &'a [Token],
}

impl<'a> TokensAssertion<'a> {
    pub fn kinds(self, expected: &[TokenKind]) -> Self {
        let actual: Vec<_> = self.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(actual, expected, "block token kinds");
        self
    }

    pub fn inline_count(self, expected: usize) -> Self {
        let actual = self.inlines().count();
        assert_eq!(actual, expected, "number of inline tokens");
        self
    }

    /// Run `check` against the children of the `index`-th inline token.
    pub fn inline<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(InlineAssertion<'a>) -> InlineAssertion<'a>,
    {
        let token = self
            .inlines()
            .nth(index)
            .unwrap_or_else(|| panic!("no inline token at index {}", index));
        let children = token.children.as_deref().unwrap_or(&[]);
        check(InlineAssertion {
            children,
            context: format!("inline[{}]", index),
        });
        self
    }

    fn inlines(&self) -> impl Iterator<Item = &'a Token> {
        self.tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Inline)
    }
}

pub struct InlineAssertion<'a> {
    children: &'a [Token],
    context: String,
}

impl<'a> InlineAssertion<'a> {
    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.children.len(),
            expected,
            "{}: child count, children = {:?}",
            self.context,
            self.kinds()
        );
        self
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.children.iter().map(|t| t.kind).collect()
    }

    pub fn text(self, index: usize, expected: &str) -> Self {
        let child = self.child(index);
        assert_eq!(child.kind, TokenKind::Text, "{}[{}]: kind", self.context, index);
        assert_eq!(child.content, expected, "{}[{}]: text", self.context, index);
        self
    }

    /// `abbr_open`, `text(label)`, `abbr_close` starting at `index`.
    pub fn abbr(self, index: usize, label: &str, title: &str) -> Self {
        let open = self.child(index);
        assert_eq!(open.kind, TokenKind::AbbrOpen, "{}[{}]: kind", self.context, index);
        assert_eq!(open.tag, "abbr");
        assert_eq!(
            open.attr_get("title"),
            Some(title),
            "{}[{}]: title",
            self.context,
            index
        );
        let this = self.text(index + 1, label);
        let close = this.child(index + 2);
        assert_eq!(
            close.kind,
            TokenKind::AbbrClose,
            "{}[{}]: kind",
            this.context,
            index + 2
        );
        this
    }

    pub fn abbr_count(self, expected: usize) -> Self {
        let actual = self
            .children
            .iter()
            .filter(|t| t.kind == TokenKind::AbbrOpen)
            .count();
        assert_eq!(actual, expected, "{}: abbreviation count", self.context);
        self
    }

    /// Concatenated text content, ignoring markup.
    pub fn plain_text(self, expected: &str) -> Self {
        let actual: String = self
            .children
            .iter()
            .filter(|t| t.is_text())
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(actual, expected, "{}: plain text", self.context);
        self
    }

    fn child(&self, index: usize) -> &'a Token {
        self.children.get(index).unwrap_or_else(|| {
            panic!(
                "{}: no child at {}, children = {:?}",
                self.context,
                index,
                self.kinds()
            )
        })
    }
}
