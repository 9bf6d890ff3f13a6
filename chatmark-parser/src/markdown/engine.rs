//! Entry point tying options, rule chains and the renderer together.
//!
//! ```rust,ignore
//! let mut md = Markdown::new();
//! md.use_plugin(abbr_plugin)?;
//! let html = md.render("*[HTML]: HyperText Markup Language\n\nHTML is great.");
//! ```

use crate::markdown::block::BlockParser;
use crate::markdown::env::Env;
use crate::markdown::options::Options;
use crate::markdown::pipeline::{CoreParser, CoreState};
use crate::markdown::render::HtmlRenderer;
use crate::markdown::ruler::RulerError;
use crate::markdown::token::Token;

pub struct Markdown {
    pub options: Options,
    pub block: BlockParser,
    pub core: CoreParser,
    pub renderer: HtmlRenderer,
}

impl Markdown {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            block: BlockParser::new(),
            core: CoreParser::new(),
            renderer: HtmlRenderer::new(),
        }
    }

    /// Install a plugin. Plugins register their rules relative to existing ones, so a plugin
    /// fails if an anchor rule is missing or one of its rule names is already taken.
    pub fn use_plugin<F>(&mut self, plugin: F) -> Result<&mut Self, RulerError>
    where
        F: FnOnce(&mut Markdown) -> Result<(), RulerError>,
    {
        plugin(self)?;
        Ok(self)
    }

    /// Run the core chain over `src`. Definitions collected along the way end up in `env`.
    pub fn parse(&self, src: &str, env: &mut Env) -> Vec<Token> {
        let mut state = CoreState::new(src, self, env);
        self.core.process(&mut state);
        state.tokens
    }

    /// Parse with a throwaway environment.
    pub fn tokenize(&self, src: &str) -> Vec<Token> {
        let mut env = Env::new();
        self.parse(src, &mut env)
    }

    pub fn render(&self, src: &str) -> String {
        let mut env = Env::new();
        self.render_with_env(src, &mut env)
    }

    pub fn render_with_env(&self, src: &str, env: &mut Env) -> String {
        let tokens = self.parse(src, env);
        self.renderer.render(&tokens, &self.options)
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::plugins::abbr::abbr_plugin;
    use crate::markdown::token::TokenKind;

    #[test]
    fn test_empty_source_has_no_tokens() {
        assert!(Markdown::new().tokenize("").is_empty());
        assert_eq!(Markdown::new().render(""), "");
    }

    #[test]
    fn test_paragraph_token_stream() {
        let tokens = Markdown::new().tokenize("hello");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose
            ]
        );
    }

    #[test]
    fn test_env_is_fresh_per_render() {
        let mut md = Markdown::new();
        md.use_plugin(abbr_plugin).unwrap();
        md.render("*[X]: Ex");
        assert_eq!(md.render("X"), "<p>X</p>\n");
    }

    #[test]
    fn test_render_with_env_keeps_definitions() {
        let mut md = Markdown::new();
        md.use_plugin(abbr_plugin).unwrap();
        let mut env = Env::new();
        md.render_with_env("*[X]: Ex\n\n[a]: /a", &mut env);
        assert_eq!(env.abbreviations.get("X"), Some("Ex"));
        assert!(env.references.contains_key("a"));
    }

    #[test]
    fn test_plugins_chain() {
        fn noop(_: &mut Markdown) -> Result<(), RulerError> {
            Ok(())
        }
        let mut md = Markdown::new();
        md.use_plugin(noop).unwrap().use_plugin(abbr_plugin).unwrap();
        assert!(md.block.ruler.is_enabled("abbr_def"));
    }
}
