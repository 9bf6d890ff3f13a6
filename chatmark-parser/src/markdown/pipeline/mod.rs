//! Core pipeline
//!
//! The core chain drives a whole parse. Each core rule receives the complete token stream
//! and may rewrite it:
//!
//! ```text
//! normalize → block → inline → linkify [→ abbr_replace]
//! ```
//!
//! Plugins append to this chain through the core [`Ruler`], e.g. the abbreviation plugin
//! registers `abbr_replace` after `linkify`.

pub mod linkify;
pub mod rules;

use crate::markdown::engine::Markdown;
use crate::markdown::env::Env;
use crate::markdown::ruler::Ruler;
use crate::markdown::token::Token;

/// Signature shared by all core rules.
pub type CoreRule = fn(&mut CoreState<'_>);

/// State threaded through the core chain.
pub struct CoreState<'a> {
    pub src: String,
    pub md: &'a Markdown,
    pub env: &'a mut Env,
    pub tokens: Vec<Token>,
}

impl<'a> CoreState<'a> {
    pub fn new(src: &str, md: &'a Markdown, env: &'a mut Env) -> Self {
        Self {
            src: src.to_string(),
            md,
            env,
            tokens: Vec::new(),
        }
    }
}

/// Top-level parser: a ruler of core rules.
pub struct CoreParser {
    pub ruler: Ruler<CoreRule>,
}

impl CoreParser {
    pub fn new() -> Self {
        let mut ruler: Ruler<CoreRule> = Ruler::new();
        let chain: [(&str, CoreRule); 4] = [
            ("normalize", rules::normalize),
            ("block", rules::block),
            ("inline", rules::inline),
            ("linkify", linkify::linkify),
        ];
        for (name, rule) in chain {
            ruler.push(name, rule, &[])
                .expect("default rule names are distinct");
        }
        Self { ruler }
    }

    pub fn process(&self, state: &mut CoreState<'_>) {
        for rule in self.ruler.rules_for("") {
            rule(state);
        }
    }
}

impl Default for CoreParser {
    fn default() -> Self {
        Self::new()
    }
}
