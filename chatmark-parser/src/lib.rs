//! # chatmark
//!
//! A markdown token pipeline for chat messages.
//!
//! File Layout
//!
//! The pipeline is modelled as three stages that share a flat token stream:
//!
//! src/markdown
//!   ├── block      Line-based block rules (fences, headings, paragraphs, ...)
//!   ├── inlines    Inline parsing of `inline` token content into children
//!   ├── pipeline   The top-level chain: normalize → block → inline → linkify
//!   ├── plugins    Optional rules registered through [`Markdown::use_plugin`]
//!   └── render     HTML rendering of the final token stream
//!
//! Every stage is a [`Ruler`](markdown::ruler::Ruler) of named rules, so plugins can hook
//! themselves before or after existing rules by name.
//!
//! For testing helpers, see the [testing module](markdown::testing).
//!
//! [`Markdown::use_plugin`]: markdown::engine::Markdown::use_plugin

#![allow(rustdoc::invalid_html_tags)]

pub mod markdown;

pub use markdown::engine::Markdown;
pub use markdown::env::Env;
pub use markdown::options::Options;
pub use markdown::plugins::abbr::abbr_plugin;
pub use markdown::token::{Nesting, Token, TokenKind};
