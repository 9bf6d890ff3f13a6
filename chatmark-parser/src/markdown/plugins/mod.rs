//! Optional rule sets installed with [`Markdown::use_plugin`](crate::markdown::engine::Markdown::use_plugin).

pub mod abbr;
