//! Abbreviations
//!
//! ```text
//! *[HTML]: HyperText Markup Language
//!
//! HTML is great.
//! ```
//!
//! renders as `<p><abbr title="HyperText Markup Language">HTML</abbr> is great.</p>`.
//!
//! The plugin adds two rules:
//! - `abbr_def` (block, before `reference`): collects definition lines into
//!   [`Env::abbreviations`](crate::markdown::env::Env). It joins the `paragraph` chain, so a
//!   definition line also ends a running paragraph.
//! - `abbr_replace` (core, after `linkify`): wraps every bounded occurrence of a label in
//!   `abbr_open` / `abbr_close` tokens.

pub mod definition;
pub mod pattern;
pub mod replace;
pub mod table;

pub use definition::abbr_def;
pub use pattern::AbbreviationMatcher;
pub use replace::abbr_replace;
pub use table::AbbreviationTable;

use crate::markdown::engine::Markdown;
use crate::markdown::ruler::RulerError;

/// Install the abbreviation rules into `md`.
pub fn abbr_plugin(md: &mut Markdown) -> Result<(), RulerError> {
    md.block
        .ruler
        .before("reference", "abbr_def", abbr_def, &["paragraph", "reference"])?;
    md.core
        .ruler
        .after("linkify", "abbr_replace", abbr_replace, &[])?;
    Ok(())
}
