//! Per-document state shared by all stages of one parse.

use crate::markdown::plugins::abbr::AbbreviationTable;
use std::collections::HashMap;

/// A link reference definition (`[label]: href "title"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub href: String,
    pub title: Option<String>,
}

/// Environment created fresh for every document.
///
/// Nothing in here survives between two calls to
/// [`Markdown::parse`](crate::markdown::engine::Markdown::parse) unless the caller reuses the
/// same `Env` on purpose.
#[derive(Debug, Clone, Default)]
pub struct Env {
    /// Keyed by normalized label. First definition wins.
    pub references: HashMap<String, LinkReference>,
    pub abbreviations: AbbreviationTable,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reference unless the label is already taken. Returns `true` if stored.
    pub fn define_reference(&mut self, label: String, reference: LinkReference) -> bool {
        if self.references.contains_key(&label) {
            return false;
        }
        self.references.insert(label, reference);
        true
    }
}
