//! Matchers built from an [`AbbreviationTable`].
//!
//! A label only counts when it is bounded on both sides by the start/end of the text, Unicode
//! punctuation, a Unicode separator, or one of `" \r\n$+<=>^`|~"`. The bounded regex consumes
//! the leading boundary but the scanner resumes right after the label, so the trailing boundary
//! can open the next match (`"A B"` yields both `A` and `B`).

use super::table::AbbreviationTable;
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// ASCII characters outside the punctuation/separator classes that still end a word.
const OTHER_BOUNDARY_CHARS: &str = " \r\n$+<=>^`|~";

/// Error raised when the matchers cannot be compiled (e.g. a pathological label set that
/// exceeds the regex size limit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Empty,
    Quick(String),
    Bounded(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "no abbreviations to match"),
            PatternError::Quick(msg) => write!(f, "label automaton failed to build: {}", msg),
            PatternError::Bounded(msg) => write!(f, "boundary pattern failed to build: {}", msg),
        }
    }
}

impl std::error::Error for PatternError {}

/// Quick existence check plus the bounded scanner, built once per document.
pub struct AbbreviationMatcher {
    quick: AhoCorasick,
    bounded: Regex,
}

impl AbbreviationMatcher {
    pub fn new(table: &AbbreviationTable) -> Result<Self, PatternError> {
        if table.is_empty() {
            return Err(PatternError::Empty);
        }
        let labels = table.labels_longest_first();

        // LeftmostFirst over longest-first labels prefers the longest label at a position.
        let quick = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&labels)
            .map_err(|e| PatternError::Quick(e.to_string()))?;

        let boundary = boundary_class();
        let alternation = labels
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("(?:^|{boundary})({alternation})(?:$|{boundary})");
        let bounded = Regex::new(&pattern).map_err(|e| PatternError::Bounded(e.to_string()))?;

        Ok(Self { quick, bounded })
    }

    /// Whether any label occurs in `text` at all, bounded or not.
    pub fn might_match(&self, text: &str) -> bool {
        self.quick.is_match(text)
    }

    /// Byte ranges of bounded, non-overlapping label occurrences, left to right.
    pub fn find_labels<'t>(&'t self, text: &'t str) -> BoundedLabels<'t> {
        BoundedLabels {
            regex: &self.bounded,
            text,
            pos: 0,
        }
    }
}

/// Iterator returned by [`AbbreviationMatcher::find_labels`].
pub struct BoundedLabels<'t> {
    regex: &'t Regex,
    text: &'t str,
    pos: usize,
}

impl Iterator for BoundedLabels<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.regex.captures_at(self.text, self.pos)?.get(1)?;
        // Resume after the label, not after the trailing boundary.
        self.pos = label.end();
        Some(label.range())
    }
}

/// `[\p{P}\p{Z}...]` with the extra boundary characters escaped.
fn boundary_class() -> String {
    let extra: String = OTHER_BOUNDARY_CHARS
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    format!(r"[\p{{P}}\p{{Z}}{extra}]")
}
