//! Parser and renderer options.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Close void tags XHTML style (`<br />`, `<hr />`).
    pub xhtml_out: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
    /// Turn bare URLs into links.
    pub linkify: bool,
    /// Class prefix for fenced code blocks.
    pub lang_prefix: String,
    /// Deepest inline nesting the inline parser follows before treating markup as text.
    pub max_nesting: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            xhtml_out: false,
            breaks: false,
            linkify: false,
            lang_prefix: "language-".to_string(),
            max_nesting: 20,
        }
    }
}
