//! Character classes and string helpers shared by block, inline and render code.

use once_cell::sync::Lazy;
use regex::Regex;

static BACKSLASH_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([!-/:-@\[-`{-~])").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Space or tab, the only indentation characters markdown knows about.
pub fn is_space(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Percent-encode the characters that would break an `href` attribute.
pub fn normalize_link(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.trim().chars() {
        match ch {
            ' ' => out.push_str("%20"),
            '\\' => out.push_str("%5C"),
            '"' => out.push_str("%22"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            other => out.push(other),
        }
    }
    out
}

/// Reject script-capable schemes. Inline data images are the one `data:` use that stays.
pub fn is_safe_link(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("data:") {
        return ["data:image/gif;", "data:image/png;", "data:image/jpeg;", "data:image/webp;"]
            .iter()
            .any(|prefix| lower.starts_with(prefix));
    }
    !["javascript:", "vbscript:", "file:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    if !text.contains(['&', '<', '>', '"']) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Drop backslashes in front of ASCII punctuation.
pub fn unescape_all(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }
    BACKSLASH_ESCAPE.replace_all(text, "$1").into_owned()
}

/// Case-fold and collapse whitespace so reference labels compare loosely.
pub fn normalize_reference(label: &str) -> String {
    WHITESPACE_RUN
        .replace_all(label.trim(), " ")
        .to_lowercase()
}
