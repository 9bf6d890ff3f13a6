//! Link reference definitions: `[label]: destination "optional title"`.
//!
//! Only the single-line form is recognized. Definitions produce no tokens; they are stored in
//! [`Env::references`](crate::markdown::env::Env) for the inline link parser.

use crate::markdown::block::BlockState;
use crate::markdown::common::{normalize_reference, unescape_all};
use crate::markdown::env::LinkReference;

pub fn reference(
    state: &mut BlockState<'_>,
    start_line: usize,
    _end_line: usize,
    silent: bool,
) -> bool {
    if state.s_count[start_line] >= state.blk_indent + 4 {
        return false;
    }

    let Some((label, href, title)) = parse_definition(state.line_text(start_line)) else {
        return false;
    };

    if silent {
        return true;
    }

    let key = normalize_reference(&label);
    if !state.env.define_reference(key, LinkReference { href, title }) {
        tracing::debug!(label = %label, "ignoring redefined link reference");
    }
    state.line = start_line + 1;
    true
}

fn parse_definition(line: &str) -> Option<(String, String, Option<String>)> {
    let rest = line.strip_prefix('[')?;

    let mut label_end = None;
    let mut chars = rest.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '[' => return None,
            ']' => {
                label_end = Some(i);
                break;
            }
            '\\' => {
                chars.next();
            }
            _ => {}
        }
    }
    let label_end = label_end?;
    let label = &rest[..label_end];
    if label.trim().is_empty() {
        return None;
    }

    let rest = rest[label_end + 1..].strip_prefix(':')?.trim_start();
    let (href, rest) = parse_destination(rest)?;
    let rest = rest.trim_start();

    let title = if rest.is_empty() {
        None
    } else {
        let (title, rest) = parse_title(rest)?;
        if !rest.trim().is_empty() {
            return None;
        }
        Some(unescape_all(title))
    };

    Some((label.to_string(), unescape_all(href), title))
}

fn parse_destination(text: &str) -> Option<(&str, &str)> {
    if let Some(inner) = text.strip_prefix('<') {
        let end = inner.find(['>', '<'])?;
        if inner.as_bytes()[end] != b'>' {
            return None;
        }
        return Some((&inner[..end], &inner[end + 1..]));
    }

    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    Some((&text[..end], &text[end..]))
}

/// Split off a `"title"`, `'title'` or `(title)` prefix.
pub(crate) fn parse_title(text: &str) -> Option<(&str, &str)> {
    let mut chars = text.char_indices();
    let (_, open) = chars.next()?;
    let close = match open {
        '"' => '"',
        '\'' => '\'',
        '(' => ')',
        _ => return None,
    };

    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch == close {
            return Some((&text[1..i], &text[i + 1..]));
        }
    }
    None
}
