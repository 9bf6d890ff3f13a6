//! Bare URL detection in text tokens.
//!
//! Enabled by [`Options::linkify`](crate::markdown::options::Options). Text that already sits
//! inside a link is left alone.

use super::CoreState;
use crate::markdown::common::{is_safe_link, normalize_link};
use crate::markdown::token::{Nesting, Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").unwrap());

pub fn linkify(state: &mut CoreState<'_>) {
    if !state.md.options.linkify {
        return;
    }

    for token in state
        .tokens
        .iter_mut()
        .filter(|token| token.kind == TokenKind::Inline)
    {
        if let Some(children) = token.children.as_mut() {
            linkify_children(children);
        }
    }
}

fn linkify_children(children: &mut Vec<Token>) {
    let original = std::mem::take(children);
    let mut out = Vec::with_capacity(original.len());
    let mut link_level = 0usize;

    for token in original {
        match token.kind {
            TokenKind::LinkOpen => link_level += 1,
            TokenKind::LinkClose => link_level = link_level.saturating_sub(1),
            TokenKind::Text if link_level == 0 => {
                if let Some(nodes) = split_urls(&token.content) {
                    out.extend(nodes);
                    continue;
                }
            }
            _ => {}
        }
        out.push(token);
    }

    *children = out;
}

/// Split `text` around bare URLs. Returns `None` when nothing was linked.
fn split_urls(text: &str) -> Option<Vec<Token>> {
    let mut nodes = Vec::new();
    let mut pos = 0;

    for found in BARE_URL.find_iter(text) {
        let url = trim_url(found.as_str());
        if url.is_empty() {
            continue;
        }
        let href = if url.to_ascii_lowercase().starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        let href = normalize_link(&href);
        if !is_safe_link(&href) {
            continue;
        }

        if found.start() > pos {
            nodes.push(Token::text(&text[pos..found.start()]));
        }

        let mut open = Token::new(TokenKind::LinkOpen, "a", Nesting::Open);
        open.attr_push("href", href);
        open.markup = "linkify".to_string();
        open.info = "auto".to_string();
        nodes.push(open);

        nodes.push(Token::text(url));

        let mut close = Token::new(TokenKind::LinkClose, "a", Nesting::Close);
        close.markup = "linkify".to_string();
        close.info = "auto".to_string();
        nodes.push(close);

        pos = found.start() + url.len();
    }

    if nodes.is_empty() {
        return None;
    }
    if pos < text.len() {
        nodes.push(Token::text(&text[pos..]));
    }
    Some(nodes)
}

/// Drop trailing punctuation that belongs to the sentence, not the URL.
fn trim_url(url: &str) -> &str {
    let mut end = url.len();
    while let Some(last) = url[..end].chars().last() {
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | ']' => true,
            ')' => {
                let candidate = &url[..end];
                candidate.matches(')').count() > candidate.matches('(').count()
            }
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}
