use super::nodes::{InlineContent, InlineNode, LinkInline};
use crate::markdown::block::rules::reference::parse_title;
use crate::markdown::common::{is_safe_link, normalize_link, normalize_reference, unescape_all};
use crate::markdown::env::LinkReference;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static AUTOLINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^<>\x00-\x20]*)>$").unwrap());

/// What the inline parser needs to know about the surrounding document.
pub struct InlineContext<'a> {
    pub references: &'a HashMap<String, LinkReference>,
    /// How deep link text may recurse.
    pub max_nesting: usize,
}

/// Parse inline nodes from a raw string.
pub fn parse_inlines(text: &str, ctx: &InlineContext<'_>) -> InlineContent {
    parse_nested(text, ctx, 0)
}

fn parse_nested(text: &str, ctx: &InlineContext<'_>, depth: usize) -> InlineContent {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut stack = vec![InlineFrame::new(FrameKind::Root)];

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];

        match ch {
            // Handle escapes first so escaped tokens never trigger parser state.
            '\\' => {
                match chars.get(i + 1).copied() {
                    Some('\n') => {
                        stack.last_mut().unwrap().push_node(InlineNode::HardBreak);
                        i = skip_line_indent(&chars, i + 2);
                    }
                    Some(next) if next.is_ascii_punctuation() => {
                        stack.last_mut().unwrap().push_char(next);
                        i += 2;
                    }
                    _ => {
                        stack.last_mut().unwrap().push_char('\\');
                        i += 1;
                    }
                }
                continue;
            }
            '`' => {
                let run = run_length(&chars, i);
                match scan_code_span(&chars, i, run) {
                    Some((node, end)) => {
                        stack.last_mut().unwrap().push_node(node);
                        i = end;
                    }
                    None => {
                        // Unmatched run stays literal as a whole.
                        let frame = stack.last_mut().unwrap();
                        for _ in 0..run {
                            frame.push_char('`');
                        }
                        i += run;
                    }
                }
                continue;
            }
            '[' if depth < ctx.max_nesting => {
                if let Some((node, end)) = scan_link(&chars, i, ctx, depth) {
                    stack.last_mut().unwrap().push_node(node);
                    i = end;
                    continue;
                }
            }
            '<' => {
                if let Some((node, end)) = scan_autolink(&chars, i) {
                    stack.last_mut().unwrap().push_node(node);
                    i = end;
                    continue;
                }
            }
            '\n' => {
                let frame = stack.last_mut().unwrap();
                let trailing = frame.trim_trailing_spaces();
                frame.push_node(if trailing >= 2 {
                    InlineNode::HardBreak
                } else {
                    InlineNode::SoftBreak
                });
                i = skip_line_indent(&chars, i + 1);
                continue;
            }
            '*' | '_' => {
                i = handle_delimiter(&mut stack, &chars, i);
                continue;
            }
            _ => {}
        }

        stack.last_mut().unwrap().push_char(ch);
        i += 1;
    }

    // Flush any remaining text in the top frame before unwinding.
    if let Some(frame) = stack.last_mut() {
        frame.flush_buffer();
    }

    // Unclosed frames dissolve back into their literal delimiters.
    while stack.len() > 1 {
        let mut frame = stack.pop().unwrap();
        frame.flush_buffer();
        let parent = stack.last_mut().unwrap();
        if let Some((marker, width)) = frame.kind.delimiter() {
            for _ in 0..width {
                parent.push_char(marker);
            }
        }
        for child in frame.children {
            parent.push_node(child);
        }
    }

    let mut root = stack.pop().unwrap();
    root.flush_buffer();
    root.children
}

/// Open or close a `*`/`_` frame at `i`, returning the index to continue from.
fn handle_delimiter(stack: &mut Vec<InlineFrame>, chars: &[char], i: usize) -> usize {
    let ch = chars[i];
    let run = run_length(chars, i);
    let prev = if i == 0 { None } else { Some(chars[i - 1]) };
    let next = chars.get(i + run).copied();
    let widths: &[usize] = if run >= 2 { &[2, 1] } else { &[1] };

    for &width in widths {
        let kind = FrameKind::delimited(ch, width);

        let top = stack.last().unwrap();
        if top.kind == kind && top.has_content() && is_valid_end(prev, next, ch) {
            let mut frame = stack.pop().unwrap();
            frame.flush_buffer();
            let node = frame.into_node();
            stack.last_mut().unwrap().push_node(node);
            return i + width;
        }

        if is_valid_start(prev, next, ch) && !stack.iter().any(|frame| frame.kind == kind) {
            stack.last_mut().unwrap().flush_buffer();
            stack.push(InlineFrame::new(kind));
            return i + width;
        }
    }

    let frame = stack.last_mut().unwrap();
    for _ in 0..run {
        frame.push_char(ch);
    }
    i + run
}

fn is_valid_start(prev: Option<char>, next: Option<char>, marker: char) -> bool {
    let followed_by_text = next.is_some_and(|c| !c.is_whitespace());
    let intraword = marker == '_' && prev.is_some_and(char::is_alphanumeric);
    followed_by_text && !intraword
}

fn is_valid_end(prev: Option<char>, next: Option<char>, marker: char) -> bool {
    let preceded_by_text = prev.is_some_and(|c| !c.is_whitespace());
    let intraword = marker == '_' && next.is_some_and(char::is_alphanumeric);
    preceded_by_text && !intraword
}

fn run_length(chars: &[char], start: usize) -> usize {
    let ch = chars[start];
    chars[start..].iter().take_while(|&&c| c == ch).count()
}

fn skip_line_indent(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
        i += 1;
    }
    i
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Code span opened by a run of `run` backticks at `start`.
fn scan_code_span(chars: &[char], start: usize, run: usize) -> Option<(InlineNode, usize)> {
    let mut j = start + run;
    while j < chars.len() {
        if chars[j] != '`' {
            j += 1;
            continue;
        }
        let closing = run_length(chars, j);
        if closing == run {
            let mut content: String = chars[start + run..j]
                .iter()
                .map(|&c| if c == '\n' { ' ' } else { c })
                .collect();
            if content.len() > 1
                && content.starts_with(' ')
                && content.ends_with(' ')
                && !content.chars().all(|c| c == ' ')
            {
                content = content[1..content.len() - 1].to_string();
            }
            let node = InlineNode::Code {
                content,
                markup: "`".repeat(run),
            };
            return Some((node, j + closing));
        }
        j += closing;
    }
    None
}

/// Index of the `]` matching the `[` at `start`, honoring nesting and escapes.
fn find_label_end(chars: &[char], start: usize) -> Option<usize> {
    let mut level = 0;
    let mut j = start;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 1,
            '[' => level += 1,
            ']' => {
                level -= 1;
                if level == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

fn scan_link(
    chars: &[char],
    start: usize,
    ctx: &InlineContext<'_>,
    depth: usize,
) -> Option<(InlineNode, usize)> {
    let close = find_label_end(chars, start)?;
    let text: String = chars[start + 1..close].iter().collect();
    let after = close + 1;

    let (href, title, end) = if chars.get(after) == Some(&'(') {
        parse_inline_target(chars, after + 1)?
    } else {
        let (label, end) = if chars.get(after) == Some(&'[') {
            let label_close = find_label_end(chars, after)?;
            let label: String = chars[after + 1..label_close].iter().collect();
            if label.trim().is_empty() {
                (text.clone(), label_close + 1)
            } else {
                (label, label_close + 1)
            }
        } else {
            (text.clone(), after)
        };
        if label.trim().is_empty() {
            return None;
        }
        let reference = ctx.references.get(&normalize_reference(&label))?;
        (reference.href.clone(), reference.title.clone(), end)
    };

    let href = normalize_link(&href);
    if !is_safe_link(&href) {
        return None;
    }

    let children = parse_nested(&text, ctx, depth + 1);
    let link = LinkInline {
        href,
        title,
        children,
        auto: false,
    };
    Some((InlineNode::Link(link), end))
}

/// Parse `href "title")` after the opening parenthesis of an inline link.
fn parse_inline_target(chars: &[char], start: usize) -> Option<(String, Option<String>, usize)> {
    let len = chars.len();
    let j = skip_whitespace(chars, start);
    if chars.get(j) == Some(&')') {
        return Some((String::new(), None, j + 1));
    }

    let (destination, next) = if chars.get(j) == Some(&'<') {
        let mut k = j + 1;
        while k < len && chars[k] != '>' {
            if chars[k] == '<' || chars[k] == '\n' {
                return None;
            }
            if chars[k] == '\\' {
                k += 1;
            }
            k += 1;
        }
        if k >= len {
            return None;
        }
        (chars[j + 1..k].iter().collect::<String>(), k + 1)
    } else {
        let mut k = j;
        let mut parens = 0;
        while k < len {
            let c = chars[k];
            if c == '\\' && k + 1 < len {
                k += 2;
                continue;
            }
            if c.is_whitespace() || c.is_control() {
                break;
            }
            if c == '(' {
                parens += 1;
            } else if c == ')' {
                if parens == 0 {
                    break;
                }
                parens -= 1;
            }
            k += 1;
        }
        if k == j {
            return None;
        }
        (chars[j..k].iter().collect::<String>(), k)
    };

    let mut j = skip_whitespace(chars, next);
    let mut title = None;
    if j > next && matches!(chars.get(j), Some('"' | '\'' | '(')) {
        let rest: String = chars[j..].iter().collect();
        let (raw, remaining) = parse_title(&rest)?;
        title = Some(unescape_all(raw));
        let consumed = rest.chars().count() - remaining.chars().count();
        j = skip_whitespace(chars, j + consumed);
    }

    if chars.get(j) != Some(&')') {
        return None;
    }
    Some((unescape_all(&destination), title, j + 1))
}

fn scan_autolink(chars: &[char], start: usize) -> Option<(InlineNode, usize)> {
    let end = start + chars[start..].iter().position(|&c| c == '>')?;
    let candidate: String = chars[start..=end].iter().collect();
    let url = AUTOLINK.captures(&candidate)?.get(1)?.as_str().to_string();

    let href = normalize_link(&url);
    if !is_safe_link(&href) {
        return None;
    }

    let link = LinkInline {
        href,
        title: None,
        children: vec![InlineNode::Plain(url)],
        auto: true,
    };
    Some((InlineNode::Link(link), end + 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Strong(char),
    Emphasis(char),
}

impl FrameKind {
    fn delimited(marker: char, width: usize) -> Self {
        if width == 2 {
            FrameKind::Strong(marker)
        } else {
            FrameKind::Emphasis(marker)
        }
    }

    fn delimiter(self) -> Option<(char, usize)> {
        match self {
            FrameKind::Root => None,
            FrameKind::Strong(marker) => Some((marker, 2)),
            FrameKind::Emphasis(marker) => Some((marker, 1)),
        }
    }
}

struct InlineFrame {
    kind: FrameKind,
    buffer: String,
    children: InlineContent,
}

impl InlineFrame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            buffer: String::new(),
            children: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        !self.buffer.is_empty() || !self.children.is_empty()
    }

    fn push_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        if let Some(InlineNode::Plain(existing)) = self.children.last_mut() {
            existing.push_str(&text);
        } else {
            self.children.push(InlineNode::Plain(text));
        }
    }

    fn push_node(&mut self, node: InlineNode) {
        self.flush_buffer();
        match node {
            InlineNode::Plain(text) => {
                if text.is_empty() {
                    return;
                }
                if let Some(InlineNode::Plain(existing)) = self.children.last_mut() {
                    existing.push_str(&text);
                } else {
                    self.children.push(InlineNode::Plain(text));
                }
            }
            other => self.children.push(other),
        }
    }

    /// Strip spaces before a line break, returning how many there were.
    fn trim_trailing_spaces(&mut self) -> usize {
        self.flush_buffer();
        let Some(InlineNode::Plain(text)) = self.children.last_mut() else {
            return 0;
        };
        let kept = text.trim_end_matches(' ').len();
        let removed = text.len() - kept;
        text.truncate(kept);
        if text.is_empty() {
            self.children.pop();
        }
        removed
    }

    fn into_node(self) -> InlineNode {
        match self.kind {
            FrameKind::Root => panic!("Cannot convert root frame into inline node"),
            FrameKind::Strong(marker) => InlineNode::Strong {
                marker,
                children: self.children,
            },
            FrameKind::Emphasis(marker) => InlineNode::Emphasis {
                marker,
                children: self.children,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> InlineContent {
        let references = HashMap::new();
        parse_inlines(
            text,
            &InlineContext {
                references: &references,
                max_nesting: 20,
            },
        )
    }

    fn plain(text: &str) -> InlineNode {
        InlineNode::Plain(text.to_string())
    }

    #[test]
    fn parses_plain_text() {
        assert_eq!(parse("hello world"), vec![plain("hello world")]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn parses_strong_and_emphasis() {
        assert_eq!(
            parse("a **bold** and *it*"),
            vec![
                plain("a "),
                InlineNode::Strong {
                    marker: '*',
                    children: vec![plain("bold")]
                },
                plain(" and "),
                InlineNode::Emphasis {
                    marker: '*',
                    children: vec![plain("it")]
                },
            ]
        );
    }

    #[test]
    fn unclosed_delimiters_fall_back_to_text() {
        assert_eq!(parse("2 * 3 = *six"), vec![plain("2 * 3 = *six")]);
        assert_eq!(parse("**open"), vec![plain("**open")]);
    }

    #[test]
    fn underscore_is_not_intraword() {
        assert_eq!(parse("snake_case_name"), vec![plain("snake_case_name")]);
    }

    #[test]
    fn parses_code_spans() {
        assert_eq!(
            parse("run `cargo *test*` now"),
            vec![
                plain("run "),
                InlineNode::Code {
                    content: "cargo *test*".into(),
                    markup: "`".into()
                },
                plain(" now"),
            ]
        );
        assert_eq!(
            parse("`` a`b ``"),
            vec![InlineNode::Code {
                content: "a`b".into(),
                markup: "``".into()
            }]
        );
        assert_eq!(parse("``x`"), vec![plain("``x`")]);
    }

    #[test]
    fn escapes_punctuation_only() {
        assert_eq!(parse(r"\*not em\* \d"), vec![plain(r"*not em* \d")]);
        assert_eq!(parse("end\\"), vec![plain("end\\")]);
    }

    #[test]
    fn line_breaks() {
        assert_eq!(
            parse("a\n  b"),
            vec![plain("a"), InlineNode::SoftBreak, plain("b")]
        );
        assert_eq!(
            parse("a  \nb"),
            vec![plain("a"), InlineNode::HardBreak, plain("b")]
        );
        assert_eq!(
            parse("a\\\nb"),
            vec![plain("a"), InlineNode::HardBreak, plain("b")]
        );
    }

    #[test]
    fn parses_inline_links() {
        let nodes = parse("see [the docs](https://example.com \"Docs\")!");
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            InlineNode::Link(link) => {
                assert_eq!(link.href, "https://example.com");
                assert_eq!(link.title.as_deref(), Some("Docs"));
                assert_eq!(link.children, vec![plain("the docs")]);
                assert!(!link.auto);
            }
            other => panic!("expected link, got {:?}", other),
        }
        assert_eq!(nodes[2], plain("!"));
    }

    #[test]
    fn resolves_reference_links() {
        let mut references = HashMap::new();
        references.insert(
            "docs".to_string(),
            LinkReference {
                href: "/docs".into(),
                title: None,
            },
        );
        let ctx = InlineContext {
            references: &references,
            max_nesting: 20,
        };

        for source in ["[Docs]", "[Docs][]", "[read][docs]"] {
            let nodes = parse_inlines(source, &ctx);
            assert!(
                matches!(&nodes[0], InlineNode::Link(link) if link.href == "/docs"),
                "{} -> {:?}",
                source,
                nodes
            );
        }
        assert_eq!(parse_inlines("[missing]", &ctx), vec![plain("[missing]")]);
    }

    #[test]
    fn rejects_script_links() {
        assert_eq!(
            parse("[x](javascript:alert(1))"),
            vec![plain("[x](javascript:alert(1))")]
        );
    }

    #[test]
    fn parses_autolinks() {
        let nodes = parse("<https://example.com/a?b=c>");
        match &nodes[0] {
            InlineNode::Link(link) => {
                assert!(link.auto);
                assert_eq!(link.href, "https://example.com/a?b=c");
            }
            other => panic!("expected autolink, got {:?}", other),
        }
        assert_eq!(parse("a <b> c"), vec![plain("a <b> c")]);
    }
}
