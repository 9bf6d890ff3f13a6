//! Block stage
//!
//! The source is split into lines once, up front. For every line we record where it starts,
//! where it ends, where its first non-space byte is and how far it is indented. Block rules then
//! work purely on those offsets, never re-splitting the text.
//!
//! A block rule is called as `rule(state, start_line, end_line, silent)`:
//! - with `silent = false` it consumes lines, pushes tokens and advances `state.line`;
//! - with `silent = true` (probe mode) it only reports whether it would match, and must not
//!   touch tokens, env or the cursor.

pub mod rules;

use crate::markdown::common::is_space;
use crate::markdown::engine::Markdown;
use crate::markdown::env::Env;
use crate::markdown::ruler::Ruler;
use crate::markdown::token::{Nesting, Token, TokenKind};

/// Signature shared by all block rules.
pub type BlockRule = fn(&mut BlockState<'_>, usize, usize, bool) -> bool;

/// Line-indexed view of the source plus the output token list.
pub struct BlockState<'a> {
    pub src: &'a str,
    pub md: &'a Markdown,
    pub env: &'a mut Env,
    pub tokens: &'a mut Vec<Token>,
    /// Byte offset where each line begins.
    pub b_marks: Vec<usize>,
    /// Byte offset of each line's end (the `\n`, or the end of the source).
    pub e_marks: Vec<usize>,
    /// Byte offset of the first non-space character, relative to `b_marks`.
    pub t_shift: Vec<usize>,
    /// Indentation in columns, tabs expanded to the next multiple of 4.
    pub s_count: Vec<usize>,
    /// Required indentation of the current container.
    pub blk_indent: usize,
    /// Next line to process.
    pub line: usize,
    /// Number of lines in the source.
    pub line_max: usize,
}

impl<'a> BlockState<'a> {
    pub fn new(
        src: &'a str,
        md: &'a Markdown,
        env: &'a mut Env,
        tokens: &'a mut Vec<Token>,
    ) -> Self {
        let bytes = src.as_bytes();
        let len = bytes.len();

        let mut b_marks = Vec::new();
        let mut e_marks = Vec::new();
        let mut t_shift = Vec::new();
        let mut s_count = Vec::new();

        let mut start = 0;
        let mut indent = 0;
        let mut offset = 0;
        let mut indent_found = false;

        let mut pos = 0;
        while pos < len {
            let ch = bytes[pos];

            if !indent_found {
                if is_space(ch) {
                    indent += 1;
                    offset += if ch == b'\t' { 4 - offset % 4 } else { 1 };
                    pos += 1;
                    continue;
                }
                indent_found = true;
            }

            if ch == b'\n' || pos == len - 1 {
                let end = if ch == b'\n' { pos } else { pos + 1 };
                b_marks.push(start);
                e_marks.push(end);
                t_shift.push(indent);
                s_count.push(offset);

                indent_found = false;
                indent = 0;
                offset = 0;
                start = pos + 1;
            }
            pos += 1;
        }

        // A source ending in indentation only never reached the line-end branch above.
        if start < len {
            b_marks.push(start);
            e_marks.push(len);
            t_shift.push(indent);
            s_count.push(offset);
        }

        let line_max = b_marks.len();

        // Sentinel line so `line + 1` lookups never go out of bounds.
        b_marks.push(len);
        e_marks.push(len);
        t_shift.push(0);
        s_count.push(0);

        Self {
            src,
            md,
            env,
            tokens,
            b_marks,
            e_marks,
            t_shift,
            s_count,
            blk_indent: 0,
            line: 0,
            line_max,
        }
    }

    /// Byte offset of the first non-space character on `line`.
    pub fn content_start(&self, line: usize) -> usize {
        self.b_marks[line] + self.t_shift[line]
    }

    pub fn is_empty(&self, line: usize) -> bool {
        self.content_start(line) >= self.e_marks[line]
    }

    pub fn skip_empty_lines(&self, mut from: usize) -> usize {
        while from < self.line_max && self.is_empty(from) {
            from += 1;
        }
        from
    }

    /// Text of the line without its leading indentation.
    pub fn line_text(&self, line: usize) -> &'a str {
        &self.src[self.content_start(line)..self.e_marks[line]]
    }

    /// Join lines `[begin, end)`, stripping up to `indent` columns from each.
    pub fn get_lines(&self, begin: usize, end: usize, indent: usize, keep_last_lf: bool) -> String {
        let bytes = self.src.as_bytes();
        let mut out = String::new();

        for line in begin..end {
            let mut first = self.b_marks[line];
            let last = if line + 1 < end || keep_last_lf {
                (self.e_marks[line] + 1).min(bytes.len())
            } else {
                self.e_marks[line]
            };

            let mut column = 0;
            while first < last && column < indent {
                match bytes[first] {
                    b' ' => column += 1,
                    b'\t' => column += 4 - column % 4,
                    _ => break,
                }
                first += 1;
            }

            out.push_str(&self.src[first..last]);
            if keep_last_lf && line + 1 == end && last == self.e_marks[line] {
                // Last line of the source has no `\n` of its own.
                out.push('\n');
            }
        }
        out
    }

    /// Build a block token with its source map set.
    pub fn make_token(
        &self,
        kind: TokenKind,
        tag: &str,
        nesting: Nesting,
        lines: (usize, usize),
    ) -> Token {
        let mut token = Token::new(kind, tag, nesting);
        token.block = true;
        token.map = Some(lines);
        token
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

/// Block-level parser: a ruler of block rules.
pub struct BlockParser {
    pub ruler: Ruler<BlockRule>,
}

impl BlockParser {
    pub fn new() -> Self {
        let mut ruler: Ruler<BlockRule> = Ruler::new();
        let chain: [(&str, BlockRule, &[&str]); 6] = [
            ("code", rules::code::code, &[]),
            ("fence", rules::fence::fence, &["paragraph", "reference"]),
            ("hr", rules::hr::hr, &["paragraph", "reference"]),
            ("reference", rules::reference::reference, &[]),
            ("heading", rules::heading::heading, &["paragraph", "reference"]),
            ("paragraph", rules::paragraph::paragraph, &[]),
        ];
        for (name, rule, alt) in chain {
            ruler.push(name, rule, alt)
                .expect("default rule names are distinct");
        }
        Self { ruler }
    }

    /// Tokenize `src` into block tokens, appending to `tokens`.
    pub fn parse(&self, src: &str, md: &Markdown, env: &mut Env, tokens: &mut Vec<Token>) {
        if src.is_empty() {
            return;
        }
        let mut state = BlockState::new(src, md, env, tokens);
        let end = state.line_max;
        self.tokenize(&mut state, 0, end);
    }

    pub fn tokenize(&self, state: &mut BlockState<'_>, start_line: usize, end_line: usize) {
        let rules = self.ruler.rules_for("");
        let mut line = start_line;

        while line < end_line {
            line = state.skip_empty_lines(line);
            state.line = line;
            if line >= end_line {
                break;
            }
            if state.s_count[line] < state.blk_indent {
                break;
            }

            let matched = rules.iter().any(|rule| {
                let before = state.line;
                rule(state, line, end_line, false) && state.line > before
            });

            if !matched {
                tracing::warn!(line, "no block rule matched, skipping line");
                state.line = line + 1;
            }

            line = state.line;
        }
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}
