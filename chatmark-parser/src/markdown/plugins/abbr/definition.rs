//! Abbreviation definitions: `*[LABEL]: Expansion`.

use crate::markdown::block::BlockState;
use once_cell::sync::Lazy;
use regex::Regex;

static LABEL_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(.)").unwrap());

/// A definition line split into its unescaped label and trimmed expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub label: String,
    pub expansion: String,
}

/// Recognize a definition within `src[start..end]` (one line, indentation already skipped).
///
/// `LABEL` may not contain a bare `[` or `]`; `\X` stands for a literal `X`. Returns `None`
/// for anything that is not a complete definition, including an empty label or expansion.
pub fn parse_definition(src: &str, start: usize, end: usize) -> Option<Definition> {
    let bytes = src.as_bytes();
    let mut pos = start;

    if pos + 2 >= end {
        return None;
    }
    if bytes[pos] != b'*' || bytes[pos + 1] != b'[' {
        return None;
    }
    pos += 2;

    let label_start = pos;
    let mut label_end = None;
    while pos < end {
        match bytes[pos] {
            b'[' => return None,
            b']' => {
                label_end = Some(pos);
                break;
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    let label_end = label_end?;
    if label_end + 1 >= end || bytes[label_end + 1] != b':' {
        return None;
    }

    let label = LABEL_ESCAPE
        .replace_all(&src[label_start..label_end], "$1")
        .into_owned();
    let expansion = src[label_end + 2..end].trim();
    if label.is_empty() || expansion.is_empty() {
        return None;
    }

    Some(Definition {
        label,
        expansion: expansion.to_string(),
    })
}

/// Block rule collecting one definition per line into `env.abbreviations`.
///
/// In probe mode it only reports whether the line is a definition.
pub fn abbr_def(
    state: &mut BlockState<'_>,
    start_line: usize,
    _end_line: usize,
    silent: bool,
) -> bool {
    let start = state.content_start(start_line);
    let end = state.e_marks[start_line];

    let Some(definition) = parse_definition(state.src, start, end) else {
        return false;
    };

    if silent {
        return true;
    }

    let Definition { label, expansion } = definition;
    if state.env.abbreviations.contains(&label) {
        tracing::debug!(label = %label, "ignoring redefined abbreviation");
    } else {
        tracing::debug!(label = %label, expansion = %expansion, "abbreviation defined");
        state.env.abbreviations.insert(label, expansion);
    }

    state.line = start_line + 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::engine::Markdown;
    use crate::markdown::env::Env;
    use crate::markdown::plugins::abbr::abbr_plugin;
    use crate::markdown::token::TokenKind;
    use rstest::rstest;

    fn parse_line(line: &str) -> Option<Definition> {
        parse_definition(line, 0, line.len())
    }

    fn abbr_md() -> Markdown {
        let mut md = Markdown::new();
        md.use_plugin(abbr_plugin).unwrap();
        md
    }

    #[test]
    fn test_parses_label_and_trimmed_expansion() {
        assert_eq!(
            parse_line("*[HTML]:   HyperText Markup Language  "),
            Some(Definition {
                label: "HTML".into(),
                expansion: "HyperText Markup Language".into()
            })
        );
    }

    #[test]
    fn test_escapes_in_label() {
        let definition = parse_line(r"*[a\]b\\c]: weird").unwrap();
        assert_eq!(definition.label, r"a]b\c");
    }

    #[rstest]
    #[case::too_short("*[")]
    #[case::no_star("[HTML]: x")]
    #[case::no_bracket("*HTML: x")]
    #[case::unterminated("*[HTML: x")]
    #[case::nested_bracket("*[HT[ML]: x")]
    #[case::no_colon("*[HTML] x")]
    #[case::nothing_after_label("*[HTML]")]
    #[case::empty_label("*[]: text")]
    #[case::empty_expansion("*[HTML]: ")]
    #[case::escaped_close("*[HTML\\]: x")]
    fn test_rejected_lines(#[case] line: &str) {
        assert_eq!(parse_line(line), None);
    }

    #[test]
    fn test_definition_line_is_consumed() {
        let md = abbr_md();
        let mut env = Env::new();
        let tokens = md.parse("*[HTML]: HyperText\n*[CSS]: Cascading", &mut env);

        assert!(tokens.is_empty());
        assert_eq!(env.abbreviations.get("HTML"), Some("HyperText"));
        assert_eq!(env.abbreviations.get("CSS"), Some("Cascading"));
    }

    #[test]
    fn test_indented_definition_is_accepted() {
        let md = abbr_md();
        let mut env = Env::new();
        md.parse("  *[JS]: JavaScript", &mut env);
        assert_eq!(env.abbreviations.get("JS"), Some("JavaScript"));
    }

    #[test]
    fn test_first_definition_wins() {
        let md = abbr_md();
        let mut env = Env::new();
        md.parse("*[L]: A\n\ntext\n\n*[L]: B", &mut env);
        assert_eq!(env.abbreviations.get("L"), Some("A"));
        assert_eq!(env.abbreviations.len(), 1);
    }

    #[test]
    fn test_definition_interrupts_paragraph() {
        let md = abbr_md();
        let mut env = Env::new();
        let tokens = md.parse("Some text\n*[API]: Application Programming Interface", &mut env);

        assert_eq!(tokens[1].content, "Some text");
        assert_eq!(env.abbreviations.len(), 1);
    }

    #[test]
    fn test_rejected_definition_stays_content() {
        let md = abbr_md();
        let mut env = Env::new();
        let tokens = md.parse("*[]: text", &mut env);

        assert!(env.abbreviations.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::ParagraphOpen);
        assert_eq!(tokens[1].content, "*[]: text");
    }

    #[test]
    fn test_rejected_definition_does_not_interrupt_paragraph() {
        let md = abbr_md();
        let mut env = Env::new();
        let tokens = md.parse("text\n*[L]:", &mut env);
        assert_eq!(tokens[1].content, "text\n*[L]:");
    }

    #[test]
    fn test_probe_mode_leaves_table_untouched() {
        let md = abbr_md();
        let mut env = Env::new();
        let mut tokens = Vec::new();
        let mut state = BlockState::new("*[X]: y", &md, &mut env, &mut tokens);

        assert!(abbr_def(&mut state, 0, 1, true));
        assert_eq!(state.line, 0);
        assert!(state.env.abbreviations.is_empty());

        assert!(abbr_def(&mut state, 0, 1, false));
        assert_eq!(state.line, 1);
        assert_eq!(state.env.abbreviations.get("X"), Some("y"));
    }
}
