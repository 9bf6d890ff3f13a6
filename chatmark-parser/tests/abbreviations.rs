//! Abbreviation definitions and annotation, end to end
//!
//! Every test parses a full document with the abbreviation plugin installed and checks the
//! resulting inline children through the fluent token assertions.

use chatmark_parser::markdown::loader::DocumentLoader;
use chatmark_parser::markdown::testing::{assert_tokens, workspace_path};
use chatmark_parser::{abbr_plugin, Env, Markdown, Options, Token, TokenKind};
use rstest::rstest;

fn md() -> Markdown {
    let mut md = Markdown::new();
    md.use_plugin(abbr_plugin).unwrap();
    md
}

/// `(label, title)` of every annotation in document order.
fn annotations(tokens: &[Token]) -> Vec<(String, String)> {
    let mut found = Vec::new();
    for inline in tokens.iter().filter(|t| t.kind == TokenKind::Inline) {
        let children = inline.children.as_deref().unwrap_or(&[]);
        for (idx, child) in children.iter().enumerate() {
            if child.kind == TokenKind::AbbrOpen {
                let title = child.attr_get("title").unwrap_or_default().to_string();
                found.push((children[idx + 1].content.clone(), title));
            }
        }
    }
    found
}

fn labels(src: &str) -> Vec<String> {
    annotations(&md().tokenize(src))
        .into_iter()
        .map(|(label, _)| label)
        .collect()
}

#[test]
fn test_worked_example() {
    let tokens = md().tokenize("*[HTML]: HyperText Markup Language\n\nHTML is great.");
    assert_tokens(&tokens)
        .kinds(&[
            TokenKind::ParagraphOpen,
            TokenKind::Inline,
            TokenKind::ParagraphClose,
        ])
        .inline(0, |inline| {
            inline
                .child_count(5)
                .text(0, "")
                .abbr(1, "HTML", "HyperText Markup Language")
                .text(4, " is great.")
        });
}

#[rstest]
#[case::bounded_by_space("*[GO]: Go\n\nGOLD GO", &["GO"])]
#[case::shared_boundary("*[A]: Alpha\n*[B]: Beta\n\nA B", &["A", "B"])]
#[case::longest_first("*[HTML]: H\n*[HTML5]: H5\n\nHTML5 and HTML", &["HTML5", "HTML"])]
#[case::symbols_in_label("*[C++]: C plus plus\n\nI like C++.", &["C++"])]
#[case::dots_in_label("*[e.g.]: for example\n\nfruit, e.g. apples", &["e.g."])]
#[case::apostrophe("*[API]: x\n\napi API's", &["API"])]
#[case::parentheses("*[NASA]: x\n\n(NASA)", &["NASA"])]
#[case::non_ascii("*[ÉTÉ]: summer\n\nl'ÉTÉ", &["ÉTÉ"])]
#[case::escaped_bracket("*[a\\]b]: weird\n\nx a]b y", &["a]b"])]
#[case::case_sensitive("*[Go]: x\n\ngo GO Go", &["Go"])]
#[case::not_inside_words("*[CAT]: x\n\nCATS SCAT CAT9", &[])]
fn test_annotated_labels(#[case] src: &str, #[case] expected: &[&str]) {
    assert_eq!(labels(src), expected);
}

#[rstest]
#[case::empty_label("*[]: nothing\n\nnothing")]
#[case::empty_expansion("*[X]:   \n\nX")]
#[case::missing_colon("*[X] x\n\nX")]
#[case::unterminated("*[X: x\n\nX")]
#[case::nested_bracket("*[X[Y]: x\n\nX")]
fn test_rejected_definitions_define_nothing(#[case] src: &str) {
    let mut env = Env::new();
    let tokens = md().parse(src, &mut env);
    assert!(env.abbreviations.is_empty());
    assert!(annotations(&tokens).is_empty());
}

#[test]
fn test_first_definition_wins() {
    let tokens = md().tokenize("*[X]: first\n*[X]: second\n\nX");
    assert_eq!(
        annotations(&tokens),
        vec![("X".to_string(), "first".to_string())]
    );
}

#[test]
fn test_definition_lines_produce_no_tokens() {
    let tokens = md().tokenize("*[A]: Alpha\n*[B]: Beta");
    assert!(tokens.is_empty());
}

#[test]
fn test_code_is_never_annotated() {
    let tokens = md().tokenize("*[SQL]: Structured Query Language\n\n`SQL` and SQL\n\n```\nSQL\n```");
    assert_eq!(annotations(&tokens).len(), 1);
    let fence = tokens.iter().find(|t| t.kind == TokenKind::Fence).unwrap();
    assert_eq!(fence.content, "SQL\n");
}

#[test]
fn test_link_text_is_annotated_but_href_is_kept() {
    let tokens = md().tokenize("*[URL]: Uniform Resource Locator\n\n[URL](http://URL)");
    assert_tokens(&tokens).inline(0, |inline| {
        inline
            .abbr_count(1)
            .plain_text("URL")
    });
    let children = tokens[1].children.as_ref().unwrap();
    assert_eq!(children[0].attr_get("href"), Some("http://URL"));
}

#[test]
fn test_runs_after_linkify() {
    let mut md = Markdown::with_options(Options {
        linkify: true,
        ..Options::default()
    });
    md.use_plugin(abbr_plugin).unwrap();
    let tokens = md.tokenize("*[WWW]: World Wide Web\n\nWWW: see https://example.com");
    let kinds: Vec<_> = tokens[1]
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Text,
            TokenKind::AbbrOpen,
            TokenKind::Text,
            TokenKind::AbbrClose,
            TokenKind::Text,
            TokenKind::LinkOpen,
            TokenKind::Text,
            TokenKind::LinkClose,
        ]
    );
}

#[test]
fn test_sample_document() {
    let md = md();
    let loader = DocumentLoader::from_path(workspace_path("docs/samples/abbreviations.md")).unwrap();
    let (tokens, env) = loader.parse(&md);

    assert_eq!(env.abbreviations.len(), 3);
    assert_tokens(&tokens)
        .inline_count(2)
        .inline(0, |heading| {
            heading
                .child_count(5)
                .abbr(1, "HTML", "HyperText Markup Language")
                .text(4, " notes")
        })
        .inline(1, |paragraph| {
            paragraph.abbr_count(3).plain_text(
                "The HTML standard is maintained by the W3C and the WHATWG.\
                 HTML5 is not defined here, so it stays plain.",
            )
        });
}

#[test]
fn test_definitions_do_not_leak_between_documents() {
    let md = md();
    let mut first = Env::new();
    md.parse("*[A]: Alpha", &mut first);
    let tokens = md.tokenize("A");
    assert!(annotations(&tokens).is_empty());
}
