//! HTML renderer for the token stream.
//!
//! Tokens with a dedicated output (text, code, breaks) are handled by kind. Everything else,
//! including `abbr_open` / `abbr_close` from the abbreviation plugin, goes through the generic
//! tag renderer, which only needs `tag`, `nesting`, `attrs` and `block`.

use crate::markdown::common::{escape_html, unescape_all};
use crate::markdown::options::Options;
use crate::markdown::token::{Nesting, Token, TokenKind};

#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, tokens: &[Token], options: &Options) -> String {
        let mut out = String::new();
        for (idx, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Inline => {
                    if let Some(children) = &token.children {
                        self.render_inline(children, options, &mut out);
                    }
                }
                TokenKind::CodeBlock => {
                    out.push_str("<pre");
                    push_attrs(token, &mut out);
                    out.push_str("><code>");
                    out.push_str(&escape_html(&token.content));
                    out.push_str("</code></pre>\n");
                }
                TokenKind::Fence => render_fence(token, options, &mut out),
                _ => render_tag(tokens, idx, options, &mut out),
            }
        }
        out
    }

    pub fn render_inline(&self, children: &[Token], options: &Options, out: &mut String) {
        for (idx, token) in children.iter().enumerate() {
            match token.kind {
                TokenKind::Text => out.push_str(&escape_html(&token.content)),
                TokenKind::CodeInline => {
                    out.push_str("<code");
                    push_attrs(token, out);
                    out.push('>');
                    out.push_str(&escape_html(&token.content));
                    out.push_str("</code>");
                }
                TokenKind::Hardbreak => out.push_str(line_break(options)),
                TokenKind::Softbreak => {
                    if options.breaks {
                        out.push_str(line_break(options));
                    } else {
                        out.push('\n');
                    }
                }
                _ => render_tag(children, idx, options, out),
            }
        }
    }
}

fn line_break(options: &Options) -> &'static str {
    if options.xhtml_out {
        "<br />\n"
    } else {
        "<br>\n"
    }
}

fn render_fence(token: &Token, options: &Options, out: &mut String) {
    let info = unescape_all(&token.info);
    let lang = info.split_whitespace().next().unwrap_or("");

    out.push_str("<pre><code");
    if !lang.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_html(&options.lang_prefix));
        out.push_str(&escape_html(lang));
        out.push('"');
    }
    push_attrs(token, out);
    out.push('>');
    out.push_str(&escape_html(&token.content));
    out.push_str("</code></pre>\n");
}

/// Generic open/close/self-closing tag.
fn render_tag(tokens: &[Token], idx: usize, options: &Options, out: &mut String) {
    let token = &tokens[idx];
    if token.hidden {
        return;
    }

    // Block tags following a hidden token start on a new line.
    if token.block && token.nesting != Nesting::Close && idx > 0 && tokens[idx - 1].hidden {
        out.push('\n');
    }

    out.push_str(if token.nesting == Nesting::Close {
        "</"
    } else {
        "<"
    });
    out.push_str(&token.tag);
    push_attrs(token, out);

    if token.nesting == Nesting::SelfClosing && options.xhtml_out {
        out.push_str(" /");
    }

    let mut need_lf = token.block;
    if token.block && token.nesting == Nesting::Open {
        if let Some(next) = tokens.get(idx + 1) {
            if next.kind == TokenKind::Inline || next.hidden {
                need_lf = false;
            } else if next.nesting == Nesting::Close && next.tag == token.tag {
                need_lf = false;
            }
        }
    }

    out.push_str(if need_lf { ">\n" } else { ">" });
}

fn push_attrs(token: &Token, out: &mut String) {
    for (name, value) in &token.attrs {
        out.push(' ');
        out.push_str(&escape_html(name));
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use crate::markdown::engine::Markdown;
    use crate::markdown::options::Options;
    use crate::markdown::plugins::abbr::abbr_plugin;
    use rstest::rstest;

    #[rstest]
    #[case("hello", "<p>hello</p>\n")]
    #[case("# Title", "<h1>Title</h1>\n")]
    #[case("a\n\n---\n\nb", "<p>a</p>\n<hr>\n<p>b</p>\n")]
    #[case("a < b & \"c\"", "<p>a &lt; b &amp; &quot;c&quot;</p>\n")]
    #[case("`x<y`", "<p><code>x&lt;y</code></p>\n")]
    #[case("    code\n", "<pre><code>code\n</code></pre>\n")]
    #[case("```rust\nfn main() {}\n```", "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n")]
    #[case("**b** *i*", "<p><strong>b</strong> <em>i</em></p>\n")]
    #[case("[t](/u \"T\")", "<p><a href=\"/u\" title=\"T\">t</a></p>\n")]
    #[case("a\nb", "<p>a\nb</p>\n")]
    #[case("a  \nb", "<p>a<br>\nb</p>\n")]
    fn test_default_rendering(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(Markdown::new().render(src), expected);
    }

    #[test]
    fn test_xhtml_and_breaks() {
        let md = Markdown::with_options(Options {
            xhtml_out: true,
            breaks: true,
            ..Options::default()
        });
        assert_eq!(md.render("a\nb"), "<p>a<br />\nb</p>\n");
        assert_eq!(md.render("***"), "<hr />\n");
    }

    #[test]
    fn test_custom_lang_prefix() {
        let md = Markdown::with_options(Options {
            lang_prefix: "lang-".to_string(),
            ..Options::default()
        });
        assert_eq!(
            md.render("~~~ py extra\nx\n~~~"),
            "<pre><code class=\"lang-py\">x\n</code></pre>\n"
        );
    }

    #[test]
    fn test_abbr_title_is_escaped() {
        let mut md = Markdown::new();
        md.use_plugin(abbr_plugin).unwrap();
        assert_eq!(
            md.render("*[Q]: \"quoted\" & <tagged>\n\nQ?"),
            "<p><abbr title=\"&quot;quoted&quot; &amp; &lt;tagged&gt;\">Q</abbr>?</p>\n"
        );
    }
}
