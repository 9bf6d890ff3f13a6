//! HTML output snapshots for whole documents

use chatmark_parser::markdown::loader::DocumentLoader;
use chatmark_parser::markdown::testing::workspace_path;
use chatmark_parser::{abbr_plugin, Markdown, Options};

fn render(src: &str) -> String {
    let mut md = Markdown::new();
    md.use_plugin(abbr_plugin).unwrap();
    md.render(src)
}

#[test]
fn test_worked_example_html() {
    let html = render("*[HTML]: HyperText Markup Language\n\nHTML is great.");
    insta::assert_snapshot!(html.trim_end(), @r#"<p><abbr title="HyperText Markup Language">HTML</abbr> is great.</p>"#);
}

#[test]
fn test_sample_document_html() {
    let mut md = Markdown::new();
    md.use_plugin(abbr_plugin).unwrap();
    let html = DocumentLoader::from_path(workspace_path("docs/samples/abbreviations.md"))
        .unwrap()
        .render(&md);
    insta::assert_snapshot!(html.trim_end(), @r#"
    <h1><abbr title="HyperText Markup Language">HTML</abbr> notes</h1>
    <p>The <abbr title="HyperText Markup Language">HTML</abbr> standard is maintained by the <abbr title="World Wide Web Consortium">W3C</abbr> and the <abbr title="Web Hypertext Application Technology Working Group">WHATWG</abbr>.
    HTML5 is not defined here, so it stays plain.</p>
    "#);
}

#[test]
fn test_mixed_blocks_html() {
    let src = "\
*[CLI]: Command Line Interface

# The CLI

Run the **CLI** with `--help`.

---

    CLI inside code
";
    insta::assert_snapshot!(render(src).trim_end(), @r#"
    <h1>The <abbr title="Command Line Interface">CLI</abbr></h1>
    <p>Run the <strong><abbr title="Command Line Interface">CLI</abbr></strong> with <code>--help</code>.</p>
    <hr>
    <pre><code>CLI inside code
    </code></pre>
    "#);
}

#[test]
fn test_rejected_definition_stays_visible() {
    let html = render("Intro\n*[]: empty label");
    insta::assert_snapshot!(html.trim_end(), @r#"
    <p>Intro
    *[]: empty label</p>
    "#);
}

#[test]
fn test_xhtml_output() {
    let mut md = Markdown::with_options(Options {
        xhtml_out: true,
        breaks: true,
        ..Options::default()
    });
    md.use_plugin(abbr_plugin).unwrap();
    let html = md.render("*[OK]: okay\n\nOK\nfine\n\n***");
    insta::assert_snapshot!(html.trim_end(), @r#"
    <p><abbr title="okay">OK</abbr><br />
    fine</p>
    <hr />
    "#);
}
