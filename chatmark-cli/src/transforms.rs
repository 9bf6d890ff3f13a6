//! CLI output formats
//!
//! Each format is a view of one parse: rendered HTML, the token stream as JSON, or the
//! abbreviations the document defined.

use chatmark_parser::markdown::loader::DocumentLoader;
use chatmark_parser::markdown::token::tokens_to_json;
use chatmark_parser::Markdown;

/// All available output formats with a one-line description.
pub const AVAILABLE_FORMATS: &[(&str, &str)] = &[
    ("html", "Rendered HTML"),
    ("tokens", "Token stream as JSON, inline children included"),
    (
        "abbreviations",
        "Abbreviations defined by the document as a JSON object",
    ),
];

pub fn format_names() -> Vec<&'static str> {
    AVAILABLE_FORMATS.iter().map(|(name, _)| *name).collect()
}

/// Run `loader`'s source through `md` and produce the named format.
pub fn execute_format(
    loader: &DocumentLoader,
    md: &Markdown,
    format: &str,
) -> Result<String, String> {
    match format {
        "html" => Ok(loader.render(md)),
        "tokens" => {
            let (tokens, _) = loader.parse(md);
            to_json(&tokens_to_json(&tokens))
        }
        "abbreviations" => {
            let (_, env) = loader.parse(md);
            to_json(&env.abbreviations)
        }
        _ => Err(format!("Unknown format: {}", format)),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    let mut out = serde_json::to_string_pretty(value)
        .map_err(|e| format!("JSON serialization failed: {}", e))?;
    out.push('\n');
    Ok(out)
}
