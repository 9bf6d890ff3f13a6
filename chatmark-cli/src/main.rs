//! Command-line interface for chatmark
//! Renders markdown chat messages to HTML, or dumps the tokens and abbreviations of a parse.
//!
//! Usage:
//!   chatmark [`<path>`|-] [--format `<format>`] [--config `<file>`]   - Render a file or stdin
//!   chatmark --list-formats                                          - List output formats

mod transforms;

use anyhow::{anyhow, Context};
use chatmark_config::{ChatmarkConfig, Loader};
use chatmark_parser::markdown::loader::DocumentLoader;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let matches = Command::new("chatmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render markdown chat messages, expanding *[ABBR]: definitions")
        .arg(
            Arg::new("path")
                .help("Markdown file to read; `-` or nothing reads stdin")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(PossibleValuesParser::new(transforms::format_names()))
                .default_value("html"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("no-abbr")
                .long("no-abbr")
                .help("Do not install the abbreviation plugin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("linkify")
                .long("linkify")
                .help("Turn bare URLs into links")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("breaks")
                .long("breaks")
                .help("Render single line breaks as <br>")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("xhtml")
                .long("xhtml")
                .help("Close void tags XHTML style")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return Ok(());
    }

    let config = load_config(&matches)?;
    init_logging(&config.logging.level);

    let md = config
        .build_markdown()
        .context("failed to install plugins")?;

    let path = matches.get_one::<String>("path").map(String::as_str);
    let loader = match path {
        None | Some("-") => {
            DocumentLoader::from_reader(std::io::stdin().lock()).context("failed to read stdin")?
        }
        Some(path) => {
            DocumentLoader::from_path(path).with_context(|| format!("failed to read {}", path))?
        }
    };

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("html");
    tracing::debug!(format, source = path.unwrap_or("-"), "rendering");

    let output = transforms::execute_format(&loader, &md, format).map_err(|e| anyhow!(e))?;
    print!("{}", output);
    Ok(())
}

/// Defaults, then `--config`, then flag overrides.
fn load_config(matches: &ArgMatches) -> anyhow::Result<ChatmarkConfig> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let flags = [
        ("linkify", "markdown.linkify", true),
        ("breaks", "markdown.breaks", true),
        ("xhtml", "markdown.xhtml_out", true),
        ("no-abbr", "plugins.abbr", false),
    ];
    for (flag, key, value) in flags {
        if matches.get_flag(flag) {
            loader = loader.set_override(key, value)?;
        }
    }

    loader.build().context("failed to load configuration")
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout stays clean.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for (name, description) in transforms::AVAILABLE_FORMATS {
        println!("  {}", name);
        println!("    {}", description);
        println!();
    }
}
