//! Shared configuration loader for chatmark.
//!
//! `defaults/chatmark.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ChatmarkConfig`].

use chatmark_parser::markdown::ruler::RulerError;
use chatmark_parser::{abbr_plugin, Markdown, Options};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/chatmark.default.toml");

/// Top-level configuration consumed by chatmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatmarkConfig {
    pub markdown: Options,
    pub plugins: PluginsConfig,
    pub logging: LoggingConfig,
}

/// Which optional rule sets get installed.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    pub abbr: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `chatmark_parser=debug`.
    pub level: String,
}

impl ChatmarkConfig {
    /// Build a [`Markdown`] instance with these options and plugins.
    pub fn build_markdown(&self) -> Result<Markdown, RulerError> {
        let mut md = Markdown::with_options(self.markdown.clone());
        if self.plugins.abbr {
            md.use_plugin(abbr_plugin)?;
        }
        Ok(md)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ChatmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ChatmarkConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.markdown, Options::default());
        assert!(config.plugins.abbr);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("markdown.linkify", true)
            .expect("override to apply")
            .set_override("plugins.abbr", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.markdown.linkify);
        assert!(!config.plugins.abbr);
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[markdown]\nlang_prefix = \"lang-\"\n\n[logging]\nlevel = \"debug\"")
            .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.markdown.lang_prefix, "lang-");
        assert_eq!(config.markdown.max_nesting, 20);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/definitely/not/here.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here.toml")
            .build()
            .expect("config to build");
        assert!(config.plugins.abbr);
    }

    #[test]
    fn builds_markdown_with_abbreviations() {
        let md = load_defaults().unwrap().build_markdown().unwrap();
        assert_eq!(
            md.render("*[CSS]: Cascading Style Sheets\n\nCSS"),
            "<p><abbr title=\"Cascading Style Sheets\">CSS</abbr></p>\n"
        );
    }

    #[test]
    fn builds_markdown_without_abbreviations() {
        let md = Loader::new()
            .set_override("plugins.abbr", false)
            .unwrap()
            .build()
            .unwrap()
            .build_markdown()
            .unwrap();
        assert!(!md.block.ruler.is_enabled("abbr_def"));
    }
}
