//! Document loading utilities
//!
//! `DocumentLoader` reads markdown from a file, a string or any reader and runs it through a
//! configured [`Markdown`] instance. The CLI and the integration tests both go through it.
//!
//! ```rust,ignore
//! let md = Markdown::new();
//! let html = DocumentLoader::from_path("notes.md")?.render(&md);
//! let (tokens, env) = DocumentLoader::from_string("*[A]: Alpha\n\nA").parse(&md);
//! ```

use crate::markdown::engine::Markdown;
use crate::markdown::env::Env;
use crate::markdown::token::Token;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Error that can occur when loading documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// IO error when reading the source
    IoError(String),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

pub struct DocumentLoader {
    source: String,
}

impl DocumentLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(DocumentLoader { source })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
        }
    }

    /// Read everything from `reader`, e.g. stdin.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoaderError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(DocumentLoader { source })
    }

    /// Parse with a fresh environment and hand both back.
    pub fn parse(&self, md: &Markdown) -> (Vec<Token>, Env) {
        let mut env = Env::new();
        let tokens = md.parse(&self.source, &mut env);
        (tokens, env)
    }

    pub fn render(&self, md: &Markdown) -> String {
        md.render(&self.source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
