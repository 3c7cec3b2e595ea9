use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for spritify operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpritifyError {
    #[error("IO error with {path}: {source}")]
    #[diagnostic(code(spritify::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(spritify::image))]
    Image { path: PathBuf, message: String },

    #[error("SVG error with {path}: {message}")]
    #[diagnostic(code(spritify::svg))]
    Svg { path: PathBuf, message: String },

    #[error("CSS parse error in {path} at {line}:{column}: {message}")]
    #[diagnostic(code(spritify::css))]
    CssParse {
        path: PathBuf,
        message: String,
        line: u32,
        column: u32,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(spritify::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(spritify::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl SpritifyError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpritifyError::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying IO error kind, if this is an IO failure.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            SpritifyError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpritifyError>;
