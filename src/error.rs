//! Error types.
//!
//! Only construction can fail: parsing path data, looking up routes and reading configuration.
//! Animating never returns errors, absent paths or nodes are skipped instead.

use thiserror::Error;

/// Errors produced while parsing svg path data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The path data contains nothing but whitespace
    #[error("path data is empty")]
    Empty,

    /// Path data has to start with a moveto command
    #[error("path data must start with a moveto command, found '{found}'")]
    MissingMoveTo {
        /// The first character which was found instead
        found: char,
    },

    /// Malformed path data after the leading moveto
    #[error("invalid path data: {message}")]
    Syntax {
        /// The tokenizer's description, including the character position
        message: String,
    },
}

/// The crate's error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid svg path data
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A route id which is not part of the catalog
    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// A weather name which is not one of `sun`, `rain`, `fog` or `snow`
    #[error("unknown weather '{0}'")]
    UnknownWeather(String),

    /// Malformed json configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
