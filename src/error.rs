//! # Parse Errors
//!
//! Everything that can go wrong while turning command-line arguments into a
//! request description. None of these are retried; the first one aborts the run.

use thiserror::Error;

/// Errors raised by the item parser, the input classifier and the request assembler.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Mutually exclusive options, or stdin combined with request items
    #[error("{0}")]
    Config(String),

    /// No positional arguments at all
    #[error("URL is required")]
    MissingUrl,

    /// The argument contains none of the recognized separators
    #[error("{arg} is not a valid value")]
    InvalidItem { arg: String },

    /// Explicit METHOD token with non-alphabetic characters
    #[error("METHOD must consist of alphabet: {0}")]
    InvalidMethod(String),

    /// `Header;value` style item, which must not carry a value
    #[error("invalid item {arg} (to specify an empty header use `Header;`)")]
    InvalidEmptyHeader { arg: String },

    /// `field:=value` item whose value is not a JSON literal
    #[error("invalid item {arg}: value is not valid JSON ({source})")]
    InvalidJson {
        arg: String,
        #[source]
        source: serde_json::Error,
    },

    /// The collected body fields could not be serialized
    #[error("marshaling JSON of HTTP body: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Reading piped standard input failed
    #[error("reading request body from stdin: {0}")]
    Stdin(#[from] std::io::Error),
}

impl ParseError {
    pub fn config(message: impl Into<String>) -> Self {
        ParseError::Config(message.into())
    }

    /// Whether this error stems from conflicting options rather than malformed syntax
    pub fn is_config(&self) -> bool {
        matches!(self, ParseError::Config(_))
    }
}
