//! # Separators
//!
//! The closed vocabulary of request item separators and the immutable set
//! handed to the tokenizer and the item parser.

use serde::Serialize;
use std::fmt;

/// Kind of a request item, named after the separator that introduces it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Separator {
    /// `Header:value`
    Header,
    /// `Header;` sends the header with an empty value
    EmptyHeader,
    /// `field=value` string body field
    DataField,
    /// `field:=json` body field embedded as raw JSON
    RawJsonField,
    /// `field@path` file attachment
    FileUpload,
    /// `name==value` URL query parameter
    QueryParam,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Header => ":",
            Separator::EmptyHeader => ";",
            Separator::DataField => "=",
            Separator::RawJsonField => ":=",
            Separator::FileUpload => "@",
            Separator::QueryParam => "==",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Separators recognized while parsing one invocation.
///
/// Kept ordered by ascending separator length so that, when two candidates
/// start at the same offset, the longer one is recorded last and wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorSet {
    separators: Vec<Separator>,
}

impl SeparatorSet {
    pub fn new(separators: impl IntoIterator<Item = Separator>) -> Self {
        let mut separators = separators_dedup(separators);
        separators.sort_by_key(|sep| sep.as_str().len());
        Self { separators }
    }

    /// Every item kind accepted after the URL
    pub fn all() -> Self {
        Self::new([
            Separator::Header,
            Separator::EmptyHeader,
            Separator::QueryParam,
            Separator::DataField,
            Separator::RawJsonField,
            Separator::FileUpload,
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = Separator> + '_ {
        self.separators.iter().copied()
    }

    /// Whether `ch` appears in any separator of the set and can therefore be escaped
    pub fn is_separator_char(&self, ch: char) -> bool {
        self.separators.iter().any(|sep| sep.as_str().contains(ch))
    }
}

fn separators_dedup(separators: impl IntoIterator<Item = Separator>) -> Vec<Separator> {
    let mut seen = Vec::new();
    for sep in separators {
        if !seen.contains(&sep) {
            seen.push(sep);
        }
    }
    seen
}
