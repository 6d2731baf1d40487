//! # Request Items
//!
//! Parses `key<sep>value` arguments given after the URL.

use super::separator::{Separator, SeparatorSet};
use super::tokenizer::{join, tokenize, Token};
use crate::error::ParseError;
use serde::Serialize;
use std::collections::BTreeMap;

/// One parsed request item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    key: String,
    value: String,
    separator: Separator,
    raw: String,
}

impl Item {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        separator: Separator,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            separator,
            raw: raw.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// The argument exactly as it was given on the command line
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Parse a raw argument into an [`Item`].
///
/// The earliest separator in the first literal fragment that holds one wins;
/// at equal offsets the longest separator wins (`:=` over `:`, `==` over `=`).
/// Escaped separator characters are never split points.
pub fn parse_item(arg: &str, separators: &SeparatorSet) -> Result<Item, ParseError> {
    let tokens = tokenize(arg, separators);

    for (i, token) in tokens.iter().enumerate() {
        let Token::Literal(fragment) = token else {
            continue;
        };

        let mut found: BTreeMap<usize, Separator> = BTreeMap::new();
        for sep in separators.iter() {
            if let Some(pos) = fragment.find(sep.as_str()) {
                found.insert(pos, sep);
            }
        }

        let Some((&pos, &separator)) = found.iter().next() else {
            continue;
        };

        let key = join(&tokens[..i]) + &fragment[..pos];
        let value = fragment[pos + separator.as_str().len()..].to_string() + &join(&tokens[i + 1..]);

        tracing::trace!(arg, key = %key, value = %value, %separator, "parsed item");
        return Ok(Item::new(key, value, separator, arg));
    }

    Err(ParseError::InvalidItem {
        arg: arg.to_string(),
    })
}
