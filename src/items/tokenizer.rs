//! # Item Tokenizer
//!
//! Splits one raw argument into literal fragments and escaped separator
//! characters. A backslash only escapes characters that belong to a
//! separator; before anything else it is kept as-is, including a trailing
//! lone backslash.

use super::separator::SeparatorSet;

/// One piece of a tokenized argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text that may contain separators
    Literal(String),
    /// A separator character preceded by `\`, never a split point
    Escaped(char),
}

impl Token {
    /// The text this token contributes to a key or value
    pub fn text(&self) -> String {
        match self {
            Token::Literal(s) => s.clone(),
            Token::Escaped(ch) => ch.to_string(),
        }
    }
}

/// Tokenize `arg`, e.g. `foo\=bar\\baz` becomes `["foo", '=', "bar\\baz"]`.
///
/// The result always starts with a literal, which may be empty, and every
/// escaped character is followed by a fresh literal.
pub fn tokenize(arg: &str, separators: &SeparatorSet) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = arg.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            current.push(ch);
            continue;
        }

        match chars.next() {
            Some(next) if separators.is_separator_char(next) => {
                tokens.push(Token::Literal(std::mem::take(&mut current)));
                tokens.push(Token::Escaped(next));
            }
            Some(next) => {
                current.push('\\');
                current.push(next);
            }
            None => current.push('\\'),
        }
    }

    tokens.push(Token::Literal(current));
    tokens
}

/// Concatenate the text of `tokens`
pub fn join(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}
