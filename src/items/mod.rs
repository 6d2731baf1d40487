//! # Request Item Parsing
//!
//! Turns the HTTPie-style arguments after the URL (`Header:value`,
//! `field=value`, `name==value`, ...) into typed [`Item`]s.

pub mod item;
pub mod separator;
pub mod tokenizer;

pub use item::{parse_item, Item};
pub use separator::{Separator, SeparatorSet};
pub use tokenizer::{tokenize, Token};
