//! # bluehttp - HTTPie-style HTTP Client
//!
//! Turns a compact, shell-friendly argument list into an HTTP request:
//!
//! ```text
//! bluehttp [METHOD] URL [ITEMS ...]
//!
//!   Header:value      request header
//!   Header;           header with an empty value
//!   field=value       string body field
//!   field:=json       raw JSON body field
//!   field@path        file upload (multipart form)
//!   name==value       URL query parameter
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐
//! │ tokenizer │──▶│ item parser  │──▶│ input        │──▶│ request assembler  │
//! │ (escapes) │   │ (separators) │   │ (body kind)  │   │ (headers/query/body)│
//! └───────────┘   └──────────────┘   └──────────────┘   └────────────────────┘
//!                                                                 │
//!                                           ┌─────────────────────┴─────┐
//!                                           ▼                           ▼
//!                                      HttpClient                   output
//! ```

pub mod client;
pub mod cmd_args;
pub mod config;
pub mod debug;
pub mod error;
pub mod input;
pub mod items;
pub mod output;
pub mod request;

// Re-export main types for easy access
pub use client::{HttpClient, HttpResponse};
pub use cmd_args::CommandLineArgs;
pub use config::Options;
pub use error::ParseError;
pub use input::{BodyKind, Input};
pub use items::{parse_item, tokenize, Item, Separator, SeparatorSet, Token};
pub use request::{assemble, RequestDescription};
