//! # Input Classification
//!
//! Resolves the positional arguments, the piped stdin payload and the
//! options into a method, a normalized URL, the parsed items and the body kind.

use crate::config::Options;
use crate::error::ParseError;
use crate::items::{parse_item, Item, Separator, SeparatorSet};
use bytes::Bytes;
use regex::Regex;
use serde::Serialize;
use std::io::Read;
use std::sync::OnceLock;

/// Shape of the request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyKind {
    #[default]
    Empty,
    Json,
    Form,
    Raw,
}

fn method_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z]+$").expect("method pattern is valid"))
}

fn scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9.+-]*://").expect("scheme pattern is valid"))
}

fn shorthand_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:(\d*)(/?.*)$").expect("shorthand pattern is valid"))
}

/// Everything gathered from one invocation before the request is assembled
#[derive(Debug, Clone)]
pub struct Input {
    options: Options,
    method: String,
    url: String,
    items: Vec<Item>,
    stdin_data: Option<Bytes>,
    body_kind: BodyKind,
}

impl Input {
    /// Build the input from `[METHOD] URL [ITEMS ...]` and an optional piped stdin.
    ///
    /// `stdin` should only be given when standard input is not a terminal.
    pub fn new<R: Read>(
        args: &[String],
        stdin: Option<R>,
        options: Options,
    ) -> Result<Self, ParseError> {
        options.validate()?;

        let (method, url, items) = split_args(args)?;

        let mut input = Self {
            options,
            method: String::new(),
            url: String::new(),
            items: Vec::new(),
            stdin_data: None,
            body_kind: BodyKind::Empty,
        };

        input.process_items(items)?;
        input.process_stdin(stdin)?;
        input.method = resolve_method(method, input.body_kind)?;
        input.url = normalize_url(url, input.options.effective_scheme());

        tracing::debug!(
            method = %input.method,
            url = %input.url,
            items = input.items.len(),
            body_kind = ?input.body_kind,
            "input resolved"
        );
        Ok(input)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn stdin_data(&self) -> Option<&Bytes> {
        self.stdin_data.as_ref()
    }

    pub fn body_kind(&self) -> BodyKind {
        self.body_kind
    }

    /// Parse every item left to right and derive the body kind from them
    fn process_items(&mut self, args: &[String]) -> Result<(), ParseError> {
        let (items, body_kind) = classify_items(args, &SeparatorSet::all(), &self.options)?;
        self.items = items;
        self.body_kind = body_kind;
        Ok(())
    }

    fn process_stdin<R: Read>(&mut self, stdin: Option<R>) -> Result<(), ParseError> {
        let Some(mut stdin) = stdin else {
            return Ok(());
        };

        let mut data = Vec::new();
        stdin.read_to_end(&mut data)?;
        if data.is_empty() {
            tracing::debug!("stdin is piped but empty, ignoring");
            return Ok(());
        }

        if self.body_kind != BodyKind::Empty {
            return Err(ParseError::config(
                "request body (from stdin) and request item (key=value) cannot be mixed",
            ));
        }

        tracing::debug!(bytes = data.len(), "using stdin as raw request body");
        self.body_kind = BodyKind::Raw;
        self.stdin_data = Some(Bytes::from(data));
        Ok(())
    }
}

/// Split positionals into `(method, url, items)`.
///
/// With two or more arguments an alphabetic first argument is taken as the method.
fn split_args(args: &[String]) -> Result<(Option<&str>, &str, &[String]), ParseError> {
    match args {
        [] => Err(ParseError::MissingUrl),
        [url] => Ok((None, url.as_str(), &[])),
        [first, second, rest @ ..] if method_regex().is_match(first) => {
            Ok((Some(first.as_str()), second.as_str(), rest))
        }
        [url, rest @ ..] => Ok((None, url.as_str(), rest)),
    }
}

/// Parse `args` as items and resolve the body kind they imply.
///
/// A data field selects the preferred kind unless a raw JSON field or a file
/// upload came before it. Those force JSON and a form; the last one wins.
pub fn classify_items(
    args: &[String],
    separators: &SeparatorSet,
    options: &Options,
) -> Result<(Vec<Item>, BodyKind), ParseError> {
    let preferred = options.preferred_body_kind();
    let mut body_kind = BodyKind::Empty;
    let mut forced = false;
    let mut items = Vec::with_capacity(args.len());

    for arg in args {
        let item = parse_item(arg, separators)?;
        match item.separator() {
            Separator::DataField if !forced => body_kind = preferred,
            Separator::DataField => {}
            Separator::RawJsonField => {
                body_kind = BodyKind::Json;
                forced = true;
            }
            Separator::FileUpload => {
                body_kind = BodyKind::Form;
                forced = true;
            }
            Separator::Header | Separator::EmptyHeader | Separator::QueryParam => {}
        }
        items.push(item);
    }

    tracing::debug!(count = items.len(), ?body_kind, "items classified");
    Ok((items, body_kind))
}

/// Upper-case an explicit method, or guess one from the body kind
pub fn resolve_method(method: Option<&str>, body_kind: BodyKind) -> Result<String, ParseError> {
    match method {
        Some(method) if !method.is_empty() => {
            if !method_regex().is_match(method) {
                return Err(ParseError::InvalidMethod(method.to_string()));
            }
            Ok(method.to_uppercase())
        }
        _ => Ok(guess_method(body_kind).to_string()),
    }
}

pub fn guess_method(body_kind: BodyKind) -> &'static str {
    match body_kind {
        BodyKind::Empty => "GET",
        BodyKind::Json | BodyKind::Form | BodyKind::Raw => "POST",
    }
}

/// Prefix a scheme to `url` when it has none, expanding `:port/path` to localhost.
///
/// IPv6-looking input starting with `::` keeps its double colon.
pub fn normalize_url(url: &str, scheme: &str) -> String {
    let url = url.strip_prefix("://").unwrap_or(url);

    if scheme_regex().is_match(url) {
        return url.to_string();
    }

    let prefix = format!("{scheme}://");
    let Some(caps) = shorthand_regex().captures(url) else {
        return prefix + url;
    };

    let port = caps.get(1).map_or("", |m| m.as_str());
    let rest = caps.get(2).map_or("", |m| m.as_str());

    let mut normalized = if url.starts_with("::") {
        prefix + ":"
    } else {
        prefix + "localhost"
    };
    if !port.is_empty() {
        normalized.push(':');
        normalized.push_str(port);
    }
    normalized.push_str(rest);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn no_stdin() -> Option<Cursor<Vec<u8>>> {
        None
    }

    fn piped(data: &str) -> Option<Cursor<Vec<u8>>> {
        Some(Cursor::new(data.as_bytes().to_vec()))
    }

    #[test]
    fn test_normalize_url() {
        let cases = [
            ("localhost", "http://localhost"),
            ("://domain.xxx/get", "http://domain.xxx/get"),
            (":", "http://localhost"),
            (":/", "http://localhost/"),
            (":3000", "http://localhost:3000"),
            (":/path", "http://localhost/path"),
            (":3000/", "http://localhost:3000/"),
            (":3000/path", "http://localhost:3000/path"),
            ("::1", "http://::1"),
            ("::ffff:c000:0280", "http://::ffff:c000:0280"),
            (
                "0000:0000:0000:0000:0000:0000:0000:0001",
                "http://0000:0000:0000:0000:0000:0000:0000:0001",
            ),
            ("https://example.org", "https://example.org"),
            ("ws+unix://socket", "ws+unix://socket"),
        ];

        for (url, expected) in cases {
            assert_eq!(normalize_url(url, "http"), expected, "{url}");
        }
    }

    #[test]
    fn test_normalize_url_with_https() {
        assert_eq!(normalize_url("localhost", "https"), "https://localhost");
        assert_eq!(normalize_url("://domain.xxx/get", "https"), "https://domain.xxx/get");
        assert_eq!(normalize_url(":8443", "https"), "https://localhost:8443");
    }

    #[test]
    fn test_resolve_method() {
        assert_eq!(resolve_method(Some("post"), BodyKind::Empty).unwrap(), "POST");
        assert_eq!(resolve_method(None, BodyKind::Empty).unwrap(), "GET");
        assert_eq!(resolve_method(None, BodyKind::Raw).unwrap(), "POST");
        assert_eq!(resolve_method(Some(""), BodyKind::Json).unwrap(), "POST");

        let err = resolve_method(Some("G3T"), BodyKind::Empty).unwrap_err();
        assert!(matches!(err, ParseError::InvalidMethod(m) if m == "G3T"));
    }

    #[test]
    fn test_classify_items() {
        let (items, body_kind) = classify_items(
            &args(&["data=field", "test:header"]),
            &SeparatorSet::all(),
            &Options::new(),
        )
        .unwrap();

        assert_eq!(
            items,
            vec![
                Item::new("data", "field", Separator::DataField, "data=field"),
                Item::new("test", "header", Separator::Header, "test:header"),
            ]
        );
        assert_eq!(body_kind, BodyKind::Json);
    }

    #[test]
    fn data_field_should_honor_form_preference() {
        let mut options = Options::new();
        options.form = true;
        let (_, body_kind) =
            classify_items(&args(&["data=field"]), &SeparatorSet::all(), &options).unwrap();
        assert_eq!(body_kind, BodyKind::Form);
    }

    #[test]
    fn forcing_items_should_override_in_argument_order() {
        let separators = SeparatorSet::all();
        let options = Options::new();

        let (_, kind) = classify_items(&args(&["a:=1", "b=2"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Json);

        let (_, kind) = classify_items(&args(&["f@/tmp/x", "b=2"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Form);

        let (_, kind) = classify_items(&args(&["b=2", "f@/tmp/x"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Form);

        let (_, kind) = classify_items(&args(&["f@/tmp/x", "a:=1"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Json);

        let (_, kind) = classify_items(&args(&["h:v", "q==1"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Empty);
    }

    #[test]
    fn data_field_after_forcing_item_should_not_reset_kind() {
        let separators = SeparatorSet::all();
        let mut options = Options::new();
        options.form = true;

        let (_, kind) = classify_items(&args(&["n:=1", "b=2"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Json);

        let (_, kind) = classify_items(&args(&["b=2", "n:=1", "c=3"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Json);

        let (_, kind) = classify_items(&args(&["b=2", "c=3"]), &separators, &options).unwrap();
        assert_eq!(kind, BodyKind::Form);
    }

    #[test]
    fn test_split_args() {
        assert!(matches!(split_args(&[]), Err(ParseError::MissingUrl)));

        let only_url = args(&["example.org"]);
        let (method, url, items) = split_args(&only_url).unwrap();
        assert_eq!((method, url, items.len()), (None, "example.org", 0));

        let with_method = args(&["put", "example.org", "a=b"]);
        let (method, url, items) = split_args(&with_method).unwrap();
        assert_eq!((method, url, items.len()), (Some("put"), "example.org", 1));

        let without_method = args(&["example.org/get", "a=b", "c:d"]);
        let (method, url, items) = split_args(&without_method).unwrap();
        assert_eq!((method, url, items.len()), (None, "example.org/get", 2));
    }

    #[test]
    fn alphabetic_url_followed_by_item_is_taken_as_method() {
        let err = Input::new(&args(&["query==value", "localhost"]), no_stdin(), Options::new())
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidItem { .. }));

        let input =
            Input::new(&args(&["localhost", "query==value"]), no_stdin(), Options::new()).unwrap();
        assert_eq!(input.method(), "LOCALHOST");
        assert_eq!(input.url(), "http://query==value");
        assert!(input.items().is_empty());
    }

    #[test]
    fn input_should_guess_method_from_items() {
        let input = Input::new(&args(&["example.org", "a=b"]), no_stdin(), Options::new()).unwrap();
        assert_eq!(input.method(), "POST");
        assert_eq!(input.url(), "http://example.org");
        assert_eq!(input.body_kind(), BodyKind::Json);

        let input = Input::new(&args(&["example.org", "q==1"]), no_stdin(), Options::new()).unwrap();
        assert_eq!(input.method(), "GET");
        assert_eq!(input.body_kind(), BodyKind::Empty);
    }

    #[test]
    fn stdin_should_become_raw_body() {
        let input = Input::new(&args(&["example.org"]), piped("{\"a\":1}"), Options::new()).unwrap();
        assert_eq!(input.body_kind(), BodyKind::Raw);
        assert_eq!(input.method(), "POST");
        assert_eq!(input.stdin_data().unwrap().as_ref(), b"{\"a\":1}");
    }

    #[test]
    fn empty_stdin_should_be_ignored() {
        let input = Input::new(&args(&["example.org", "a=b"]), piped(""), Options::new()).unwrap();
        assert_eq!(input.body_kind(), BodyKind::Json);
        assert!(input.stdin_data().is_none());
    }

    #[test]
    fn stdin_and_data_items_should_not_mix() {
        for items in [["example.org", "a=b"], ["example.org", "a:=1"], ["example.org", "f@x"]] {
            let err = Input::new(&args(&items), piped("payload"), Options::new()).unwrap_err();
            assert!(err.is_config(), "{items:?}");
        }
    }

    #[test]
    fn stdin_with_header_items_should_be_allowed() {
        let input =
            Input::new(&args(&["example.org", "X-Trace:1"]), piped("payload"), Options::new())
                .unwrap();
        assert_eq!(input.body_kind(), BodyKind::Raw);
    }

    #[test]
    fn json_and_form_together_should_fail() {
        let mut options = Options::new();
        options.json = true;
        options.form = true;
        let err = Input::new(&args(&["example.org"]), no_stdin(), options).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn https_option_should_apply_to_url() {
        let mut options = Options::new();
        options.https = true;
        let input = Input::new(&args(&["://domain.xxx/get"]), no_stdin(), options).unwrap();
        assert_eq!(input.url(), "https://domain.xxx/get");
    }
}
