//! # Request Assembly
//!
//! Walks the classified items once, in argument order, and produces the
//! request description handed to the transport and the renderer.

use crate::error::ParseError;
use crate::input::{BodyKind, Input};
use crate::items::{Item, Separator};
use bytes::Bytes;
use serde_json::{Map, Value};
use std::path::PathBuf;
use url::form_urlencoded;

/// Type alias for HTTP headers, duplicates allowed
pub type HttpHeaders = Vec<(String, String)>;

/// Type alias for query parameters, duplicates allowed
pub type QueryParams = Vec<(String, String)>;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const JSON_ACCEPT: &str = "application/json, */*;q=0.5";

/// A form field backed by a local file, sent as a multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub path: PathBuf,
}

/// Value of a body field before it is serialized
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Json(Value),
}

impl FieldValue {
    fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Json(v) => v.clone(),
        }
    }

    fn to_form(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Json(v) => v.to_string(),
        }
    }
}

/// Fully assembled request, never mutated once built
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescription {
    method: String,
    url: String,
    headers: HttpHeaders,
    query: QueryParams,
    body: Option<Bytes>,
    content_type: Option<String>,
    form_fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl RequestDescription {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Target URL including the encoded query string
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Query parameters given as `name==value` items
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Effective content type: the explicit header if given, else the body default
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Text fields of a multipart form
    pub fn form_fields(&self) -> &[(String, String)] {
        &self.form_fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }

    /// First value of header `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Assemble the request for a resolved [`Input`]
pub fn assemble(input: &Input) -> Result<RequestDescription, ParseError> {
    assemble_parts(
        input.method(),
        input.url(),
        input.items(),
        input.body_kind(),
        input.stdin_data(),
    )
}

/// Assemble a request from its parts; the first failing item aborts assembly
pub fn assemble_parts(
    method: &str,
    url: &str,
    items: &[Item],
    body_kind: BodyKind,
    stdin: Option<&Bytes>,
) -> Result<RequestDescription, ParseError> {
    let mut headers = HttpHeaders::new();
    let mut query = QueryParams::new();
    let mut fields: Vec<(String, FieldValue)> = Vec::new();
    let mut files = Vec::new();

    for item in items {
        match item.separator() {
            Separator::Header => headers.push((item.key().to_string(), item.value().to_string())),
            Separator::EmptyHeader => {
                if !item.value().is_empty() {
                    return Err(ParseError::InvalidEmptyHeader {
                        arg: item.raw().to_string(),
                    });
                }
                headers.push((item.key().to_string(), String::new()));
            }
            Separator::QueryParam => query.push((item.key().to_string(), item.value().to_string())),
            Separator::DataField => {
                fields.push((item.key().to_string(), FieldValue::Text(item.value().to_string())))
            }
            Separator::RawJsonField => {
                let value = serde_json::from_str(item.value()).map_err(|source| {
                    ParseError::InvalidJson {
                        arg: item.raw().to_string(),
                        source,
                    }
                })?;
                fields.push((item.key().to_string(), FieldValue::Json(value)));
            }
            Separator::FileUpload => files.push(FilePart {
                field: item.key().to_string(),
                path: PathBuf::from(item.value()),
            }),
        }
    }

    if body_kind != BodyKind::Form && !files.is_empty() {
        tracing::warn!(
            files = files.len(),
            ?body_kind,
            "file uploads are only sent with form bodies, dropping them"
        );
        files.clear();
    }

    let explicit_content_type = find_header(&headers, "Content-Type").map(str::to_string);
    let mut form_fields = Vec::new();

    let (body, default_content_type) = match body_kind {
        BodyKind::Empty => (None, None),
        BodyKind::Json => {
            if fields.is_empty() {
                (None, None)
            } else {
                if find_header(&headers, "Accept").is_none() {
                    headers.push(("Accept".to_string(), JSON_ACCEPT.to_string()));
                }
                (Some(json_body(&fields)?), Some(JSON_CONTENT_TYPE))
            }
        }
        BodyKind::Form if !files.is_empty() => {
            form_fields = fields.iter().map(|(k, v)| (k.clone(), v.to_form())).collect();
            (None, None)
        }
        BodyKind::Form => {
            if fields.is_empty() {
                (None, None)
            } else {
                (Some(form_body(&fields)), Some(FORM_CONTENT_TYPE))
            }
        }
        BodyKind::Raw => (stdin.cloned(), Some(JSON_CONTENT_TYPE)),
    };

    let content_type = match explicit_content_type {
        Some(explicit) => Some(explicit),
        None => default_content_type.map(|ct| {
            headers.push(("Content-Type".to_string(), ct.to_string()));
            ct.to_string()
        }),
    };

    let request = RequestDescription {
        method: method.to_string(),
        url: url_with_query(url, &query),
        headers,
        query,
        body,
        content_type,
        form_fields,
        files,
    };

    tracing::debug!(
        method = %request.method,
        url = %request.url,
        headers = request.headers.len(),
        body_len = request.body.as_ref().map_or(0, Bytes::len),
        multipart = request.is_multipart(),
        "request assembled"
    );
    Ok(request)
}

fn json_body(fields: &[(String, FieldValue)]) -> Result<Bytes, ParseError> {
    let mut object = Map::new();
    for (key, value) in fields {
        object.insert(key.clone(), value.to_json());
    }
    Ok(Bytes::from(serde_json::to_vec(&Value::Object(object))?))
}

fn form_body(fields: &[(String, FieldValue)]) -> Bytes {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, &value.to_form());
    }
    Bytes::from(serializer.finish())
}

/// Merge `params` into the query of `url`, encoding keys in sorted order.
///
/// The sort is stable, so repeated keys keep their argument order.
pub fn url_with_query(url: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let (base, existing) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (without_fragment, ""),
    };

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(existing.as_bytes())
        .into_owned()
        .collect();
    pairs.extend(params.iter().cloned());
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish();

    let mut result = format!("{base}?{encoded}");
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }
    result
}
