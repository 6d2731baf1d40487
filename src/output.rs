//! # Output Rendering
//!
//! Formats the request (verbose mode) and the response as text, with
//! headers sorted by name and JSON bodies indented by four spaces.

use crate::client::HttpResponse;
use crate::request::RequestDescription;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Indentation used for every pretty-printed JSON document
pub const JSON_INDENT: &[u8] = b"    ";

/// Serialize `value` as JSON indented with [`JSON_INDENT`]
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render the request line, headers and body as they will be sent
pub fn render_request(request: &RequestDescription) -> String {
    let (host, target) = split_url(request.url());

    let mut text = format!("{} {} HTTP/1.1\n", request.method(), target);

    let mut headers: Vec<(String, String)> = request.headers().clone();
    if let Some(host) = host {
        if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("host")) {
            headers.push(("Host".to_string(), host));
        }
    }
    write_headers(&mut text, &headers);

    if request.is_multipart() {
        text.push('\n');
        for (key, value) in request.form_fields() {
            text.push_str(&format!("{key}={value}\n"));
        }
        for part in request.files() {
            text.push_str(&format!("{}@{}\n", part.field, part.path.display()));
        }
    } else if let Some(body) = request.body() {
        text.push('\n');
        text.push_str(&format_body(body, request.content_type()));
        text.push('\n');
    }

    text.push('\n');
    text
}

/// Render the status line, headers and body of a response
pub fn render_response(response: &HttpResponse) -> String {
    let mut text = format!(
        "{} {} {}\n",
        response.version(),
        response.status(),
        response.reason()
    );
    write_headers(&mut text, response.headers());

    text.push('\n');
    text.push_str(&format_body(response.body(), response.header("content-type")));
    text
}

/// One-line timing summary shown after a verbose response, e.g. `(128ms)`
pub fn render_timing(response: &HttpResponse) -> String {
    format!("({}ms)\n", response.duration_ms())
}

fn write_headers(text: &mut String, headers: &[(String, String)]) {
    let mut sorted: Vec<&(String, String)> = headers.iter().collect();
    sorted.sort_by(|a, b| a.0.to_ascii_lowercase().cmp(&b.0.to_ascii_lowercase()));
    for (key, value) in sorted {
        text.push_str(&format!("{key}: {value}\n"));
    }
}

/// Pretty-print JSON bodies, decode everything else with the declared charset
pub fn format_body(body: &[u8], content_type: Option<&str>) -> String {
    if body.is_empty() {
        return String::new();
    }

    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if let Ok(pretty) = to_pretty_json(&value) {
            return pretty;
        }
    }

    let encoding = content_type
        .and_then(charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "body contained undecodable bytes");
    }
    text.into_owned()
}

fn charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

/// Split a URL into `(host[:port], path?query)` for the request line
fn split_url(url: &str) -> (Option<String>, String) {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().map(|host| match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            });
            let mut target = parsed.path().to_string();
            if let Some(query) = parsed.query() {
                target.push('?');
                target.push_str(query);
            }
            (host, target)
        }
        Err(_) => (None, url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::BodyKind;
    use crate::items::{Item, Separator};
    use crate::request::assemble_parts;
    use bytes::Bytes;

    #[test]
    fn json_body_should_be_indented_with_four_spaces() {
        let formatted = format_body(br#"{"a":1,"b":[true]}"#, Some("application/json"));
        assert_eq!(formatted, "{\n    \"a\": 1,\n    \"b\": [\n        true\n    ]\n}");
    }

    #[test]
    fn json_key_order_should_be_preserved() {
        let formatted = format_body(br#"{"z":1,"a":2}"#, None);
        assert!(formatted.find("\"z\"").unwrap() < formatted.find("\"a\"").unwrap());
    }

    #[test]
    fn non_json_body_should_be_decoded_with_charset() {
        assert_eq!(format_body(b"plain text", Some("text/plain")), "plain text");
        let latin1 = [0x63, 0x61, 0x66, 0xE9];
        assert_eq!(format_body(&latin1, Some("text/plain; charset=ISO-8859-1")), "café");
    }

    #[test]
    fn charset_parameter_should_be_found() {
        assert_eq!(charset("text/html; charset=\"utf-8\""), Some("utf-8".to_string()));
        assert_eq!(charset("text/html"), None);
    }

    #[test]
    fn request_should_render_sorted_headers_and_host() {
        let items = vec![
            Item::new("X-Zeta", "z", Separator::Header, "X-Zeta:z"),
            Item::new("name", "blue", Separator::DataField, "name=blue"),
            Item::new("page", "1", Separator::QueryParam, "page==1"),
        ];
        let request = assemble_parts(
            "POST",
            "http://example.org:8080/api",
            &items,
            BodyKind::Json,
            None,
        )
        .unwrap();

        let text = render_request(&request);
        let expected = "POST /api?page=1 HTTP/1.1\n\
                        Accept: application/json, */*;q=0.5\n\
                        Content-Type: application/json\n\
                        Host: example.org:8080\n\
                        X-Zeta: z\n\
                        \n\
                        {\n    \"name\": \"blue\"\n}\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn response_should_render_status_headers_and_body() {
        let response = HttpResponse::new(
            "HTTP/1.1",
            404,
            "Not Found",
            vec![
                ("server".to_string(), "test".to_string()),
                ("content-type".to_string(), "text/plain".to_string()),
            ],
            Bytes::from_static(b"missing"),
        );
        assert_eq!(
            render_response(&response),
            "HTTP/1.1 404 Not Found\ncontent-type: text/plain\nserver: test\n\nmissing"
        );
    }

    #[test]
    fn timing_should_show_response_duration() {
        let response = HttpResponse::new("HTTP/1.1", 200, "OK", Vec::new(), Bytes::new())
            .with_duration_ms(128);
        assert_eq!(response.duration_ms(), 128);
        assert_eq!(render_timing(&response), "(128ms)\n");
    }
}
