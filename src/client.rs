//! # HTTP Client
//!
//! Executes an assembled request with a blocking reqwest client and hands
//! back an owned response for rendering.

use crate::request::RequestDescription;
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::Method;
use std::time::{Duration, Instant};

/// Response captured in full, detached from the connection
#[derive(Debug, Clone)]
pub struct HttpResponse {
    version: String,
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    duration_ms: u64,
}

impl HttpResponse {
    pub fn new(
        version: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        Self {
            version: version.into(),
            status,
            reason: reason.into(),
            headers,
            body,
            duration_ms: 0,
        }
    }

    /// Protocol version, e.g. `HTTP/1.1`
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Wall time from send to the last body byte
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Thin wrapper over `reqwest::blocking::Client`
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        tracing::debug!(?timeout, "creating HTTP client");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Translate the description into a reqwest request without sending it
    pub fn prepare(&self, request: &RequestDescription) -> Result<RequestBuilder> {
        let method = Method::from_bytes(request.method().as_bytes())
            .with_context(|| format!("invalid HTTP method: {}", request.method()))?;

        let mut builder = self.client.request(method, request.url());
        for (key, value) in request.headers() {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if request.is_multipart() {
            let mut form = multipart::Form::new();
            for (key, value) in request.form_fields() {
                form = form.text(key.clone(), value.clone());
            }
            for part in request.files() {
                form = form
                    .file(part.field.clone(), &part.path)
                    .with_context(|| format!("cannot attach file {}", part.path.display()))?;
            }
            builder = builder.multipart(form);
        } else if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        Ok(builder)
    }

    /// Send the request and read the whole response body
    pub fn execute(&self, request: &RequestDescription) -> Result<HttpResponse> {
        let builder = self.prepare(request)?;
        let start_time = Instant::now();

        tracing::info!(method = request.method(), url = request.url(), "sending request");
        let response = builder
            .send()
            .with_context(|| format!("HTTP request failed: {} {}", request.method(), request.url()))?;

        let version = format!("{:?}", response.version());
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().context("failed to read response body")?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!(status = status.as_u16(), duration_ms, bytes = body.len(), "response received");

        Ok(HttpResponse::new(
            version,
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            headers,
            body,
        )
        .with_duration_ms(duration_ms))
    }
}
