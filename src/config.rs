//! Configuration for bluehttp
//!
//! The options record resolved from the command line and the environment,
//! plus the environment variable names the binary honors.

use crate::error::ParseError;
use crate::input::BodyKind;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Scheme used when neither the URL nor the options name one
pub const DEFAULT_SCHEME: &str = "http";

/// Environment variable overriding the default scheme
pub const DEFAULT_SCHEME_ENV_VAR: &str = "BLUEHTTP_DEFAULT_SCHEME";

/// Environment variable selecting the tracing level
pub const LOG_LEVEL_ENV_VAR: &str = "BLUEHTTP_LOG_LEVEL";

/// Transport timeout when none is given
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Options shared by the parser, the transport and the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub json: bool,
    pub form: bool,
    pub verbose: bool,
    pub debug: bool,
    pub https: bool,
    pub offline: bool,
    pub timeout: Duration,
    scheme: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self {
            json: false,
            form: false,
            verbose: false,
            debug: false,
            https: false,
            offline: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            scheme: None,
        }
    }

    /// Configured default scheme, `http` when unset or empty
    pub fn scheme(&self) -> &str {
        match self.scheme.as_deref() {
            Some(scheme) if !scheme.is_empty() => scheme,
            _ => DEFAULT_SCHEME,
        }
    }

    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = Some(scheme.into());
    }

    /// Scheme actually prefixed to scheme-less URLs
    pub fn effective_scheme(&self) -> &str {
        if self.https {
            "https"
        } else {
            self.scheme()
        }
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if self.json && self.form {
            return Err(ParseError::config(
                "you cannot specify both of --json and --form",
            ));
        }
        Ok(())
    }

    /// Body kind a plain `field=value` item selects
    pub fn preferred_body_kind(&self) -> BodyKind {
        if self.form {
            BodyKind::Form
        } else {
            BodyKind::Json
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the default scheme: explicit value, then environment, then program name.
///
/// Invoking the binary through an `https` link makes https the default.
pub fn resolve_default_scheme(explicit: Option<&str>, program: &str) -> Option<String> {
    if let Some(scheme) = explicit {
        return Some(scheme.to_string());
    }

    if let Some(scheme) = std::env::var_os(DEFAULT_SCHEME_ENV_VAR).and_then(|v| v.into_string().ok()) {
        if !scheme.is_empty() {
            return Some(scheme);
        }
    }

    let name = std::path::Path::new(program)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    (name == "https").then(|| "https".to_string())
}

/// Tracing level from `BLUEHTTP_LOG_LEVEL`, `error` when unset or unknown
pub fn log_level() -> tracing::Level {
    let level = std::env::var(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| "error".to_string())
        .to_lowercase();

    match level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        _ => tracing::Level::ERROR,
    }
}

/// Subscriber filter at [`log_level`], with the HTTP stack held at `warn`
pub fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .parse_lossy("reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn")
        .add_directive(LevelFilter::from_level(log_level()).into())
}
