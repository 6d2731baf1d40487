use std::ffi::OsString;
use std::time::Duration;

pub use clap::Parser;

use crate::config::{self, Options, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "HTTP client with HTTPie-style request items",
    long_about = None,
    override_usage = "bluehttp [OPTIONS] [METHOD] URL [ITEMS]..."
)]
struct ClapArgs {
    /// Default scheme
    /// Optional. Used when the URL does not name one. Falls back to
    /// BLUEHTTP_DEFAULT_SCHEME, then to `https` when invoked as `https`, then `http`.
    #[clap(long, help = "Default scheme for URLs without one")]
    scheme: Option<String>,

    /// Prefer https
    #[clap(long, help = "Use https:// for URLs without a scheme")]
    https: bool,

    /// JSON mode (default)
    /// Optional. Data items are serialized as a JSON object.
    #[clap(short = 'j', long, help = "Serialize data items as a JSON object (default)")]
    json: bool,

    /// Form mode
    /// Optional. Data items are serialized as form fields; file items make it multipart.
    #[clap(short = 'f', long, help = "Serialize data items as form fields")]
    form: bool,

    /// Verbose mode
    /// Optional. Print the whole request as well as the response.
    #[clap(
        short = 'v',
        long,
        help = "Print the request as well as the response",
        default_value = "false"
    )]
    verbose: bool,

    /// Debug mode
    #[clap(long, help = "Print the resolved options and input")]
    debug: bool,

    /// Offline mode
    #[clap(long, help = "Build and print the request without sending it")]
    offline: bool,

    /// Transport timeout in seconds
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS, help = "Request timeout in seconds")]
    timeout: u64,

    /// [METHOD] URL [ITEMS]...
    #[clap(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "[METHOD] URL [ITEMS]..."
    )]
    args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    program: String,
    scheme: Option<String>,
    https: bool,
    json: bool,
    form: bool,
    verbose: bool,
    debug: bool,
    offline: bool,
    timeout: u64,
    args: Vec<String>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::parse_from(std::env::args_os())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let raw: Vec<OsString> = itr.into_iter().map(Into::into).collect();
        let program = raw
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let args = ClapArgs::parse_from(raw);
        Self {
            program,
            scheme: args.scheme,
            https: args.https,
            json: args.json,
            form: args.form,
            verbose: args.verbose,
            debug: args.debug,
            offline: args.offline,
            timeout: args.timeout,
            args: args.args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn https(&self) -> bool {
        self.https
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn form(&self) -> bool {
        self.form
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn offline(&self) -> bool {
        self.offline
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Positional arguments: `[METHOD] URL [ITEMS]...`
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build the options record, resolving the default scheme from the environment
    pub fn options(&self) -> Options {
        let mut options = Options::new();
        options.json = self.json;
        options.form = self.form;
        options.verbose = self.verbose;
        options.debug = self.debug;
        options.https = self.https;
        options.offline = self.offline;
        options.timeout = self.timeout();
        if let Some(scheme) = config::resolve_default_scheme(self.scheme(), &self.program) {
            options.set_scheme(scheme);
        }
        options
    }
}
