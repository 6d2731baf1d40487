//! # bluehttp Main Entry Point
//!
//! Parses the command line, assembles the request, sends it and prints the result.

use anyhow::Result;
use bluehttp::{assemble, config, debug, output, CommandLineArgs, HttpClient, Input};
use std::io::{self, Write};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cmd_args = CommandLineArgs::parse();
    let options = cmd_args.options();
    tracing::debug!(?options, "options resolved");

    // Only read stdin when something is piped in
    let stdin = if atty::is(atty::Stream::Stdin) {
        None
    } else {
        Some(io::stdin().lock())
    };

    let input = Input::new(cmd_args.args(), stdin, options)?;
    let mut out = io::stdout().lock();

    if input.options().debug {
        out.write_all(debug::render_debug(&input)?.as_bytes())?;
    }

    let request = assemble(&input)?;

    if input.options().verbose || input.options().offline {
        out.write_all(output::render_request(&request).as_bytes())?;
    }

    if input.options().offline {
        return Ok(());
    }

    let client = HttpClient::new(input.options().timeout)?;
    let response = client.execute(&request)?;

    out.write_all(output::render_response(&response).as_bytes())?;
    if !response.body().is_empty() {
        out.write_all(b"\n")?;
    }
    if input.options().verbose {
        out.write_all(output::render_timing(&response).as_bytes())?;
    }
    out.flush()?;

    Ok(())
}
