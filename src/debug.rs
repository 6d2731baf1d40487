//! Debug dump of the resolved options and input, printed with `--debug`.

use crate::input::{BodyKind, Input};
use crate::output::to_pretty_json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OptionsDump<'a> {
    scheme: &'a str,
    json: bool,
    form: bool,
    verbose: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InputDump<'a> {
    method: &'a str,
    url: &'a str,
    body_kind: BodyKind,
    items: Vec<String>,
    stdin_bytes: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DebugDump<'a> {
    options: OptionsDump<'a>,
    input: InputDump<'a>,
}

/// Render `bluehttp v<version>` followed by the input as indented JSON
pub fn render_debug(input: &Input) -> anyhow::Result<String> {
    let options = input.options();
    let dump = DebugDump {
        options: OptionsDump {
            scheme: options.effective_scheme(),
            json: options.json,
            form: options.form,
            verbose: options.verbose,
        },
        input: InputDump {
            method: input.method(),
            url: input.url(),
            body_kind: input.body_kind(),
            items: input.items().iter().map(|item| item.raw().to_string()).collect(),
            stdin_bytes: input.stdin_data().map_or(0, |data| data.len()),
        },
    };

    let json = to_pretty_json(&dump).map_err(|e| anyhow::anyhow!("debug print error: {e}"))?;
    Ok(format!("bluehttp v{}\n\n{}\n\n", env!("CARGO_PKG_VERSION"), json))
}
