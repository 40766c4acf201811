use std::collections::BTreeMap;
use std::io::IsTerminal;

use clap::ValueEnum;
use cmdframe_codec::{Command, ParseError};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    ok: bool,
    frame: String,
    headers: &'a [String],
    kind: Option<&'a str>,
    command: &'a str,
    params: BTreeMap<&'a str, &'a str>,
}

impl<'a> CommandOutput<'a> {
    fn new(cmd: &'a Command) -> Self {
        Self {
            ok: true,
            frame: cmd.to_string(),
            headers: cmd.headers(),
            kind: cmd.msg_kind(),
            command: cmd.command(),
            params: cmd.params().collect(),
        }
    }
}

#[derive(Serialize)]
struct RejectOutput<'a> {
    ok: bool,
    input: &'a str,
    error: String,
}

pub fn print_command(cmd: &Command, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CommandOutput::new(cmd);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["command", cmd.command()])
                .add_row(vec!["kind", cmd.msg_kind().unwrap_or("-")]);
            for (i, header) in cmd.headers().iter().enumerate() {
                table.add_row(vec![format!("header[{i}]"), header.clone()]);
            }
            for (key, value) in cmd.params() {
                table.add_row(vec![format!("param {key}"), value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let params: Vec<String> = cmd.params().map(|(k, v)| format!("{k}={v:?}")).collect();
            println!(
                "command={} kind={} headers=[{}] params=[{}]",
                cmd.command(),
                cmd.msg_kind().unwrap_or("-"),
                cmd.headers().join(", "),
                params.join(", ")
            );
        }
        OutputFormat::Raw => {
            println!("{cmd}");
        }
    }
}

/// Report a frame that failed to parse. Raw output stays clean; the caller
/// reports the error on stderr.
pub fn print_rejection(input: &str, err: &ParseError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = RejectOutput {
                ok: false,
                input,
                error: err.to_string(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INPUT", "ERROR"])
                .add_row(vec![input.to_string(), err.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("rejected input={input:?} error={err}");
        }
        OutputFormat::Raw => {}
    }
}
