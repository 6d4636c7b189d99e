//! Purpose: `json-keypath` CLI entry point.
//! Role: Binary crate root; parses args, extracts the value at a keypath, emits JSON on stdout.
//! Invariants: Stdout carries exactly one JSON document on success and nothing on failure.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueHint, error::ErrorKind as ClapErrorKind};
use json_keypath::api::{Error, ErrorKind, KeyPathDecoder, to_exit_code};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "json-keypath",
    version,
    about = "Print the JSON value found at a keypath",
    long_about = r#"Print the JSON value found at a keypath.

Each keypath segment names an object member; the value at the last segment is
printed as JSON. An empty keypath selects the whole document."#,
    after_help = r#"EXAMPLES
  $ json-keypath level1.level2 data.json
  $ cat data.json | json-keypath --pretty custom
  $ json-keypath --separator / level1/level2 data.json"#
)]
struct Cli {
    #[arg(help = "Keypath to extract (empty string selects the document root)")]
    key_path: String,
    #[arg(
        help = "JSON document to read (stdin when omitted or '-')",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(
        short,
        long,
        default_value = ".",
        value_parser = clap::builder::NonEmptyStringValueParser::new(),
        help = "Separator between keypath segments"
    )]
    separator: String,
    #[arg(long, help = "Indent the printed JSON value")]
    pretty: bool,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(0);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `json-keypath --help`."));
            }
        },
    };

    let document = read_document(cli.file.as_deref())?;
    tracing::debug!(bytes = document.len(), key_path = %cli.key_path, "read document");

    let decoder = KeyPathDecoder::new().with_separator(cli.separator);
    let value: Value = decoder.decode(&document, &cli.key_path)?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode value")
            .with_source(err)
    })?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write output")
            .with_source(err)
    })?;
    Ok(0)
}

fn read_document(file: Option<&Path>) -> Result<Vec<u8>, Error> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error: ").to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::KeyNotFound => "key not found".to_string(),
        ErrorKind::TypeMismatch => "type mismatch".to_string(),
        ErrorKind::Parse => "invalid json".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    use std::error::Error as _;

    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    if !err.path().is_empty() {
        inner.insert("path".to_string(), json!(err.path()));
    }
    if let Some(inner_path) = err.inner_path() {
        inner.insert("at".to_string(), json!(inner_path));
    }
    if let Some(expected) = err.expected() {
        inner.insert("expected".to_string(), json!(expected));
    }
    if let Some(found) = err.found() {
        inner.insert("found".to_string(), json!(found.as_str()));
    }
    if let (Some(line), Some(column)) = (err.line(), err.column()) {
        inner.insert("line".to_string(), json!(line));
        inner.insert("column".to_string(), json!(column));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(key) = err.key() {
        lines.push(format!("key: {key:?}"));
    }
    if !err.path().is_empty() {
        lines.push(format!("path: {}", err.path().join(".")));
    }
    if let Some(inner_path) = err.inner_path() {
        lines.push(format!("at: {inner_path}"));
    }
    if let (Some(expected), Some(found)) = (err.expected(), err.found()) {
        lines.push(format!("expected: {expected}, found: {found}"));
    }
    if let (Some(line), Some(column)) = (err.line(), err.column()) {
        lines.push(format!("position: line {line}, column {column}"));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{error_json, error_text};
    use json_keypath::api::{Error, ErrorKind, JsonKind};

    #[test]
    fn error_json_includes_navigation_context() {
        let err = Error::new(ErrorKind::TypeMismatch)
            .with_message("member \"list\" is a array, not an object")
            .with_key("list")
            .with_path(["level1"])
            .with_expected("object")
            .with_found(JsonKind::Array);

        let value = error_json(&err);
        let inner = value.get("error").and_then(|v| v.as_object()).expect("error");
        assert_eq!(inner.get("kind").and_then(|v| v.as_str()), Some("TypeMismatch"));
        assert_eq!(inner.get("key").and_then(|v| v.as_str()), Some("list"));
        assert_eq!(inner["path"][0], "level1");
        assert_eq!(inner.get("found").and_then(|v| v.as_str()), Some("array"));
        assert!(inner.get("line").is_none());
    }

    #[test]
    fn error_text_lists_hint_and_position() {
        let err = Error::new(ErrorKind::Parse)
            .with_message("document is not valid JSON")
            .with_hint("parse category: eof; context: document root")
            .with_position(1, 4);

        let text = error_text(&err);
        assert!(text.starts_with("error: document is not valid JSON"));
        assert!(text.contains("hint: parse category: eof"));
        assert!(text.contains("position: line 1, column 4"));
    }
}
