use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

const DEFAULT_LOG_PATH: &str = "/tmp/sumochat-debug.log";
const LOG_PATH_ENV: &str = "SUMOCHAT_LOG_PATH";

/// A stream line matched the event framing but its payload failed to decode.
/// The line is dropped; rendering continues.
pub fn emit_parse_error(channel: &str, data: &str, parse_error: &serde_json::Error) {
    let message =
        format!("SUMOCHAT ERROR {channel}_parse_failed error={parse_error}\ndata:\n{data}\n");
    emit_log_message(&message);
}

/// A formatting collaborator (highlighter, JSON pretty-printer) degraded.
/// The section still renders, unformatted.
pub fn emit_render_warning(context: &str, detail: &str) {
    let message = format!("SUMOCHAT WARN render_degraded context={context} detail={detail}\n");
    emit_log_message(&message);
}

fn emit_log_message(message: &str) {
    if let Some(path) = resolve_log_path() {
        if append_log_file(&path, message).is_ok() {
            return;
        }
    }

    eprintln!("{message}");
}

fn resolve_log_path() -> Option<String> {
    std::env::var(LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(DEFAULT_LOG_PATH.to_string())
            } else {
                None
            }
        })
}

fn append_log_file(path: &str, message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(message.as_bytes())
}
