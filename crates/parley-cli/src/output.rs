//! Terminal output: run summaries, documents, and errors.
//!
//! Network and stats *documents* are always indented JSON, written to a
//! file or to stdout. [`OutputMode`] only shapes what is printed around
//! them: the run summary shown after a document went to a file, and the
//! error report on stderr.
//!
//! The mode comes from `--format` (or the hidden `--json`), then the
//! `FORMAT` environment variable, then whether stdout is a terminal
//! (pretty) or a pipe (text).

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use parley_core::error::ErrorCode;
use parley_core::{NetworkError, TranscriptError, json};
use serde::Serialize;

/// How summaries and errors are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Headed sections with aligned fields, for people.
    Pretty,
    /// Terse `key=value` and tab-separated lines, for scripts.
    Text,
    /// JSON objects.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Parse a `FORMAT` value; unknown values are ignored.
    fn from_env_value(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }

    fn resolve(flag: Option<Self>, json: bool, env: Option<&str>, stdout_is_tty: bool) -> Self {
        flag.or_else(|| json.then_some(Self::Json))
            .or_else(|| env.and_then(Self::from_env_value))
            .unwrap_or(if stdout_is_tty { Self::Pretty } else { Self::Text })
    }
}

/// Pick the output mode for this process.
pub fn resolve_output_mode(flag: Option<OutputMode>, json: bool) -> OutputMode {
    let env = std::env::var("FORMAT").ok();
    OutputMode::resolve(flag, json, env.as_deref(), io::stdout().is_terminal())
}

/// Building blocks for [`OutputMode::Pretty`] summaries.
pub mod pretty {
    use std::io::{self, Write};

    /// Width of the rule under a section title.
    pub const RULE_WIDTH: usize = 60;

    /// A title underlined with a rule.
    pub fn section(w: &mut dyn Write, title: &str) -> io::Result<()> {
        writeln!(w, "{title}")?;
        writeln!(w, "{}", "-".repeat(RULE_WIDTH))
    }

    /// One `label: value` line with values aligned in a column.
    pub fn field(w: &mut dyn Write, label: &str, value: impl AsRef<str>) -> io::Result<()> {
        let label = format!("{label}:");
        writeln!(w, "{label:<16} {}", value.as_ref())
    }
}

/// Print a run summary to stdout in `mode`.
///
/// JSON mode prints `summary` itself; the other modes call their renderer.
pub fn print_summary<T: Serialize>(
    mode: OutputMode,
    summary: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, summary)?;
            writeln!(out)?;
        }
        OutputMode::Text => text(summary, &mut out)?,
        OutputMode::Pretty => pretty(summary, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Write a document to `path`, or to stdout when there is no path.
pub fn write_document<T: Serialize + ?Sized>(path: Option<&Path>, document: &T) -> anyhow::Result<()> {
    let Some(path) = path else {
        let mut out = io::stdout().lock();
        return json::to_writer_indented(&mut out, document).context("failed to write to stdout");
    };

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    json::to_writer_indented(&mut writer, document)
        .and_then(|()| writer.flush().map_err(serde_json::Error::io))
        .with_context(|| format!("failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failed run, ready to print.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Stable `E####` code.
    pub code: &'static str,
    /// What kind of failure `code` stands for.
    pub kind: &'static str,
    /// The full context chain, outermost first.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl ErrorReport {
    /// Describe `err`, coded by the first cause in its chain that parley recognizes.
    pub fn new(err: &anyhow::Error) -> Self {
        let code = classify(err);
        Self {
            code: code.code(),
            kind: code.message(),
            message: format!("{err:#}"),
            hint: code.hint(),
        }
    }

    /// Print the report to stderr.
    pub fn print(&self, mode: OutputMode) -> io::Result<()> {
        let mut out = io::stderr().lock();
        if mode.is_json() {
            serde_json::to_writer_pretty(&mut out, &serde_json::json!({ "error": self }))?;
            return writeln!(out);
        }
        writeln!(out, "error[{}]: {}", self.code, self.message)?;
        match self.hint {
            Some(hint) => writeln!(out, "  hint: {hint}"),
            None => Ok(()),
        }
    }
}

fn classify(err: &anyhow::Error) -> ErrorCode {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<TranscriptError>() {
                Some(ErrorCode::from(e))
            } else if let Some(e) = cause.downcast_ref::<NetworkError>() {
                Some(ErrorCode::from(e))
            } else if cause.is::<toml::de::Error>() {
                Some(ErrorCode::ConfigParseError)
            } else if let Some(e) = cause.downcast_ref::<serde_json::Error>() {
                Some(if e.is_io() {
                    ErrorCode::OutputWriteFailed
                } else {
                    ErrorCode::NetworkMalformed
                })
            } else {
                cause.downcast_ref::<io::Error>().map(|e| match e.kind() {
                    io::ErrorKind::NotFound => ErrorCode::InputNotFound,
                    _ => ErrorCode::OutputWriteFailed,
                })
            }
        })
        .unwrap_or(ErrorCode::InternalUnexpected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::InteractionGraph;
    use parley_core::transcript::{TranscriptLayout, parse_turns};

    #[test]
    fn explicit_format_beats_everything() {
        let mode = OutputMode::resolve(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_shorthand_beats_environment() {
        assert_eq!(
            OutputMode::resolve(None, true, Some("text"), false),
            OutputMode::Json
        );
    }

    #[test]
    fn environment_value_is_case_insensitive() {
        assert_eq!(
            OutputMode::resolve(None, false, Some(" Pretty "), false),
            OutputMode::Pretty
        );
    }

    #[test]
    fn terminal_decides_when_nothing_is_set() {
        assert_eq!(OutputMode::resolve(None, false, None, true), OutputMode::Pretty);
        assert_eq!(
            OutputMode::resolve(None, false, Some("yaml"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn pretty_section_is_underlined() {
        let mut buf = Vec::new();
        pretty::section(&mut buf, "Network").expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Network", "-".repeat(pretty::RULE_WIDTH).as_str()]);
    }

    #[test]
    fn pretty_fields_align() {
        let mut buf = Vec::new();
        pretty::field(&mut buf, "Nodes", "12").expect("write");
        pretty::field(&mut buf, "Total weight", "40").expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "Nodes:           12\nTotal weight:    40\n");
    }

    #[test]
    fn document_goes_to_the_named_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("doc.json");
        write_document(Some(path.as_path()), &serde_json::json!({"a": {"b": 1}})).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}\n");
    }

    #[test]
    fn transcript_errors_keep_their_code_under_context() {
        let err = parse_turns("h,h,h\ne1,w\n", &TranscriptLayout::default()).expect_err("must fail");
        let err = anyhow::Error::new(err).context("failed to load transcript t.csv");
        let report = ErrorReport::new(&err);
        assert_eq!(report.code, "E2002");
        assert!(report.message.starts_with("failed to load transcript t.csv: line 2"));
        assert!(report.hint.is_some());
    }

    #[test]
    fn self_loop_documents_violate_invariants() {
        let err = InteractionGraph::from_json_str(r#"{"a": {"a": 1}}"#).expect_err("must fail");
        assert_eq!(ErrorReport::new(&anyhow::Error::new(err)).code, "E3002");
    }

    #[test]
    fn missing_files_are_input_not_found() {
        let err = std::fs::read_to_string("/definitely/not/here.json")
            .context("failed to read network")
            .expect_err("must fail");
        assert_eq!(classify(&err), ErrorCode::InputNotFound);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = toml::from_str::<parley_core::config::ParleyConfig>("[retention")
            .context("failed to parse parley.toml")
            .expect_err("must fail");
        assert_eq!(classify(&err), ErrorCode::ConfigParseError);
    }

    #[test]
    fn unrecognized_errors_are_internal() {
        assert_eq!(
            classify(&anyhow::anyhow!("something odd")),
            ErrorCode::InternalUnexpected
        );
    }

    #[test]
    fn report_json_omits_missing_hint() {
        let report = ErrorReport {
            code: "E9001",
            kind: "Internal unexpected error",
            message: "boom".to_string(),
            hint: None,
        };
        let json = serde_json::to_string(&report).expect("serialize");
        assert_eq!(json, r#"{"code":"E9001","kind":"Internal unexpected error","message":"boom"}"#);
    }
}
