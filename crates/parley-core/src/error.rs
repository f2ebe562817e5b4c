use std::fmt;

use crate::network::NetworkError;
use crate::transcript::TranscriptError;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputNotFound,
    TranscriptMalformed,
    TranscriptColumnMissing,
    NetworkMalformed,
    NetworkInvariantViolated,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InputNotFound => "E1002",
            Self::TranscriptMalformed => "E2001",
            Self::TranscriptColumnMissing => "E2002",
            Self::NetworkMalformed => "E3001",
            Self::NetworkInvariantViolated => "E3002",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputNotFound => "Input file not found",
            Self::TranscriptMalformed => "Malformed transcript",
            Self::TranscriptColumnMissing => "Transcript row lacks a required column",
            Self::NetworkMalformed => "Malformed network document",
            Self::NetworkInvariantViolated => "Network document violates graph invariants",
            Self::OutputWriteFailed => "Output write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in parley.toml and retry."),
            Self::InputNotFound => Some("Check the --input path."),
            Self::TranscriptMalformed => Some("Close every quoted field in the transcript."),
            Self::TranscriptColumnMissing => Some(
                "Set [transcript] episode_column/character_column to match the file, or disable has_header.",
            ),
            Self::NetworkMalformed => {
                Some("Regenerate the network with `parley build` or fix the JSON by hand.")
            }
            Self::NetworkInvariantViolated => {
                Some("Remove self-loops, zero weights, and duplicate keys from the document.")
            }
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<&TranscriptError> for ErrorCode {
    fn from(err: &TranscriptError) -> Self {
        match err {
            TranscriptError::MissingColumn { .. } | TranscriptError::EmptyField { .. } => {
                Self::TranscriptColumnMissing
            }
            TranscriptError::UnterminatedQuote { .. } => Self::TranscriptMalformed,
            TranscriptError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                Self::InputNotFound
            }
            TranscriptError::Io { .. } => Self::InternalUnexpected,
        }
    }
}

impl From<&NetworkError> for ErrorCode {
    fn from(err: &NetworkError) -> Self {
        match err {
            NetworkError::Json(inner) if inner.is_io() => Self::OutputWriteFailed,
            NetworkError::Json(inner) if inner.is_data() => {
                // Invariant violations raised inside the decoder surface as data errors.
                Self::NetworkInvariantViolated
            }
            NetworkError::Json(_) => Self::NetworkMalformed,
            NetworkError::SelfLoop(_)
            | NetworkError::ZeroWeight { .. }
            | NetworkError::DuplicateSource(_)
            | NetworkError::DuplicateEdge { .. } => Self::NetworkInvariantViolated,
        }
    }
}
