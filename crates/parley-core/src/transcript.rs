//! Comma-separated transcript reader.
//!
//! Turns a dialogue transcript (one row per line of dialogue) into the
//! ordered [`Turn`] sequence the inferer consumes.
//!
//! # Format
//!
//! ```text
//! title,writer,pony,dialog
//! Friendship is Magic part 1,Lauren Faust,Narrator,"Once upon a time, ..."
//! ```
//!
//! - Fields are separated by `,`; a field wrapped in `"` may contain commas,
//!   newlines, and doubled quotes (`""` → `"`).
//! - A `"` opens a quoted field only as the first character of the field.
//!   Anywhere else it is literal text, so `big "mac" jr` reads as written.
//! - `\r\n` and `\n` both end a record.
//! - Blank and whitespace-only rows are skipped.
//! - Only the episode and character columns are read; the rest are ignored.
//!
//! Line numbers in errors are 1-based physical lines where the record starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::turn::Turn;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which columns hold the episode id and the speaking character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLayout {
    /// Zero-based column of the episode id.
    #[serde(default = "default_episode_column")]
    pub episode_column: usize,
    /// Zero-based column of the character name.
    #[serde(default = "default_character_column")]
    pub character_column: usize,
    /// Skip the first record.
    #[serde(default = "default_true")]
    pub has_header: bool,
}

impl Default for TranscriptLayout {
    fn default() -> Self {
        Self {
            episode_column: default_episode_column(),
            character_column: default_character_column(),
            has_header: default_true(),
        }
    }
}

const fn default_episode_column() -> usize {
    0
}

const fn default_character_column() -> usize {
    2
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while reading a transcript.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// A row is too short to contain a required column.
    #[error("line {line}: row has {found} field(s), column {column} is missing")]
    MissingColumn {
        line: usize,
        column: usize,
        found: usize,
    },

    /// A required column is blank.
    #[error("line {line}: column {column} is empty")]
    EmptyField { line: usize, column: usize },

    /// End of input inside a quoted field.
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    /// The file could not be read.
    #[error("failed to read transcript {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One parsed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Physical line on which the record starts.
    pub line: usize,
    /// Unquoted field values.
    pub fields: Vec<String>,
}

impl Record {
    fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// Split `input` into records.
///
/// # Errors
///
/// Returns [`TranscriptError::UnterminatedQuote`] if a quoted field never closes.
pub fn parse_records(input: &str) -> Result<Vec<Record>, TranscriptError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut record_line = 1usize;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(TranscriptError::UnterminatedQuote { line: record_line });
    }

    if !fields.is_empty() || !field.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let record = Record { line, fields };
    if !record.is_blank() {
        records.push(record);
    }
}

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

/// Parse transcript text into an ordered turn sequence.
///
/// # Errors
///
/// Returns an error if the text is malformed or a row lacks a usable
/// episode or character column.
#[instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_turns(input: &str, layout: &TranscriptLayout) -> Result<Vec<Turn>, TranscriptError> {
    let records = parse_records(input)?;
    let skip = usize::from(layout.has_header);

    let turns = records
        .iter()
        .skip(skip)
        .map(|record| record_to_turn(record, layout))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(records = records.len(), turns = turns.len(), "parsed transcript");
    Ok(turns)
}

/// Read and parse a transcript file.
///
/// # Errors
///
/// Returns [`TranscriptError::Io`] if the file cannot be read, or any
/// [`parse_turns`] error.
pub fn read_turns(path: &Path, layout: &TranscriptLayout) -> Result<Vec<Turn>, TranscriptError> {
    let input = std::fs::read_to_string(path).map_err(|source| TranscriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_turns(&input, layout)
}

fn record_to_turn(record: &Record, layout: &TranscriptLayout) -> Result<Turn, TranscriptError> {
    let episode = required_field(record, layout.episode_column)?;
    let character = required_field(record, layout.character_column)?;
    Ok(Turn::new(episode, character))
}

fn required_field(record: &Record, column: usize) -> Result<&str, TranscriptError> {
    let value = record
        .fields
        .get(column)
        .ok_or(TranscriptError::MissingColumn {
            line: record.line,
            column,
            found: record.fields.len(),
        })?;

    if value.trim().is_empty() {
        return Err(TranscriptError::EmptyField {
            line: record.line,
            column,
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
