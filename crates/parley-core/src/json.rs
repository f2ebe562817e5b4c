//! JSON document helpers shared by the network and stats writers.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Indentation used for every document parley writes.
pub const INDENT: &[u8] = b"    ";

/// Serialize `value` as indented JSON into `writer`, followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn to_writer_indented<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> serde_json::Result<()> {
    {
        let mut ser =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        value.serialize(&mut ser)?;
    }
    writer.write_all(b"\n").map_err(serde_json::Error::io)
}

/// Serialize `value` as indented JSON into a string (trailing newline included).
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON.
pub fn to_string_indented<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    to_writer_indented(&mut buf, value)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
