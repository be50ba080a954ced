#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text encoding and decoding of hotline records.
//!
//! Records are written one JSON object per line, serialized by
//! `serde_json`, so that appending a record never invalidates the file.
//!
//! Decoding is lenient and never fails. It accepts:
//! - the line layout written by [`encode`]
//! - the older single-container layouts (`[{...},{...}]` and
//!   `{"users": [...]}`), whether or not they are valid JSON
//! - appended `{...},` fragments
//!
//! The older layouts go through the hand-written reader in [`legacy`],
//! which degrades malformed fields to empty strings instead of dropping the
//! record.

pub mod legacy;

use hotline_account_models::UserAccount;
use hotline_incident_models::IncidentRecord;
use serde::Serialize;
use serde::de::{Deserialize as _, DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::legacy::Quoting;

/// Errors that can occur while encoding records.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The record did not serialize to a key/value object.
    #[error("Record of type {type_name} does not encode to an object")]
    NotAnObject {
        /// Rust type name of the offending record.
        type_name: &'static str,
    },
}

/// A record kind that can be stored in a flat file.
///
/// Every field should be a string with `#[serde(default)]` on the type, so
/// that keys missing from stored text decode to empty strings.
pub trait Record: Serialize + DeserializeOwned + Default {
    /// Key of the top-level array in the single-container layout
    /// (`{"users": [...]}`).
    const CONTAINER_KEY: &'static str;

    /// How values were quoted by the writer of the older layouts.
    const LEGACY_QUOTING: Quoting;
}

impl Record for IncidentRecord {
    const CONTAINER_KEY: &'static str = "records";
    const LEGACY_QUOTING: Quoting = Quoting::Escaped;
}

impl Record for UserAccount {
    const CONTAINER_KEY: &'static str = "users";
    const LEGACY_QUOTING: Quoting = Quoting::Raw;
}

/// Overall shape of a store file's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Nothing but whitespace.
    Empty,
    /// One object per line.
    Lines,
    /// A single container, pretty-printed blocks, or appended fragments.
    Legacy,
}

/// Detects the layout of `text`.
///
/// Any line holding a complete JSON object means [`Layout::Lines`], so a
/// torn or malformed line anywhere in the file does not change the
/// layout. Anything else that is not blank is [`Layout::Legacy`].
#[must_use]
pub fn detect_layout(text: &str) -> Layout {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .peekable();

    if lines.peek().is_none() {
        Layout::Empty
    } else if lines.any(is_object_line) {
        Layout::Lines
    } else {
        Layout::Legacy
    }
}

fn is_object_line(line: &str) -> bool {
    line.starts_with('{')
        && line.ends_with('}')
        && matches!(serde_json::from_str::<Value>(line), Ok(Value::Object(_)))
}

/// Encodes a record as a single line of JSON (no trailing newline).
///
/// Backslashes, quotes, newlines and carriage returns inside values are
/// escaped, so the output never spans lines.
///
/// # Errors
///
/// Returns [`CodecError`] if the record cannot be serialized.
pub fn encode<R: Record>(record: &R) -> Result<String, CodecError> {
    Ok(serde_json::to_string(record)?)
}

/// Encodes records in the line layout, each line terminated by `\n`.
///
/// # Errors
///
/// Returns [`CodecError`] if any record cannot be serialized.
pub fn encode_lines<R: Record>(records: &[R]) -> Result<String, CodecError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&encode(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Decodes every record found in `text`, in file order.
///
/// Never fails: malformed fields decode to empty strings, blocks without
/// any readable field are skipped, and text with no recognizable record
/// yields an empty collection.
#[must_use]
pub fn decode<R: Record>(text: &str) -> Vec<R> {
    match detect_layout(text) {
        Layout::Empty => Vec::new(),
        Layout::Lines => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .flat_map(decode_line)
            .collect(),
        Layout::Legacy => decode_legacy(text),
    }
}

/// Decodes one line of the line layout.
///
/// Usually yields exactly one record. A line holding a whole container
/// yields all of its records; a line with nothing readable yields none.
#[must_use]
pub fn decode_line<R: Record>(line: &str) -> Vec<R> {
    match serde_json::from_str::<Value>(line) {
        Ok(value)
            if R::LEGACY_QUOTING == Quoting::Raw && is_container(&value, R::CONTAINER_KEY) =>
        {
            decode_legacy(line)
        }
        Ok(value) => records_from_value(value),
        Err(e) => {
            log::warn!("Falling back to lenient decoding for malformed line: {e}");
            record_from_fields(legacy::decode_block(line, Quoting::Escaped))
                .into_iter()
                .collect()
        }
    }
}

fn is_container(value: &Value, container_key: &str) -> bool {
    value
        .as_object()
        .and_then(|map| map.get(container_key))
        .is_some_and(Value::is_array)
}

fn decode_legacy<R: Record>(text: &str) -> Vec<R> {
    // Files written by the old pretty-printing writer are often valid JSON,
    // but only escaped values can be taken from `serde_json` as-is.
    if R::LEGACY_QUOTING == Quoting::Escaped {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            return records_from_value(value);
        }
    }

    let joined: String = text.lines().map(str::trim).collect();
    let blocks = legacy::decode(&joined, R::CONTAINER_KEY, R::LEGACY_QUOTING);
    if blocks.is_empty() {
        log::warn!("No records found in legacy-layout text");
    }

    blocks.into_iter().filter_map(record_from_fields).collect()
}

fn records_from_value<R: Record>(value: Value) -> Vec<R> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(record_from_object(map)),
                other => {
                    log::warn!("Skipping non-object array element: {other}");
                    None
                }
            })
            .collect(),
        Value::Object(mut map) => match map.remove(R::CONTAINER_KEY) {
            Some(inner @ Value::Array(_)) => records_from_value(inner),
            Some(other) => {
                map.insert(R::CONTAINER_KEY.to_string(), other);
                vec![record_from_object(map)]
            }
            None => vec![record_from_object(map)],
        },
        other => {
            log::warn!("Skipping non-object value: {other}");
            Vec::new()
        }
    }
}

fn record_from_fields<R: Record>(fields: legacy::Fields) -> Option<R> {
    if fields.is_empty() {
        log::warn!("Skipping block with no readable fields");
        return None;
    }

    let map = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    Some(record_from_object(map))
}

/// Builds a record from decoded key/value pairs.
///
/// Unknown keys are ignored. Values that are not strings are coerced to
/// their text form before giving up and returning an empty record.
fn record_from_object<R: Record>(map: Map<String, Value>) -> R {
    let value = Value::Object(map);
    match R::deserialize(&value) {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Coercing record fields to text after decode error: {e}");
            let Value::Object(map) = value else {
                return R::default();
            };
            let coerced = map
                .into_iter()
                .map(|(key, value)| (key, Value::String(value_to_text(value))))
                .collect();

            R::deserialize(&Value::Object(coerced)).unwrap_or_else(|e| {
                log::warn!("Discarding undecodable record: {e}");
                R::default()
            })
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(kind: &str, location: &str, status: &str) -> IncidentRecord {
        IncidentRecord::new(kind, location, "desc", "Juan Dela Cruz", "09123456789")
            .with_status(status)
            .with_created_at("January 05, 2025 10:30 AM")
    }

    #[test]
    fn roundtrips_values_with_escapable_characters() {
        let mut record = incident("Fire", "Agdum", "Pending");
        record.description = "He said \"help\"\nthen C:\\temp\\x\r\nend".to_string();
        record.reporter_name = "O\"Neil \\ Jr.".to_string();

        let line = encode(&record).unwrap();
        assert!(!line.contains('\n'));

        let decoded: Vec<IncidentRecord> = decode(&line);
        assert_eq!(decoded, vec![record]);
    }

    #[test]
    fn decodes_multiple_lines_in_order() {
        let records = vec![
            incident("Fire", "Agdum", "Pending"),
            incident("Flood", "Awang", "Responding"),
        ];
        let text = encode_lines(&records).unwrap();

        assert_eq!(detect_layout(&text), Layout::Lines);
        assert_eq!(decode::<IncidentRecord>(&text), records);
    }

    #[test]
    fn empty_text_decodes_to_nothing() {
        assert_eq!(detect_layout("  \n\n "), Layout::Empty);
        assert!(decode::<IncidentRecord>("").is_empty());
        assert!(decode::<IncidentRecord>("\n  \n").is_empty());
    }

    #[test]
    fn field_missing_colon_defaults_to_empty() {
        let text = concat!(
            "{\"type\": \"Fire\", \"location\" \"Downtown\", \"status\": \"Pending\"}\n",
            "{\"type\": \"Flood\", \"location\": \"Awang\", \"status\": \"Resolved\"}\n",
        );

        let decoded: Vec<IncidentRecord> = decode(text);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].incident_type, "Fire");
        assert_eq!(decoded[0].location, "");
        assert_eq!(decoded[0].status, "Pending");
        assert_eq!(decoded[1].location, "Awang");
    }

    #[test]
    fn unknown_keys_are_ignored_and_missing_keys_empty() {
        let decoded: Vec<IncidentRecord> =
            decode(r#"{"type":"Crime","severity":"high","location":"Bacauan"}"#);

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].incident_type, "Crime");
        assert_eq!(decoded[0].location, "Bacauan");
        assert_eq!(decoded[0].description, "");
        assert_eq!(decoded[0].created_at, "");
    }

    #[test]
    fn non_string_values_are_coerced() {
        let decoded: Vec<IncidentRecord> = decode(r#"{"type":"Fire","contact":9123456789}"#);
        assert_eq!(decoded[0].reporter_contact, "9123456789");
        assert_eq!(decoded[0].incident_type, "Fire");
    }

    #[test]
    fn decodes_appended_legacy_fragments() {
        let text = "{\n  \"type\": \"Fire\",\n  \"location\": \"Agdum\",\n  \"description\": \"Line one\\nLine two\",\n  \"status\": \"Pending\"\n},\n{\n  \"type\": \"Accident\",\n  \"location\": \"Awang\",\n  \"status\": \"Resolved\"\n},\n";

        assert_eq!(detect_layout(text), Layout::Legacy);
        let decoded: Vec<IncidentRecord> = decode(text);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].description, "Line one\nLine two");
        assert_eq!(decoded[1].incident_type, "Accident");
        assert_eq!(decoded[1].status, "Resolved");
    }

    #[test]
    fn decodes_legacy_user_container() {
        let text = "{\n  \"users\": [\n    {\n      \"username\": \"juan\",\n      \"password\": \"pw\",\n      \"firstName\": \"Juan\",\n      \"lastName\": \"Dela Cruz\"\n    },\n    {\n      \"username\": \"ana\",\n      \"password\": \"pw2\",\n      \"firstName\": \"Ana\",\n      \"lastName\": \"Reyes\"\n    }\n  ]\n}";

        let users: Vec<UserAccount> = decode(text);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "juan");
        assert_eq!(users[1].last_name, "Reyes");
        assert!(users[1].has_legacy_password());
    }

    #[test]
    fn legacy_user_values_are_read_verbatim() {
        let text = "{\n  \"users\": [\n    {\n      \"username\": \"juan\",\n      \"password\": \"pa\\tss\",\n      \"firstName\": \"Juan\",\n      \"lastName\": \"C:\\\"\n    }\n  ]\n}";

        let users: Vec<UserAccount> = decode(text);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].password, r"pa\tss");
        assert_eq!(users[0].last_name, "C:\\");
        assert_eq!(users[0].first_name, "Juan");
    }

    #[test]
    fn torn_first_line_keeps_line_layout() {
        let records = vec![
            incident("Flood", "Awang", "Pending"),
            incident("Crime", "Bacauan", "Resolved"),
        ];
        let text = format!("{{\"type\":\"Fi\n{}", encode_lines(&records).unwrap());

        assert_eq!(detect_layout(&text), Layout::Lines);
        let decoded: Vec<IncidentRecord> = decode(&text);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].incident_type, "Fi");
        assert_eq!(decoded[1..], records[..]);
    }

    #[test]
    fn decodes_compact_container_on_one_line() {
        let users: Vec<UserAccount> =
            decode(r#"{"users":[{"username":"a"},{"username":"b"}]}"#);
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "b");
    }

    #[test]
    fn unrecognizable_text_decodes_to_nothing() {
        assert!(decode::<IncidentRecord>("this is not a record file").is_empty());
        assert!(decode::<UserAccount>("[ ]").is_empty());
    }

    #[test]
    fn legacy_encoding_reads_back() {
        let mut record = incident("Medical", "Bacolod", "Responding");
        record.description = "Quote \" slash \\ break\nend".to_string();

        let block = legacy::encode(&record).unwrap();
        let decoded: Vec<IncidentRecord> = decode(&format!("{block},\n"));
        assert_eq!(decoded, vec![record]);
    }
}
