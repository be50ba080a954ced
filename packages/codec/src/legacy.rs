//! Reader and writer for the older brace-delimited record grammar.
//!
//! Each record is a `{ ... }` block of `"key": "value"` pairs separated by
//! commas. Blocks appear either as comma-appended fragments, inside a bare
//! `[ ... ]` array, or inside a named container such as
//! `{"users": [ ... ]}`.
//!
//! Incident files escaped backslash, double quote, newline and carriage
//! return inside values. Account files wrote values verbatim. See
//! [`Quoting`].
//!
//! The reader is deliberately forgiving. Block and field boundaries are
//! found with a quote-aware scanner, a field without a colon is skipped,
//! and a block cut off by a torn write still yields the fields it has.

use serde_json::{Map, Value};

use crate::{CodecError, Record};

/// Key/value pairs decoded from one block, in text order.
pub type Fields = Vec<(String, String)>;

/// How values were written between their quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Special characters escaped with a backslash, as in JSON.
    Escaped,
    /// Written verbatim. A backslash is an ordinary character and the
    /// first closing quote ends the value.
    Raw,
}

/// Escapes a value for placement between double quotes.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape`].
///
/// Also understands the remaining JSON escapes (`\t`, `\/`, `\b`, `\f`,
/// `\uXXXX`). Unknown escapes are kept verbatim.
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32);
                out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Renders one record as a pretty-printed block, quoted the way
/// [`Record::LEGACY_QUOTING`] says:
///
/// ```text
/// {
///   "type": "Fire",
///   "location": "Agdum"
/// }
/// ```
///
/// # Errors
///
/// Returns [`CodecError`] if the record cannot be serialized or is not an
/// object.
pub fn encode<R: Record>(record: &R) -> Result<String, CodecError> {
    let map = to_object(record)?;
    Ok(render_block(&map, "", R::LEGACY_QUOTING))
}

/// Renders records inside a named container:
///
/// ```text
/// {
///   "users": [
///     { ... },
///     { ... }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns [`CodecError`] if any record cannot be serialized or is not an
/// object.
pub fn encode_container<R: Record>(records: &[R]) -> Result<String, CodecError> {
    let blocks = records
        .iter()
        .map(|record| Ok(render_block(&to_object(record)?, "    ", R::LEGACY_QUOTING)))
        .collect::<Result<Vec<_>, CodecError>>()?;

    let mut out = format!("{{\n  \"{}\": [\n", R::CONTAINER_KEY);
    if !blocks.is_empty() {
        out.push_str(&blocks.join(",\n"));
        out.push('\n');
    }
    out.push_str("  ]\n}");
    Ok(out)
}

fn to_object<R: Record>(record: &R) -> Result<Map<String, Value>, CodecError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(CodecError::NotAnObject {
            type_name: std::any::type_name::<R>(),
        }),
    }
}

fn render_block(map: &Map<String, Value>, indent: &str, quoting: Quoting) -> String {
    let quote = |text: &str| match quoting {
        Quoting::Escaped => escape(text),
        Quoting::Raw => text.to_string(),
    };

    let fields: Vec<String> = map
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => quote(s),
                Value::Null => String::new(),
                other => quote(&other.to_string()),
            };
            format!("{indent}  \"{}\": \"{text}\"", quote(key))
        })
        .collect();

    format!("{indent}{{\n{}\n{indent}}}", fields.join(",\n"))
}

/// Decodes every block in `text`.
///
/// If `text` holds a `"container_key": [ ... ]` container, only the array
/// body is read. Text outside of `{ ... }` blocks (brackets, separating
/// commas, whitespace) is ignored, so text without any block decodes to an
/// empty collection.
#[must_use]
pub fn decode(text: &str, container_key: &str, quoting: Quoting) -> Vec<Fields> {
    let body = container_body(text, container_key).unwrap_or(text);
    split_blocks(body, quoting)
        .into_iter()
        .map(|block| decode_block(block, quoting))
        .collect()
}

/// Decodes the fields of one `{ ... }` block.
///
/// The outer braces are optional. Fields without a colon are skipped.
#[must_use]
pub fn decode_block(block: &str, quoting: Quoting) -> Fields {
    let inner = block.trim();
    let inner = inner.strip_prefix('{').unwrap_or(inner);
    let inner = inner.strip_suffix('}').unwrap_or(inner);

    split_outside_quotes(inner, ',', quoting)
        .into_iter()
        .filter(|field| !field.trim().is_empty())
        .filter_map(|field| {
            let parsed = parse_field(field, quoting);
            if parsed.is_none() {
                log::warn!("Skipping malformed field: {}", field.trim());
            }
            parsed
        })
        .collect()
}

/// Finds the array body following `"container_key"`.
fn container_body<'a>(text: &'a str, container_key: &str) -> Option<&'a str> {
    let marker = format!("\"{container_key}\"");
    let after_key = text.find(&marker)? + marker.len();
    let open = after_key + text[after_key..].find('[')? + 1;
    let close = text.rfind(']').filter(|&close| close >= open)?;
    Some(&text[open..close])
}

/// Splits text into top-level `{ ... }` blocks, ignoring braces inside
/// quoted strings. A block left open at the end of the text is returned
/// as-is.
fn split_blocks(body: &str, quoting: Quoting) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut strings = StringTracker::new(quoting);

    for (i, c) in body.char_indices() {
        if strings.inside(c) {
            continue;
        }

        match c {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        blocks.push(&body[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        log::warn!("Reading unterminated trailing block");
        blocks.push(&body[s..]);
    }

    blocks
}

/// Splits on `separator` wherever it is not inside a quoted string.
fn split_outside_quotes(text: &str, separator: char, quoting: Quoting) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut strings = StringTracker::new(quoting);

    for (i, c) in text.char_indices() {
        if strings.inside(c) {
            continue;
        }

        if c == separator {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }

    parts.push(&text[start..]);
    parts
}

/// Tracks whether a character scan is inside a quoted string.
struct StringTracker {
    quoting: Quoting,
    in_string: bool,
    escaped: bool,
}

impl StringTracker {
    const fn new(quoting: Quoting) -> Self {
        Self {
            quoting,
            in_string: false,
            escaped: false,
        }
    }

    /// Feeds `c` and returns whether it belongs to a quoted string,
    /// including the quotes themselves.
    fn inside(&mut self, c: char) -> bool {
        if !self.in_string {
            self.in_string = c == '"';
            return self.in_string;
        }

        if self.escaped {
            self.escaped = false;
        } else if c == '\\' && self.quoting == Quoting::Escaped {
            self.escaped = true;
        } else if c == '"' {
            self.in_string = false;
        }
        true
    }
}

/// Parses `"key": "value"`, splitting at the first colon outside quotes.
fn parse_field(field: &str, quoting: Quoting) -> Option<(String, String)> {
    let mut halves = split_outside_quotes(field, ':', quoting).into_iter();
    let key = halves.next()?;
    let value_start = key.len() + 1;
    if value_start > field.len() {
        return None;
    }

    let key = unquote(key.trim(), quoting);
    if key.is_empty() {
        return None;
    }

    Some((key, unquote(field[value_start..].trim(), quoting)))
}

/// Strips the surrounding quotes (either may be missing after a torn write)
/// and, for [`Quoting::Escaped`], unescapes what is left.
fn unquote(text: &str, quoting: Quoting) -> String {
    let inner = text.strip_prefix('"').unwrap_or(text);

    match quoting {
        Quoting::Escaped => {
            let inner = match inner.strip_suffix('"') {
                // A closing quote preceded by an odd run of backslashes is escaped.
                Some(body)
                    if body.chars().rev().take_while(|&c| c == '\\').count() % 2 == 0 =>
                {
                    body
                }
                _ => inner,
            };
            unescape(inner)
        }
        Quoting::Raw => inner.strip_suffix('"').unwrap_or(inner).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn escape_and_unescape_are_inverse() {
        let raw = "a \"quoted\" \\ path\nnext\rline";
        let escaped = escape(raw);
        assert_eq!(escaped, "a \\\"quoted\\\" \\\\ path\\nnext\\rline");
        assert_eq!(unescape(&escaped), raw);
    }

    #[test]
    fn unescapes_unicode_and_unknown_escapes() {
        assert_eq!(unescape("\\u0041\\u00e9"), "Aé");
        assert_eq!(unescape("\\q"), "\\q");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn splits_blocks_in_a_bare_array() {
        let blocks = decode(
            r#"[{"type":"Fire"},{"type":"Flood"}]"#,
            "records",
            Quoting::Escaped,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(field(&blocks[1], "type"), Some("Flood"));
    }

    #[test]
    fn value_containing_block_boundary_is_not_split() {
        let blocks = decode(
            r#"{"type":"Fire","description":"see },{ here"},{"type":"Crime"}"#,
            "records",
            Quoting::Escaped,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(field(&blocks[0], "description"), Some("see },{ here"));
    }

    #[test]
    fn commas_and_colons_inside_values_survive() {
        let fields = decode_block(
            r#"{"location":"Agdum, Sitio 2","date":"March 04, 2025 09:15 PM"}"#,
            Quoting::Escaped,
        );
        assert_eq!(field(&fields, "location"), Some("Agdum, Sitio 2"));
        assert_eq!(field(&fields, "date"), Some("March 04, 2025 09:15 PM"));
    }

    #[test]
    fn escaped_quotes_do_not_end_a_value() {
        let fields = decode_block(
            r#"{"description":"he said \"go, now\"","status":"Pending"}"#,
            Quoting::Escaped,
        );
        assert_eq!(field(&fields, "description"), Some("he said \"go, now\""));
        assert_eq!(field(&fields, "status"), Some("Pending"));
    }

    #[test]
    fn value_ending_in_backslash_roundtrips() {
        let raw = "C:\\temp\\";
        let fields = decode_block(
            &format!("{{\"location\": \"{}\"}}", escape(raw)),
            Quoting::Escaped,
        );
        assert_eq!(field(&fields, "location"), Some(raw));
    }

    #[test]
    fn raw_values_keep_backslashes() {
        let fields = decode_block(
            r#"{"username": "juan", "password": "pa\tss", "lastName": "C:\"}"#,
            Quoting::Raw,
        );
        assert_eq!(field(&fields, "password"), Some(r"pa\tss"));
        assert_eq!(field(&fields, "lastName"), Some("C:\\"));
        assert_eq!(field(&fields, "username"), Some("juan"));
    }

    #[test]
    fn skips_field_without_colon() {
        let fields = decode_block(
            r#"{"type":"Fire","location" "Downtown","status":"Pending"}"#,
            Quoting::Escaped,
        );
        assert_eq!(fields.len(), 2);
        assert_eq!(field(&fields, "location"), None);
    }

    #[test]
    fn reads_torn_trailing_block() {
        let blocks = decode(
            "{\"type\":\"Fire\"},{\"type\":\"Flood\",\"location\":\"Aw",
            "records",
            Quoting::Escaped,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(field(&blocks[1], "type"), Some("Flood"));
        assert_eq!(field(&blocks[1], "location"), Some("Aw"));
    }

    #[test]
    fn reads_named_container_only() {
        let blocks = decode(
            r#"{"users":[{"username":"juan"},{"username":"ana"}]}"#,
            "users",
            Quoting::Raw,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(field(&blocks[0], "username"), Some("juan"));
    }

    #[test]
    fn text_without_blocks_is_empty() {
        assert!(decode("garbage", "records", Quoting::Escaped).is_empty());
        assert!(decode("[]", "records", Quoting::Escaped).is_empty());
    }

    #[test]
    fn encodes_pretty_container_verbatim_for_accounts() {
        let users = vec![hotline_account_models::UserAccount {
            username: "juan".to_string(),
            first_name: "Juan".to_string(),
            password: r"pa\tss".to_string(),
            ..Default::default()
        }];

        let text = encode_container(&users).unwrap();
        assert!(text.starts_with("{\n  \"users\": [\n    {\n"));
        assert!(text.contains("      \"username\": \"juan\""));
        assert!(text.contains(r#""password": "pa\tss""#));
        assert!(text.ends_with("    }\n  ]\n}"));

        let decoded = decode(&text, "users", Quoting::Raw);
        assert_eq!(field(&decoded[0], "firstName"), Some("Juan"));
        assert_eq!(field(&decoded[0], "password"), Some(r"pa\tss"));
    }

    #[test]
    fn encodes_empty_container() {
        let text = encode_container::<hotline_account_models::UserAccount>(&[]).unwrap();
        assert_eq!(text, "{\n  \"users\": [\n  ]\n}");
    }
}
