//! Properties-file parsing.
//!
//! Follows `java.util.Properties` line syntax so existing `users.properties`
//! and `roles.properties` files load unchanged:
//!
//! - natural lines end in `\n`, `\r` or `\r\n`;
//! - leading whitespace (space, tab, form feed) is skipped;
//! - lines whose first non-blank character is `#` or `!` are comments;
//! - a line ending in an odd number of backslashes continues on the next
//!   line, whose leading whitespace is dropped;
//! - the key ends at the first unescaped `=`, `:` or whitespace; whitespace
//!   around the separator is skipped, trailing whitespace of the value is kept;
//! - escapes: `\t`, `\n`, `\r`, `\f`, `\uXXXX`, and `\c` for any other `c`.
//!
//! A users file may carry a `#$REALM_NAME=<name>$` comment declaring the
//! realm its digests were computed for.

use idr_core::PropertiesEncoding;
use thiserror::Error;

const REALM_NAME_MARKER: &str = "$REALM_NAME=";

/// Error raised while decoding or parsing properties content.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {detail}")]
pub struct PropertiesError {
    /// 1-based line number.
    pub line: usize,
    /// Description of the problem.
    pub detail: String,
}

/// A key/value entry with the line its logical line starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Unescaped key.
    pub key: String,
    /// Unescaped value. Empty when the line carried a key only.
    pub value: String,
    /// Whether the line had a `=`, `:` or whitespace separator after the key.
    pub has_separator: bool,
    /// 1-based line number.
    pub line: usize,
}

/// Parsed properties content.
///
/// Entries are kept in source order, duplicates included, so callers can
/// report line numbers; [`Properties::get`] applies last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<PropertyEntry>,
    realm_name: Option<String>,
}

impl Properties {
    /// Parses properties text.
    ///
    /// ## Errors
    ///
    /// Returns an error for malformed `\uXXXX` escapes.
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        let lines = natural_lines(text);
        let mut props = Self::default();
        let mut i = 0;

        while i < lines.len() {
            let (line_no, raw) = lines[i];
            i += 1;

            let trimmed = trim_leading(raw);
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with('!') {
                if props.realm_name.is_none() {
                    props.realm_name = realm_name_comment(trimmed);
                }
                continue;
            }

            let mut logical = String::new();
            let mut current = trimmed;
            loop {
                if !ends_with_continuation(current) {
                    logical.push_str(current);
                    break;
                }
                logical.push_str(&current[..current.len() - 1]);
                let Some(&(_, next)) = lines.get(i) else {
                    break;
                };
                i += 1;
                current = trim_leading(next);
            }

            let (key, value, has_separator) = split_key_value(&logical);
            props.entries.push(PropertyEntry {
                key: unescape(key, line_no)?,
                value: unescape(value, line_no)?,
                has_separator,
                line: line_no,
            });
        }

        Ok(props)
    }

    /// Decodes raw bytes and parses them.
    ///
    /// ## Errors
    ///
    /// Returns an error for bytes that are not valid in the chosen encoding,
    /// or for malformed escapes.
    pub fn from_bytes(bytes: &[u8], encoding: PropertiesEncoding) -> Result<Self, PropertiesError> {
        let text = decode(bytes, encoding)?;
        Self::parse(&text)
    }

    /// Returns all entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[PropertyEntry] {
        &self.entries
    }

    /// Returns the value of the last entry with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Returns the realm name declared by a `#$REALM_NAME=<name>$` comment.
    #[must_use]
    pub fn declared_realm_name(&self) -> Option<&str> {
        self.realm_name.as_deref()
    }

    /// Returns the number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes resource bytes. A leading UTF-8 byte order mark is dropped.
fn decode(bytes: &[u8], encoding: PropertiesEncoding) -> Result<String, PropertiesError> {
    match encoding {
        PropertiesEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        PropertiesEncoding::Utf8 => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| {
                    let valid = &bytes[..e.valid_up_to()];
                    PropertiesError {
                        line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
                        detail: "invalid UTF-8 sequence".to_string(),
                    }
                })
        }
    }
}

fn natural_lines(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' => {
                lines.push((lines.len() + 1, &text[start..pos]));
                pos += 1;
                start = pos;
            }
            b'\r' => {
                lines.push((lines.len() + 1, &text[start..pos]));
                pos += 1;
                if bytes.get(pos) == Some(&b'\n') {
                    pos += 1;
                }
                start = pos;
            }
            _ => pos += 1,
        }
    }
    if start < bytes.len() {
        lines.push((lines.len() + 1, &text[start..]));
    }
    lines
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn trim_leading(s: &str) -> &str {
    s.trim_start_matches(is_blank)
}

fn ends_with_continuation(s: &str) -> bool {
    s.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn realm_name_comment(comment: &str) -> Option<String> {
    let rest = trim_leading(&comment[1..]);
    let rest = rest.strip_prefix(REALM_NAME_MARKER)?;
    let end = rest.find('$')?;
    let name = &rest[..end];
    (!name.is_empty()).then(|| name.to_string())
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_key_value(line: &str) -> (&str, &str, bool) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut separated = false;
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == '=' || c == ':' {
            separated = true;
            key_end = idx;
            value_start = idx + 1;
            break;
        }
        if is_blank(c) {
            separated = true;
            key_end = idx;
            let rest = trim_leading(&line[idx..]);
            value_start = line.len() - rest.len();
            if rest.starts_with('=') || rest.starts_with(':') {
                value_start += 1;
            }
            break;
        }
    }

    let value = trim_leading(&line[value_start.min(line.len())..]);
    (&line[..key_end], value, separated)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| PropertiesError {
                        line,
                        detail: format!("malformed \\uxxxx escape: \\u{hex}"),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}
