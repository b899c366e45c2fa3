//! `.properties` text codec.
//!
//! Output follows what `java.util.Properties::store` writes, so the consuming
//! framework can load the file as-is: one `key=value` line per entry, control
//! characters escaped, and everything outside printable ASCII written as
//! `\uXXXX` UTF-16 units. The loader understands the full format, including
//! comments, continuation lines and the three key terminators.

use std::collections::BTreeMap;

use anyhow::{Result, bail};

/// Key/value store persisted as a properties file.
///
/// Ordered so the written file is stable between runs.
pub type PropertyStore = BTreeMap<String, String>;

/// Comment written as the first line of every generated file.
pub const HEADER_COMMENT: &str = "generated by namedsql";

const WHITESPACE: &[char] = &[' ', '\t', '\x0c'];

/// Encode a store. `load(&store(m)) == m` for every store.
pub fn store(properties: &PropertyStore) -> String {
    let mut out = String::new();
    out.push('#');
    out.push_str(HEADER_COMMENT);
    out.push('\n');

    for (key, value) in properties {
        escape_into(key, true, &mut out);
        out.push('=');
        escape_into(value, false, &mut out);
        out.push('\n');
    }
    out
}

/// Decode properties text.
pub fn load(content: &str) -> Result<PropertyStore> {
    let mut properties = PropertyStore::new();
    for (line_no, line) in logical_lines(content) {
        let (raw_key, raw_value) = split_key_value(&line);
        let key = unescape(raw_key, line_no)?;
        let value = unescape(raw_value, line_no)?;
        properties.insert(key, value);
    }
    Ok(properties)
}

fn escape_into(text: &str, escape_all_spaces: bool, out: &mut String) {
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' if i == 0 || escape_all_spaces => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
}

/// Split on `\n`, `\r\n` or a lone `\r`.
fn natural_lines(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&content[start..]);
    }
    lines
}

/// Join continuation lines and drop blanks and comments.
///
/// Returns each logical line with the 1-based number of its first natural line.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut logical = Vec::new();
    let mut lines = natural_lines(content).into_iter().enumerate();

    while let Some((index, line)) = lines.next() {
        let trimmed = line.trim_start_matches(WHITESPACE);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut current = trimmed.to_string();
        while ends_with_continuation(&current) {
            current.pop();
            match lines.next() {
                Some((_, next)) => current.push_str(next.trim_start_matches(WHITESPACE)),
                None => break,
            }
        }
        logical.push((index + 1, current));
    }
    logical
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if !escaped && (c == '=' || c == ':') {
            key_end = i;
            value_start = i + 1;
            has_separator = true;
            break;
        }
        if !escaped && WHITESPACE.contains(&c) {
            key_end = i;
            value_start = i + c.len_utf8();
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    let mut value = line[value_start..].trim_start_matches(WHITESPACE);
    if !has_separator && (value.starts_with('=') || value.starts_with(':')) {
        value = value[1..].trim_start_matches(WHITESPACE);
    }
    (&line[..key_end], value)
}

fn unescape(raw: &str, line_no: usize) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut buf = [0u16; 2];

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let decoded = match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.chars().count() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    bail!("line {}: malformed \\uxxxx encoding", line_no);
                }
                units.push(u16::from_str_radix(&hex, 16)?);
                continue;
            }
            Some('t') => '\t',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\x0c',
            Some(other) => other,
            None => break,
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }
    Ok(String::from_utf16_lossy(&units))
}
