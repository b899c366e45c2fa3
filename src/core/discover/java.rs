//! Lightweight scan of Java sources for annotated declarations.
//!
//! This is not a Java parser. It masks comments and string literals, then
//! walks annotation groups (`@A @B(...) <declaration>`) and records, for each
//! group, the declaration it is attached to and the string-literal arguments of
//! every annotation. Annotation names are resolved to fully-qualified types
//! through the file's imports, the same way `javac` would for the cases that
//! matter here (explicit import, wildcard import, qualified name, same package).

use std::{
    collections::{BTreeMap, HashMap},
    ops::Range,
    sync::LazyLock,
};

use regex::Regex;

use crate::core::{AnnotationInstance, DeclaredElement, QueryFlavor, SourceLocation};

static PACKAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").unwrap());

static IMPORT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s+(static\s+)?([\w.]+?)(\.\*)?\s*;").unwrap());

static TYPE_DECL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|interface|enum|record)\s+([A-Za-z_$][\w$]*)").unwrap()
});

static ANNOTATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\s*([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)").unwrap());

static NAMED_ARGUMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*([A-Za-z_$][\w$]*)\s*=(.*)$").unwrap());

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap());

/// Declared elements found in one file plus scan warnings.
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub elements: Vec<DeclaredElement>,
    pub warnings: Vec<String>,
}

/// Scan one Java source file.
///
/// `flavors` decides which annotations are "interesting": they win when
/// resolving wildcard imports, give the element its location, and get a
/// warning when a recognized parameter is not a string literal.
pub fn parse_java_source(file_path: &str, source: &str, flavors: &[QueryFlavor]) -> ParsedSource {
    let literals = mask(source, false);
    let code = mask(source, true);

    let package = PACKAGE_REGEX
        .captures(&code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let imports = Imports::collect(&code);
    let types = type_scopes(&code);
    let lines = LineIndex::new(source);

    let mut parsed = ParsedSource::default();
    let mut pos = 0;

    while let Some(start) = ANNOTATION_REGEX.find_at(&code, pos).map(|m| m.start()) {
        let mut annotations: Vec<(usize, AnnotationInstance)> = Vec::new();
        let mut cursor = start;

        while let Some(span) = parse_annotation_at(&code, cursor) {
            let type_name = imports.resolve(&span.name, package.as_deref(), flavors);
            let flavor = flavors
                .iter()
                .find(|f| f.annotation_type() == type_name)
                .copied();

            let mut annotation = AnnotationInstance::new(type_name);
            if let Some(args) = span.args {
                for (name, expr) in split_arguments(&code, &literals, args) {
                    match parse_string_expr(expr) {
                        Some(value) => {
                            annotation.parameters.insert(name, value);
                        }
                        None => {
                            if let Some(flavor) = flavor
                                && flavor.parameter_names().contains(&name.as_str())
                            {
                                let (line, col) = lines.line_col(source, cursor);
                                parsed.warnings.push(format!(
                                    "{}:{}:{}: `{}` of @{} is not a string literal; ignored",
                                    file_path, line, col, name, span.name
                                ));
                            }
                        }
                    }
                }
            }
            annotations.push((cursor, annotation));
            cursor = skip_whitespace(&code, span.end);
        }

        if annotations.is_empty() {
            // `@interface` or an unbalanced argument list
            pos = start + 1;
            continue;
        }

        if let Some(declaration) = parse_declaration(&code, cursor) {
            let name = if declaration.is_type {
                declaration.name
            } else {
                match enclosing_type(&types, start) {
                    Some(owner) => format!("{}.{}", owner, declaration.name),
                    None => declaration.name,
                }
            };

            let anchor = annotations
                .iter()
                .find(|(_, a)| flavors.iter().any(|f| f.annotation_type() == a.type_name))
                .map_or(start, |(offset, _)| *offset);
            let (line, col) = lines.line_col(source, anchor);

            parsed.elements.push(DeclaredElement {
                name,
                location: Some(SourceLocation::new(file_path, line, col)),
                source_line: Some(lines.line_text(source, line).to_string()),
                annotations: annotations.into_iter().map(|(_, a)| a).collect(),
            });
        }

        pos = cursor.max(start + 1);
    }

    parsed
}

// ============================================================
// Masking
// ============================================================

/// Blank comments (and optionally string/char literal contents) with spaces.
///
/// Byte offsets and line breaks are preserved, so positions found in the
/// masked text are valid in the original.
fn mask(source: &str, blank_literals: bool) -> String {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = find_from(bytes, i, b"\n").unwrap_or(len);
                blank(&mut out, i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_from(bytes, i + 2, b"*/").map_or(len, |e| e + 2);
                blank(&mut out, i..end);
                i = end;
            }
            b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                let (content_end, next) = literal_end(bytes, i + 3, b"\"\"\"");
                if blank_literals {
                    blank(&mut out, i + 3..content_end);
                }
                i = next;
            }
            quote @ (b'"' | b'\'') => {
                let (content_end, next) = literal_end(bytes, i + 1, &[quote]);
                if blank_literals {
                    blank(&mut out, i + 1..content_end);
                }
                i = next;
            }
            _ => i += 1,
        }
    }

    // Only ASCII bytes were replaced, with complete multi-byte sequences blanked
    String::from_utf8_lossy(&out).into_owned()
}

fn blank(out: &mut [u8], range: Range<usize>) {
    for b in &mut out[range] {
        if *b != b'\n' && *b != b'\r' {
            *b = b' ';
        }
    }
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i..].starts_with(needle))
}

/// End of a literal starting at `from`: `(content_end, resume_at)`.
///
/// Single-line literals stop at a line break when unterminated.
fn literal_end(bytes: &[u8], from: usize, delimiter: &[u8]) -> (usize, usize) {
    let multiline = delimiter.len() > 1;
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(delimiter) {
            return (i, i + delimiter.len());
        }
        if !multiline && bytes[i] == b'\n' {
            return (i, i);
        }
        i += 1;
    }
    (bytes.len(), bytes.len())
}

// ============================================================
// Structure
// ============================================================

struct AnnotationSpan {
    name: String,
    /// Byte range between the parentheses.
    args: Option<Range<usize>>,
    end: usize,
}

fn parse_annotation_at(code: &str, at: usize) -> Option<AnnotationSpan> {
    let caps = ANNOTATION_REGEX.captures_at(code, at)?;
    let whole = caps.get(0)?;
    if whole.start() != at {
        return None;
    }
    let name: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if name == "interface" {
        return None;
    }

    let after = skip_whitespace(code, whole.end());
    if code[after..].starts_with('(') {
        let close = matching_delimiter(code, after, b'(', b')')?;
        Some(AnnotationSpan {
            name,
            args: Some(after + 1..close),
            end: close + 1,
        })
    } else {
        Some(AnnotationSpan {
            name,
            args: None,
            end: whole.end(),
        })
    }
}

fn skip_whitespace(code: &str, at: usize) -> usize {
    let rest = &code[at..];
    at + rest.len() - rest.trim_start().len()
}

/// Offset of the delimiter closing the one at `open`.
fn matching_delimiter(code: &str, open: usize, opening: u8, closing: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in code.bytes().enumerate().skip(open) {
        if b == opening {
            depth += 1;
        } else if b == closing {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split the argument list at top-level commas into `(name, expression)`.
///
/// Structure comes from `code`; expressions are taken from `literals`, which
/// has the same offsets but keeps string contents. An unnamed argument is
/// `value`, as in Java.
fn split_arguments<'a>(
    code: &str,
    literals: &'a str,
    args: Range<usize>,
) -> Vec<(String, &'a str)> {
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut segment_start = args.start;

    for (i, b) in code.bytes().enumerate().take(args.end).skip(args.start) {
        match b {
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            b',' if depth == 0 => {
                segments.push(segment_start..i);
                segment_start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(segment_start..args.end);

    segments
        .into_iter()
        .map(|range| &literals[range])
        .filter(|text| !text.trim().is_empty())
        .map(|text| match NAMED_ARGUMENT_REGEX.captures(text) {
            Some(caps) => match (caps.get(1), caps.get(2)) {
                (Some(name), Some(expr)) => (name.as_str().to_string(), expr.as_str()),
                _ => ("value".to_string(), text),
            },
            None => ("value".to_string(), text),
        })
        .collect()
}

struct Declaration {
    name: String,
    is_type: bool,
}

/// Name of the declaration starting at `start` (after its annotations).
fn parse_declaration(code: &str, start: usize) -> Option<Declaration> {
    let rest = &code[start..];
    let mut depth = 0usize;
    let mut stop = rest.len();

    for (i, c) in rest.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '(' | '{' | ';' | '=' | ')' | ',' if depth == 0 => {
                stop = i;
                break;
            }
            _ => {}
        }
    }
    let head = &rest[..stop];

    if let Some(name) = TYPE_DECL_REGEX.captures(head).and_then(|c| c.get(1)) {
        return Some(Declaration {
            name: name.as_str().to_string(),
            is_type: true,
        });
    }
    let name = IDENTIFIER_REGEX.find_iter(head).last()?;
    Some(Declaration {
        name: name.as_str().to_string(),
        is_type: false,
    })
}

/// Declared types with the byte range of their body.
///
/// An unterminated body runs to the end of the file.
fn type_scopes(code: &str) -> Vec<(Range<usize>, String)> {
    TYPE_DECL_REGEX
        .captures_iter(code)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            let open = name.end() + code[name.end()..].find('{')?;
            let close = matching_delimiter(code, open, b'{', b'}').unwrap_or(code.len());
            Some((open..close, name.as_str().to_string()))
        })
        .collect()
}

/// Innermost type whose body contains `offset`.
fn enclosing_type(types: &[(Range<usize>, String)], offset: usize) -> Option<&str> {
    types
        .iter()
        .filter(|(body, _)| body.contains(&offset))
        .max_by_key(|(body, _)| body.start)
        .map(|(_, name)| name.as_str())
}

// ============================================================
// Imports
// ============================================================

#[derive(Debug, Default)]
struct Imports {
    /// Simple name -> fully qualified name.
    single: HashMap<String, String>,
    /// Packages imported with `.*`.
    wildcard: Vec<String>,
}

impl Imports {
    fn collect(code: &str) -> Self {
        let mut imports = Imports::default();
        for caps in IMPORT_REGEX.captures_iter(code) {
            if caps.get(1).is_some() {
                continue;
            }
            let Some(path) = caps.get(2).map(|m| m.as_str()) else {
                continue;
            };
            if caps.get(3).is_some() {
                imports.wildcard.push(path.to_string());
            } else if let Some(simple) = path.rsplit('.').next() {
                imports.single.insert(simple.to_string(), path.to_string());
            }
        }
        imports
    }

    fn resolve(&self, name: &str, package: Option<&str>, flavors: &[QueryFlavor]) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        if let Some(qualified) = self.single.get(name) {
            return qualified.clone();
        }
        for package in &self.wildcard {
            let candidate = format!("{}.{}", package, name);
            if flavors.iter().any(|f| f.annotation_type() == candidate) {
                return candidate;
            }
        }
        match package {
            Some(package) => format!("{}.{}", package, name),
            None => name.to_string(),
        }
    }
}

// ============================================================
// String literals
// ============================================================

/// Evaluate `"a"`, `"a" + "b"` or a text block. Anything else is `None`.
fn parse_string_expr(expr: &str) -> Option<String> {
    let mut rest = expr.trim();
    let mut value = String::new();

    loop {
        let (literal, remaining) = parse_literal(rest)?;
        value.push_str(&literal);
        rest = remaining.trim_start();
        if rest.is_empty() {
            return Some(value);
        }
        rest = rest.strip_prefix('+')?.trim_start();
    }
}

fn parse_literal(s: &str) -> Option<(String, &str)> {
    if let Some(body) = s.strip_prefix("\"\"\"") {
        let end = find_closing(body, "\"\"\"")?;
        return Some((text_block(&body[..end])?, &body[end + 3..]));
    }
    let body = s.strip_prefix('"')?;
    let end = find_closing(body, "\"")?;
    let raw = &body[..end];
    if raw.contains('\n') {
        return None;
    }
    Some((unescape_java(raw)?, &body[end + 1..]))
}

fn find_closing(body: &str, delimiter: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i..].starts_with(delimiter.as_bytes()) {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Text block content: strip incidental indentation and trailing spaces.
fn text_block(raw: &str) -> Option<String> {
    let (opening, content) = raw.split_once('\n')?;
    if !opening.trim().is_empty() {
        return None;
    }

    let lines: Vec<&str> = content
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .collect();
    let last = lines.len() - 1;
    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, l)| !l.trim().is_empty() || *i == last)
        .map(|(_, l)| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let stripped: Vec<&str> = lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end())
        .collect();
    unescape_java(&stripped.join("\n"))
}

/// Decode Java escapes. `\uXXXX` escapes are UTF-16 units, so a surrogate
/// pair spelled as two escapes becomes one character; a lone surrogate is
/// rejected.
fn unescape_java(raw: &str) -> Option<String> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut buf = [0u16; 2];

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let decoded = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            's' => ' ',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            // Line continuation inside a text block
            '\n' => continue,
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return None;
                }
                units.push(u16::from_str_radix(&hex, 16).ok()?);
                continue;
            }
            digit @ '0'..='7' => {
                let mut value = digit.to_digit(8)?;
                let extra_digits = if digit <= '3' { 2 } else { 1 };
                for _ in 0..extra_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(v) => {
                            value = value * 8 + v;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }
    String::from_utf16(&units).ok()
}

// ============================================================
// Positions
// ============================================================

/// Byte offsets where each line starts.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// 1-based line and column (in characters) of a byte offset.
    fn line_col(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        };
        let line_start = self.starts[line - 1];
        let col = source[line_start..offset].chars().count() + 1;
        (line, col)
    }

    fn line_text<'a>(&self, source: &'a str, line: usize) -> &'a str {
        let start = self.starts[line - 1];
        let end = self.starts.get(line).map_or(source.len(), |next| next - 1);
        source[start..end].trim_end_matches('\r')
    }
}
