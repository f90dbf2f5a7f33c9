//! Structured view of the hard-coded data array in a screen source file.
//!
//! Only as much JavaScript is understood as is needed to split an array
//! literal into object records and `key: value` fields: string and template
//! literals, comments and bracket nesting. Values are kept as raw expression
//! text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PatchError;

lazy_static! {
    static ref DECLARATION: Regex =
        Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*\[")
            .expect("declaration pattern");
}

/// The first `const <name> = [ ... ]` in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    pub name: String,
    /// Byte offset of `[`
    pub start: usize,
    /// Byte offset one past `]`
    pub end: usize,
    pub records: Vec<Record>,
}

/// An object literal element of the array.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Byte offset of `{`
    pub start: usize,
    /// Byte offset one past `}`
    pub end: usize,
    pub fields: Vec<Field>,
    pub multiline: bool,
    pub trailing_comma: bool,
    pub field_indent: String,
    pub close_indent: String,
    pub changed: bool,
}

/// `key: value`, or any other member (spread, shorthand, method) kept verbatim
/// in `raw_key` with `key` unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: Option<String>,
    pub raw_key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: &str, value: String) -> Self {
        Self {
            key: Some(key.to_string()),
            raw_key: key.to_string(),
            value,
        }
    }

    pub fn render(&self) -> String {
        match self.key {
            Some(_) => format!("{}: {}", self.raw_key, self.value),
            None => self.raw_key.clone(),
        }
    }

    /// Contents of the value when it is a plain string literal.
    pub fn string_value(&self) -> Option<String> {
        string_literal(&self.value)
    }
}

impl Record {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key.as_deref() == Some(key))
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key.as_deref() == Some(key))
    }

    pub fn render(&self) -> String {
        let count = self.fields.len();
        if !self.multiline {
            let body: Vec<String> = self.fields.iter().map(Field::render).collect();
            let comma = if self.trailing_comma && count > 0 { "," } else { "" };
            if body.is_empty() {
                return "{}".to_string();
            }
            return format!("{{ {}{} }}", body.join(", "), comma);
        }

        let mut out = String::from("{\n");
        for (i, field) in self.fields.iter().enumerate() {
            out.push_str(&self.field_indent);
            out.push_str(&field.render());
            if i + 1 < count || self.trailing_comma {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str(&self.close_indent);
        out.push('}');
        out
    }
}

impl DataArray {
    /// `content` with every changed record re-rendered in place. Untouched
    /// text is returned byte for byte.
    pub fn render_into(&self, content: &str) -> String {
        let mut out = content.to_string();
        for record in self.records.iter().rev().filter(|r| r.changed) {
            out.replace_range(record.start..record.end, &record.render());
        }
        out
    }

    pub fn changed(&self) -> usize {
        self.records.iter().filter(|r| r.changed).count()
    }
}

pub fn parse(content: &str) -> Result<DataArray, PatchError> {
    let caps = DECLARATION.captures(content).ok_or(PatchError::NoDataArray)?;
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        return Err(PatchError::NoDataArray);
    };

    let src = content.as_bytes();
    let open = whole.end() - 1;
    let mut commas = Vec::new();
    let close = walk_to_close(src, open + 1, |pos, b| {
        if b == b',' {
            commas.push(pos)
        }
    })?;
    if src[close] != b']' {
        return Err(malformed(close, "array closed by wrong bracket"));
    }

    let mut records = Vec::new();
    let mut seg_start = open + 1;
    for seg_end in commas.into_iter().chain(std::iter::once(close)) {
        let first = skip_trivia(src, seg_start, seg_end)?;
        if first < seg_end && src[first] == b'{' {
            records.push(parse_record(content, first)?);
        }
        seg_start = seg_end + 1;
    }

    Ok(DataArray {
        name: name.as_str().to_string(),
        start: open,
        end: close + 1,
        records,
    })
}

fn parse_record(content: &str, open: usize) -> Result<Record, PatchError> {
    let src = content.as_bytes();
    let mut separators = Vec::new();
    let close = walk_to_close(src, open + 1, |pos, b| {
        if b == b',' || b == b':' {
            separators.push((pos, b))
        }
    })?;
    if src[close] != b'}' {
        return Err(malformed(close, "object closed by wrong bracket"));
    }

    let mut fields = Vec::new();
    let mut trailing_comma = false;
    let mut first_field_at = None;
    let mut seg_start = open + 1;
    let commas = separators
        .iter()
        .filter(|(_, b)| *b == b',')
        .map(|(p, _)| *p)
        .chain(std::iter::once(close));

    for seg_end in commas {
        let first = skip_trivia(src, seg_start, seg_end)?;
        let end = significant_end(src, first, seg_end)?;
        if end <= first {
            // only legal after the last member
            if seg_end == close && !fields.is_empty() {
                trailing_comma = true;
            }
            seg_start = seg_end + 1;
            continue;
        }
        first_field_at.get_or_insert(first);

        let colon = separators
            .iter()
            .find(|(p, b)| *b == b':' && *p >= first && *p < end)
            .map(|(p, _)| *p);
        fields.push(parse_field(content, first, colon, end)?);
        seg_start = seg_end + 1;
    }

    let multiline = content[open..close].contains('\n');
    let open_indent = line_indent(content, open);
    let close_indent = if only_whitespace_before(content, close) {
        line_indent(content, close)
    } else {
        open_indent.clone()
    };
    let field_indent = match first_field_at {
        Some(pos) if on_later_line(content, open, pos) && only_whitespace_before(content, pos) => {
            line_indent(content, pos)
        }
        _ => format!("{}  ", close_indent),
    };

    Ok(Record {
        start: open,
        end: close + 1,
        fields,
        multiline,
        trailing_comma,
        field_indent,
        close_indent,
        changed: false,
    })
}

fn parse_field(
    content: &str,
    start: usize,
    colon: Option<usize>,
    end: usize,
) -> Result<Field, PatchError> {
    let raw = &content[start..end];
    let Some(colon) = colon else {
        return Ok(Field {
            key: None,
            raw_key: raw.to_string(),
            value: String::new(),
        });
    };

    let raw_key = content[start..colon].trim_end();
    let key = if is_identifier(raw_key) {
        Some(raw_key.to_string())
    } else {
        string_literal(raw_key)
    };
    let field = match key {
        Some(key) => {
            let value_start = skip_trivia(content.as_bytes(), colon + 1, end)?;
            Field {
                key: Some(key),
                raw_key: raw_key.to_string(),
                value: content[value_start..end].to_string(),
            }
        }
        // computed keys and the like
        None => Field {
            key: None,
            raw_key: raw.to_string(),
            value: String::new(),
        },
    };
    Ok(field)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Unquoted contents of `'..'`, `".."` or a template literal without
/// substitutions.
pub fn string_literal(text: &str) -> Option<String> {
    let text = text.trim();
    let quote = text.chars().next()?;
    if !matches!(quote, '\'' | '"' | '`') || text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    if quote == '`' && inner.contains("${") {
        return None;
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => return None,
            }
        } else if c == quote {
            // two literals joined by an operator, not a plain string
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Quote `s` as a single-quoted JavaScript string literal.
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Scan from `start` (just inside an opening bracket) to the bracket that
/// closes it, skipping strings and comments. `top_level` sees every other
/// byte at nesting depth zero.
fn walk_to_close(
    src: &[u8],
    start: usize,
    mut top_level: impl FnMut(usize, u8),
) -> Result<usize, PatchError> {
    let mut stack: Vec<u8> = Vec::new();
    let mut i = start;
    while i < src.len() {
        let b = src[i];
        match b {
            b'\'' | b'"' | b'`' => {
                i = skip_string(src, i)?;
                continue;
            }
            b'/' if src.get(i + 1) == Some(&b'/') => {
                i = skip_line_comment(src, i);
                continue;
            }
            b'/' if src.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(src, i)?;
                continue;
            }
            b'(' => stack.push(b')'),
            b'[' => stack.push(b']'),
            b'{' => stack.push(b'}'),
            b')' | b']' | b'}' => match stack.pop() {
                Some(expected) if expected == b => {}
                Some(_) => return Err(malformed(i, "mismatched bracket")),
                None => return Ok(i),
            },
            _ if stack.is_empty() => top_level(i, b),
            _ => {}
        }
        i += 1;
    }
    Err(malformed(start, "unterminated bracket"))
}

fn skip_string(src: &[u8], open: usize) -> Result<usize, PatchError> {
    let quote = src[open];
    let mut i = open + 1;
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            b'$' if quote == b'`' && src.get(i + 1) == Some(&b'{') => {
                i = walk_to_close(src, i + 2, |_, _| {})? + 1;
            }
            b'\n' if quote != b'`' => return Err(malformed(open, "unterminated string")),
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(malformed(open, "unterminated string"))
}

fn skip_line_comment(src: &[u8], start: usize) -> usize {
    src[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(src.len(), |p| start + p)
}

fn skip_block_comment(src: &[u8], start: usize) -> Result<usize, PatchError> {
    src[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|p| start + 2 + p + 2)
        .ok_or_else(|| malformed(start, "unterminated comment"))
}

/// First byte in `from..to` that is not whitespace or inside a comment.
fn skip_trivia(src: &[u8], from: usize, to: usize) -> Result<usize, PatchError> {
    let mut i = from;
    while i < to {
        match src[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b'/' if src.get(i + 1) == Some(&b'/') => i = skip_line_comment(src, i),
            b'/' if src.get(i + 1) == Some(&b'*') => i = skip_block_comment(src, i)?,
            _ => return Ok(i),
        }
    }
    Ok(to)
}

/// One past the last byte in `from..to` that is not whitespace or inside a
/// comment, so a member's text never carries a trailing comment.
fn significant_end(src: &[u8], from: usize, to: usize) -> Result<usize, PatchError> {
    let mut end = from;
    let mut i = from;
    while i < to {
        match src[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(src, i)?;
                end = i;
            }
            b'/' if src.get(i + 1) == Some(&b'/') => i = skip_line_comment(src, i),
            b'/' if src.get(i + 1) == Some(&b'*') => i = skip_block_comment(src, i)?,
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                i += 1;
                end = i;
            }
        }
    }
    Ok(end.min(to))
}

fn line_start(content: &str, pos: usize) -> usize {
    content[..pos].rfind('\n').map_or(0, |p| p + 1)
}

fn line_indent(content: &str, pos: usize) -> String {
    content[line_start(content, pos)..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

fn only_whitespace_before(content: &str, pos: usize) -> bool {
    content[line_start(content, pos)..pos]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

fn on_later_line(content: &str, a: usize, b: usize) -> bool {
    content[a..b].contains('\n')
}

fn malformed(offset: usize, reason: &'static str) -> PatchError {
    PatchError::Malformed { offset, reason }
}
