// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A small, indentation-based YAML subset producing JSON values.
//!
//! Supported: nested mappings, block lists (`- item`, `- key: value`,
//! nested lists under `key:`), `#` comments and plain, quoted, numeric,
//! boolean and null scalars. Indentation must use multiples of two spaces and
//! list items sit one level deeper than their key. The document root is a
//! mapping. Anchors, flow collections (other than `[]`/`{}`), multi-line
//! strings and escape sequences are not supported.

use crate::error::{IoError, IoResult, YamlError};
use crate::paths::extension_lower;
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Reads `path` as JSON when its extension is `.json`, as YAML otherwise.
pub fn load_structured_file(path: &Path) -> IoResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if extension_lower(path).as_deref() == Some("json") {
        serde_json::from_str(&text).map_err(|source| IoError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        parse(&text).map_err(|source| IoError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

impl Line<'_> {
    fn is_list_item(&self) -> bool {
        self.text == "-" || self.text.starts_with("- ")
    }

    /// Text after the `- ` marker.
    fn item(&self) -> &str {
        self.text.get(1..).unwrap_or_default().trim()
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Object,
    Array,
}

/// An open container: where it lives in the document and which indentation
/// its children use.
struct Frame {
    indent: usize,
    kind: FrameKind,
    path: Vec<Segment>,
}

impl Frame {
    fn child(&self, indent: usize, kind: FrameKind, segment: Segment) -> Frame {
        let mut path = self.path.clone();
        path.push(segment);
        Frame { indent, kind, path }
    }
}

/// Parses `source` into a JSON object.
pub fn parse(source: &str) -> Result<Value, YamlError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines = tokenize(source)?;

    let mut root = Value::Object(Map::new());
    let mut stack = vec![Frame {
        indent: 0,
        kind: FrameKind::Object,
        path: Vec::new(),
    }];

    for (index, line) in lines.iter().enumerate() {
        while stack.len() > 1 && stack.last().is_some_and(|frame| line.indent < frame.indent) {
            stack.pop();
        }
        let next = lines.get(index + 1);
        let frame = stack.last().ok_or_else(|| YamlError::new(line.number, "empty frame stack"))?;

        if line.is_list_item() {
            if frame.kind != FrameKind::Array {
                return Err(YamlError::new(line.number, "list item without list context"));
            }
            let pushed = parse_list_item(&mut root, frame, line, next)?;
            stack.extend(pushed);
        } else {
            if frame.kind != FrameKind::Object {
                return Err(YamlError::new(line.number, "expected '- ' list item"));
            }
            let (key, value) = split_key_value(line)?;
            let container = resolve(&mut root, &frame.path, line.number)?;
            let object = as_object(container, line.number)?;
            if value.is_empty() {
                let (kind, child) = open_container(line.indent, next);
                object.insert(key.to_string(), child);
                let opened = frame.child(line.indent + 2, kind, Segment::Key(key.to_string()));
                stack.push(opened);
            } else {
                object.insert(key.to_string(), parse_scalar(value));
            }
        }
    }

    Ok(root)
}

/// Handles one `- ...` line inside an array frame and returns the frames it opens.
fn parse_list_item(
    root: &mut Value,
    frame: &Frame,
    line: &Line<'_>,
    next: Option<&Line<'_>>,
) -> Result<Vec<Frame>, YamlError> {
    let item = line.item();
    let array = match resolve(root, &frame.path, line.number)? {
        Value::Array(array) => array,
        _ => return Err(YamlError::new(line.number, "list item without list context")),
    };
    let position = array.len();
    let element_indent = line.indent + 2;

    if item.is_empty() {
        array.push(Value::Object(Map::new()));
        return Ok(vec![frame.child(
            element_indent,
            FrameKind::Object,
            Segment::Index(position),
        )]);
    }

    let Some((key, value)) = split_key_value_opt(item) else {
        array.push(parse_scalar(item));
        return Ok(Vec::new());
    };

    let element = frame.child(element_indent, FrameKind::Object, Segment::Index(position));
    let mut object = Map::new();
    let mut frames = Vec::new();
    if value.is_empty() {
        // `- key:` followed by a deeper block opens a container under `key`.
        if next.is_some_and(|next| next.indent > element_indent) {
            let (kind, child) = open_container(element_indent, next);
            object.insert(key.to_string(), child);
            frames.push(element.child(element_indent + 2, kind, Segment::Key(key.to_string())));
        } else {
            object.insert(key.to_string(), Value::Null);
        }
    } else {
        object.insert(key.to_string(), parse_scalar(value));
    }
    array.push(Value::Object(object));

    frames.insert(0, element);
    Ok(frames)
}

/// Chooses the container opened by `key:` from the line that follows it.
fn open_container(indent: usize, next: Option<&Line<'_>>) -> (FrameKind, Value) {
    match next {
        Some(next) if next.indent > indent && next.is_list_item() => {
            (FrameKind::Array, Value::Array(Vec::new()))
        }
        _ => (FrameKind::Object, Value::Object(Map::new())),
    }
}

fn tokenize(source: &str) -> Result<Vec<Line<'_>>, YamlError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let content = strip_comment(raw);
        let text = content.trim();
        if text.is_empty() {
            continue;
        }
        let indent = content.len() - content.trim_start_matches(' ').len();
        if indent % 2 != 0 {
            return Err(YamlError::new(
                number,
                "indentation must be multiples of two spaces",
            ));
        }
        lines.push(Line {
            number,
            indent,
            text,
        });
    }
    Ok(lines)
}

/// Drops a `#` comment that starts the line or follows whitespace outside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    let mut previous = ' ';
    for (index, ch) in line.char_indices() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '#' && previous.is_whitespace() => return &line[..index],
            None => {}
        }
        previous = ch;
    }
    line
}

fn split_key_value<'a>(line: &Line<'a>) -> Result<(&'a str, &'a str), YamlError> {
    split_key_value_opt(line.text)
        .ok_or_else(|| YamlError::new(line.number, "expected ':' in mapping entry"))
}

fn split_key_value_opt(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once(':')?;
    let key = unquote(key.trim());
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn resolve<'v>(root: &'v mut Value, path: &[Segment], line: usize) -> Result<&'v mut Value, YamlError> {
    let mut node = root;
    for segment in path {
        node = match segment {
            Segment::Key(key) => node.get_mut(key.as_str()),
            Segment::Index(index) => node.get_mut(*index),
        }
        .ok_or_else(|| YamlError::new(line, "internal error: dangling container"))?;
    }
    Ok(node)
}

fn as_object(value: &mut Value, line: usize) -> Result<&mut Map<String, Value>, YamlError> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(YamlError::new(line, "mapping entry inside a non-mapping value")),
    }
}

fn unquote(text: &str) -> &str {
    if text.len() >= 2 {
        for quote in ['"', '\''] {
            if text.starts_with(quote) && text.ends_with(quote) {
                return &text[1..text.len() - 1];
            }
        }
    }
    text
}

fn parse_scalar(text: &str) -> Value {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        "[]" => return Value::Array(Vec::new()),
        "{}" => return Value::Object(Map::new()),
        _ => {}
    }

    let unquoted = unquote(text);
    if unquoted.len() != text.len() {
        return Value::String(unquoted.to_string());
    }

    if looks_numeric(text) {
        if !text.contains('.') {
            if let Ok(integer) = text.parse::<i64>() {
                return Value::from(integer);
            }
        }
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }

    Value::String(text.to_string())
}

/// Optional sign, digits, at most one `.`, at least one digit.
fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut seen_dot = false;
    let mut seen_digit = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}
