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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The value kind a schema field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldKind {
    /// A JSON string.
    #[default]
    String,
    /// A JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A nested object described by [`SchemaField::properties`].
    Object,
    /// A list whose elements are described by [`SchemaField::element`].
    Array,
}

impl FieldKind {
    /// Parses the `type` of a field declaration, accepting the usual aliases.
    ///
    /// The name is expected to be lower-cased already.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(FieldKind::String),
            "integer" => Some(FieldKind::Integer),
            "number" | "float" | "double" => Some(FieldKind::Number),
            "boolean" | "bool" => Some(FieldKind::Boolean),
            "object" => Some(FieldKind::Object),
            "array" | "list" => Some(FieldKind::Array),
            _ => None,
        }
    }

    /// The canonical declaration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }
}

/// One field declaration of a schema, possibly nested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaField {
    /// Key of the field in the enclosing object. Empty for array elements.
    pub name: String,
    /// Accepted value kind.
    pub kind: FieldKind,
    /// Whether the field must be present.
    pub required: bool,
    /// Allowed string values; empty means unrestricted.
    pub enum_values: Vec<String>,
    /// Inclusive lower bound for numeric fields.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numeric fields.
    pub maximum: Option<f64>,
    /// Minimum string length in bytes.
    pub min_length: Option<usize>,
    /// Maximum string length in bytes.
    pub max_length: Option<usize>,
    /// Child fields of an [`FieldKind::Object`] field.
    pub properties: Vec<SchemaField>,
    /// Element description of an [`FieldKind::Array`] field.
    pub element: Option<Box<SchemaField>>,
}

/// A declarative description of one content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSchema {
    /// Lower-cased type name, the registry key.
    pub content_type: String,
    /// Name shown by tooling.
    pub display_name: String,
    /// Author-provided schema revision.
    pub version: i64,
    /// File the schema was loaded from.
    pub source_file: PathBuf,
    /// Root-relative, lower-case directories holding data files of this type.
    pub data_directories: Vec<String>,
    /// Top-level field declarations.
    pub fields: Vec<SchemaField>,
}

impl ContentSchema {
    /// Returns `true` if `relative_path` lies under one of the schema's data directories.
    pub fn owns_path(&self, relative_path: &str) -> bool {
        self.data_directories
            .iter()
            .any(|dir| relative_path.starts_with(dir.as_str()))
    }
}
