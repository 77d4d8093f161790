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

//! Loading and lookup of content schemas.

use super::simple_yaml::load_structured_file;
use super::validation;
use crate::error::{IoError, IoResult};
use crate::paths::{is_structured_file, normalize_relative};
use gm_core::content::{ContentSchema, FieldKind, SchemaField, ValidationIssue};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use walkdir::WalkDir;

/// Directory, relative to the asset root, scanned for schema files.
pub const SCHEMA_DIRECTORY: &str = "content/schemas";

/// Holds every known [`ContentSchema`], keyed by lower-case type name.
#[derive(Debug, Default)]
pub struct ContentSchemaRegistry {
    asset_root: RwLock<PathBuf>,
    schemas: RwLock<HashMap<String, ContentSchema>>,
}

impl ContentSchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root under which [`SCHEMA_DIRECTORY`] is looked up.
    pub fn set_asset_root(&self, root: impl Into<PathBuf>) {
        *self.asset_root.write().unwrap_or_else(PoisonError::into_inner) = root.into();
    }

    /// The root set by [`Self::set_asset_root`].
    pub fn asset_root(&self) -> PathBuf {
        self.asset_root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops every schema and loads all of them again from disk.
    ///
    /// Files that fail to load are logged and skipped. Returns the number of
    /// schemas registered.
    pub fn reload_all(&self) -> usize {
        let directory = self.asset_root().join(SCHEMA_DIRECTORY);
        let mut loaded = HashMap::new();

        if directory.is_dir() {
            let files = WalkDir::new(&directory)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file() && is_structured_file(entry.path()));
            for entry in files {
                match load_schema(entry.path()) {
                    Ok(schema) => {
                        log::debug!(
                            "ContentSchemaRegistry: loaded '{}' from '{}'",
                            schema.content_type,
                            entry.path().display()
                        );
                        loaded.insert(schema.content_type.clone(), schema);
                    }
                    Err(err) => log::error!("ContentSchemaRegistry: {err}"),
                }
            }
        } else {
            log::debug!(
                "ContentSchemaRegistry: no schema directory at '{}'",
                directory.display()
            );
        }

        let count = loaded.len();
        *self.schemas.write().unwrap_or_else(PoisonError::into_inner) = loaded;
        log::info!("ContentSchemaRegistry: {count} schema(s) registered");
        count
    }

    /// Loads or replaces the schema defined by `path` and returns its type.
    pub fn reload_schema_file(&self, path: &Path) -> IoResult<String> {
        let schema = load_schema(path)?;
        let content_type = schema.content_type.clone();
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(content_type.clone(), schema);
        log::info!(
            "ContentSchemaRegistry: reloaded '{content_type}' from '{}'",
            path.display()
        );
        Ok(content_type)
    }

    /// Removes every schema loaded from `path` and returns the removed types.
    pub fn remove_schema_by_source(&self, path: &Path) -> Vec<String> {
        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed: Vec<String> = schemas
            .values()
            .filter(|schema| schema.source_file == path)
            .map(|schema| schema.content_type.clone())
            .collect();
        for content_type in &removed {
            schemas.remove(content_type);
        }
        removed.sort();
        removed
    }

    /// Registered type names, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        types.sort();
        types
    }

    /// The schema for `content_type`, matched case-insensitively.
    pub fn schema(&self, content_type: &str) -> Option<ContentSchema> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&content_type.to_lowercase())
            .cloned()
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// `true` if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// See [`validation::validate_document`].
    pub fn validate_document(
        &self,
        schema: &ContentSchema,
        document: &Value,
        issues: &mut Vec<ValidationIssue>,
    ) -> bool {
        validation::validate_document(schema, document, issues)
    }
}

fn load_schema(path: &Path) -> IoResult<ContentSchema> {
    let document = load_structured_file(path)?;
    let mut schema = parse_schema(&document)
        .map_err(|err| IoError::Schema(format!("'{}': {err}", path.display())))?;
    schema.source_file = path.to_path_buf();
    Ok(schema)
}

/// Builds a [`ContentSchema`] from a parsed schema document.
///
/// `source_file` is left empty. Errors are plain messages; callers add the
/// file name.
pub fn parse_schema(document: &Value) -> Result<ContentSchema, String> {
    let content_type = document
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .filter(|name| !name.is_empty())
        .ok_or("schema is missing a 'type' string")?;
    let fields = document
        .get("fields")
        .and_then(Value::as_array)
        .ok_or("schema is missing a 'fields' array")?;

    let display_name = document
        .get("displayName")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| content_type.clone());
    let version = document.get("version").and_then(Value::as_i64).unwrap_or(1);

    let mut data_directories: Vec<String> = document
        .get("dataDirectories")
        .and_then(Value::as_array)
        .map(|dirs| {
            dirs.iter()
                .filter_map(Value::as_str)
                .map(normalize_directory)
                .filter(|dir| !dir.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if data_directories.is_empty() {
        data_directories.push(format!("content/data/{content_type}s/"));
    }

    let fields = fields
        .iter()
        .map(|field| parse_field(field, true))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContentSchema {
        content_type,
        display_name,
        version,
        source_file: PathBuf::new(),
        data_directories,
        fields,
    })
}

/// Lower-case, forward slashes, no leading `./` and exactly one trailing `/`.
fn normalize_directory(dir: &str) -> String {
    let normalized = normalize_relative(dir);
    let trimmed = normalized
        .trim_start_matches("./")
        .trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

fn parse_field(declaration: &Value, named: bool) -> Result<SchemaField, String> {
    if !declaration.is_object() {
        return Err("field declaration must be an object".into());
    }

    let name = declaration
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if named && name.is_empty() {
        return Err("field declaration is missing a 'name'".into());
    }

    let type_name = declaration
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("string")
        .to_lowercase();
    let kind = FieldKind::from_type_name(&type_name)
        .ok_or_else(|| format!("field '{name}' has unknown type '{type_name}'"))?;

    let mut field = SchemaField {
        name,
        kind,
        required: declaration
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        enum_values: declaration
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        minimum: declaration.get("minimum").and_then(Value::as_f64),
        maximum: declaration.get("maximum").and_then(Value::as_f64),
        min_length: declaration
            .get("minLength")
            .and_then(Value::as_u64)
            .map(|len| len as usize),
        max_length: declaration
            .get("maxLength")
            .and_then(Value::as_u64)
            .map(|len| len as usize),
        ..SchemaField::default()
    };

    match kind {
        FieldKind::Object => {
            let properties = declaration
                .get("fields")
                .and_then(Value::as_array)
                .ok_or_else(|| format!("object field '{}' needs a 'fields' array", field.name))?;
            field.properties = properties
                .iter()
                .map(|property| parse_field(property, true))
                .collect::<Result<_, _>>()?;
        }
        FieldKind::Array => {
            let items = declaration
                .get("items")
                .filter(|items| items.is_object())
                .ok_or_else(|| format!("array field '{}' needs an 'items' object", field.name))?;
            field.element = Some(Box::new(parse_field(items, false)?));
        }
        _ => {}
    }

    Ok(field)
}
