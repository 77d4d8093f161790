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
use std::{path::PathBuf, time::SystemTime};

/// One problem found while validating a document against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Errors invalidate the record; warnings do not.
    pub is_error: bool,
    /// Dotted/bracketed location of the offending value, e.g. `stats.health[2]`.
    pub path: String,
    /// Human readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an error issue.
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// One content data file and the outcome of its last validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Schema type this record belongs to.
    pub content_type: String,
    /// `id` or `guid` from the document, otherwise the file stem.
    pub identifier: String,
    /// `displayName` or `title` from the document, otherwise the identifier.
    pub display_name: String,
    /// `guid` from the document, otherwise the identifier.
    pub guid: String,
    /// Root-relative, lower-case path of the data file.
    pub relative_path: String,
    /// Location of the data file on disk.
    pub source_path: PathBuf,
    /// Modification time observed when the file was loaded.
    pub last_write_time: Option<SystemTime>,
    /// `true` when validation produced no error.
    pub valid: bool,
    /// Everything validation (or loading) complained about.
    pub issues: Vec<ValidationIssue>,
    /// The parsed document, `Null` if it failed to load.
    pub document: serde_json::Value,
    /// Load counter stamp; a higher value means a more recent load.
    pub version: u64,
}

/// What changed in the content database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentEventKind {
    /// A record was inserted or replaced.
    RecordUpdated,
    /// A record was dropped because its file disappeared.
    RecordRemoved,
    /// A schema changed and every record was revalidated.
    SchemaReloaded,
}

/// A change notification emitted by the content database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEvent {
    /// The kind of change.
    pub kind: ContentEventKind,
    /// Affected content type, `<schemas>` for schema reloads.
    pub content_type: String,
    /// Affected record identifier, empty for schema reloads.
    pub identifier: String,
    /// File that triggered the change.
    pub source_path: PathBuf,
    /// Validity of the record after the change.
    pub valid: bool,
}

/// Per-type record counts, as shown by validation tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    /// The content type.
    pub content_type: String,
    /// Number of records loaded for the type.
    pub total: usize,
    /// Number of those records that failed validation.
    pub invalid: usize,
}

impl ContentSummary {
    /// Number of records that passed validation.
    pub fn valid(&self) -> usize {
        self.total - self.invalid
    }
}
