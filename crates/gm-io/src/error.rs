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

//! Error types for the I/O services.

use std::path::PathBuf;
use thiserror::Error;

/// A syntax error reported by [`crate::simple_yaml::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct YamlError {
    /// 1-based line number of the offending line.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl YamlError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Errors produced by the catalog, the indexes and the content services.
#[derive(Debug, Error)]
pub enum IoError {
    /// A file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A `.json` file is not valid JSON.
    #[error("invalid JSON in '{}': {source}", .path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// A YAML file is outside the supported subset.
    #[error("invalid YAML in '{}': {source}", .path.display())]
    Yaml {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: YamlError,
    },

    /// A schema document is malformed.
    #[error("invalid schema: {0}")]
    Schema(String),

    /// The filesystem watcher could not be set up or stopped delivering events.
    #[error("filesystem watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// A background thread could not be started.
    #[error("failed to spawn the {name} thread: {source}")]
    ThreadSpawn {
        /// Name of the thread.
        name: &'static str,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Convenience alias for results in this crate.
pub type IoResult<T> = Result<T, IoError>;
