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

//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A temporary asset root. The path is canonical so it compares equal to
/// what the services store.
pub struct AssetRoot {
    _dir: TempDir,
    pub path: PathBuf,
}

impl AssetRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().canonicalize().expect("canonicalize temp dir");
        Self { _dir: dir, path }
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture");
        path
    }

    /// Rewrites `relative` and pushes its modification time forward so the
    /// next scan reports an update regardless of timestamp granularity.
    pub fn rewrite(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.write(relative, contents);
        bump_modified(&path);
        path
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path.join(relative)).expect("remove fixture");
    }
}

pub fn bump_modified(path: &Path) {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or_else(|_| SystemTime::now());
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(modified + Duration::from_secs(5)))
        .expect("bump modification time");
}

pub const ITEM_SCHEMA: &str = r#"{
  "type": "item",
  "displayName": "Item",
  "fields": [
    { "name": "id", "type": "string", "required": true },
    { "name": "damage", "type": "integer", "minimum": 0 },
    { "name": "rarity", "type": "string", "enum": ["common", "rare"] }
  ]
}"#;
