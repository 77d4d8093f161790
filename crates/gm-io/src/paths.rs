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

//! Path normalization helpers shared by the catalog and the content services.
//!
//! Every root-relative path the services store or compare is lower-case and
//! uses `/` separators, so lookups are insensitive to case and platform.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Resolves `path` to its canonical form, falling back to an absolute
/// (but unresolved) path when the target does not exist yet.
pub fn canonicalize_or_absolute(path: &Path) -> PathBuf {
    match std::fs::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(err) => {
            log::warn!(
                "Paths: could not canonicalize '{}' ({err}), using it as-is",
                path.display()
            );
            std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
        }
    }
}

/// Lower-cases `path` and turns backslashes into forward slashes.
pub fn normalize_relative(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// Returns the canonical relative form of `absolute` under `root`, or `None`
/// when `absolute` does not live under `root`.
pub fn canonical_relative(absolute: &Path, root: &Path) -> Option<String> {
    let relative = absolute.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                if !out.is_empty() {
                    out.push('/');
                }
                out.push_str(&part.to_string_lossy());
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    if out.is_empty() {
        return None;
    }
    Some(out.to_lowercase())
}

/// Lower-cased extension of `path` without the dot.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
}

/// `true` for `.json`, `.yaml` and `.yml` files, in any case.
pub fn is_structured_file(path: &Path) -> bool {
    matches!(
        extension_lower(path).as_deref(),
        Some("json" | "yaml" | "yml")
    )
}
