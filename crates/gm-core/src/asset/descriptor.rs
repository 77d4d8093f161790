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

use super::{AssetGuid, AssetType};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::SystemTime};

/// The catalog's record of one discovered file.
///
/// Descriptors are owned by the catalog; every query and every event hands
/// out a clone, so holders never observe later mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Stable identifier derived from `relative_path`.
    pub guid: AssetGuid,

    /// Classification derived from the file name.
    pub asset_type: AssetType,

    /// Root-relative path, lower-cased, with forward slashes.
    pub relative_path: String,

    /// The file's location on disk at scan time.
    pub absolute_path: PathBuf,

    /// Last modification time, when the platform reports one.
    pub last_write_time: Option<SystemTime>,
}

impl AssetDescriptor {
    /// Returns `true` if the descriptor lives under `directory`
    /// (a lower-case, forward-slash prefix such as `shaders/`).
    pub fn is_under(&self, directory: &str) -> bool {
        self.relative_path.starts_with(directory)
    }

    /// Returns `true` when `other` describes a different revision of the same file.
    pub fn differs_from(&self, other: &AssetDescriptor) -> bool {
        self.last_write_time != other.last_write_time || self.absolute_path != other.absolute_path
    }
}

/// What happened to an asset between two scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetEventKind {
    /// The file appeared.
    Added,
    /// The file's timestamp or location changed.
    Updated,
    /// The file disappeared.
    Removed,
}

/// A change notification emitted by the catalog during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEvent {
    /// The kind of change.
    pub kind: AssetEventKind,
    /// The descriptor after the change (before it, for removals).
    pub descriptor: AssetDescriptor,
}

impl AssetEvent {
    /// Creates an `Added` event.
    pub fn added(descriptor: AssetDescriptor) -> Self {
        Self {
            kind: AssetEventKind::Added,
            descriptor,
        }
    }

    /// Creates an `Updated` event.
    pub fn updated(descriptor: AssetDescriptor) -> Self {
        Self {
            kind: AssetEventKind::Updated,
            descriptor,
        }
    }

    /// Creates a `Removed` event.
    pub fn removed(descriptor: AssetDescriptor) -> Self {
        Self {
            kind: AssetEventKind::Removed,
            descriptor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn descriptor(path: &str, modified: u64) -> AssetDescriptor {
        AssetDescriptor {
            guid: AssetGuid::from_relative_path(path),
            asset_type: AssetType::Texture,
            relative_path: path.to_string(),
            absolute_path: PathBuf::from("/assets").join(path),
            last_write_time: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(modified)),
        }
    }

    #[test]
    fn is_under_matches_directory_prefix() {
        let desc = descriptor("textures/grass.png", 1);
        assert!(desc.is_under("textures/"));
        assert!(!desc.is_under("models/"));
    }

    #[test]
    fn differs_from_compares_timestamp_and_location() {
        let original = descriptor("textures/grass.png", 1);
        assert!(!original.differs_from(&original.clone()));

        let touched = descriptor("textures/grass.png", 2);
        assert!(original.differs_from(&touched));

        let mut moved = original.clone();
        moved.absolute_path = PathBuf::from("/elsewhere/textures/grass.png");
        assert!(original.differs_from(&moved));
    }

    #[test]
    fn event_constructors_set_kind() {
        let desc = descriptor("textures/grass.png", 1);
        assert_eq!(AssetEvent::added(desc.clone()).kind, AssetEventKind::Added);
        assert_eq!(AssetEvent::updated(desc.clone()).kind, AssetEventKind::Updated);
        assert_eq!(AssetEvent::removed(desc).kind, AssetEventKind::Removed);
    }
}
