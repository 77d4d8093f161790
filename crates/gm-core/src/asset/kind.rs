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
use std::fmt;

/// The coarse classification of a file found under the asset root.
///
/// The catalog derives it from the file extension, using filename hints to
/// tell prefabs and scenes apart from other structured documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AssetType {
    /// No known extension matched.
    #[default]
    Unknown,
    /// An image (`png`, `jpg`, ...).
    Texture,
    /// A model (`obj`, `gltf`, ...).
    Mesh,
    /// A single shader stage source.
    Shader,
    /// A material description.
    Material,
    /// A structured JSON/YAML document that is neither a prefab nor a scene.
    Script,
    /// A sound file.
    Audio,
    /// A structured document whose name mentions `prefab`.
    Prefab,
    /// A structured document whose name mentions `scene`.
    Scene,
    /// Reserved for consumers that register their own kinds.
    Other,
}

impl AssetType {
    /// Every variant, in declaration order.
    pub const ALL: [AssetType; 10] = [
        AssetType::Unknown,
        AssetType::Texture,
        AssetType::Mesh,
        AssetType::Shader,
        AssetType::Material,
        AssetType::Script,
        AssetType::Audio,
        AssetType::Prefab,
        AssetType::Scene,
        AssetType::Other,
    ];

    /// A lower-case, human readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Unknown => "unknown",
            AssetType::Texture => "texture",
            AssetType::Mesh => "mesh",
            AssetType::Shader => "shader",
            AssetType::Material => "material",
            AssetType::Script => "script",
            AssetType::Audio => "audio",
            AssetType::Prefab => "prefab",
            AssetType::Scene => "scene",
            AssetType::Other => "other",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
