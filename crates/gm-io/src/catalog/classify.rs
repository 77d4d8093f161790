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

use crate::paths::extension_lower;
use gm_core::asset::AssetType;
use std::path::Path;

/// Derives an [`AssetType`] from a file name.
///
/// The extension decides, case-insensitively. Structured data files
/// (`.json`, `.yaml`, `.yml`) are prefabs or scenes when their stem says so
/// and scripts otherwise.
pub fn classify_path(path: &Path) -> AssetType {
    let Some(extension) = extension_lower(path) else {
        return AssetType::Unknown;
    };
    match extension.as_str() {
        "png" | "jpg" | "jpeg" | "tga" | "bmp" => AssetType::Texture,
        "obj" | "fbx" | "gltf" | "glb" => AssetType::Mesh,
        "vert" | "frag" | "glsl" | "vs" | "fs" => AssetType::Shader,
        "material" | "mat" => AssetType::Material,
        "wav" | "ogg" | "mp3" => AssetType::Audio,
        "json" | "yaml" | "yml" => {
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if stem.contains("prefab") {
                AssetType::Prefab
            } else if stem.contains("scene") {
                AssetType::Scene
            } else {
                AssetType::Script
            }
        }
        _ => AssetType::Unknown,
    }
}
