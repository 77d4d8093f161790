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

//! Query views derived from a catalog snapshot.

use gm_core::asset::{AssetDescriptor, AssetGuid, AssetType};
use std::collections::{BTreeMap, HashMap};

const SHADER_DIR: &str = "shaders/";
const MESH_DIR: &str = "models/";
const PREFAB_DIR: &str = "prefabs/";

const VERTEX_SUFFIXES: [&str; 6] = [
    ".vert",
    ".vert.glsl",
    ".vs",
    ".vs.glsl",
    ".vertex",
    ".vertex.glsl",
];
const FRAGMENT_SUFFIXES: [&str; 6] = [
    ".frag",
    ".frag.glsl",
    ".fs",
    ".fs.glsl",
    ".pixel",
    ".pixel.glsl",
];
const LANGUAGE_SUFFIXES: [&str; 3] = [".glsl", ".hlsl", ".shader"];
const STAGE_SUFFIXES: [&str; 6] = [".vert", ".vs", ".vertex", ".frag", ".fs", ".pixel"];

/// A vertex shader and a fragment shader sharing a base key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBatchRecord {
    /// `shader::<base_key>` derived GUID.
    pub guid: AssetGuid,
    /// Relative path with the language and stage suffixes stripped.
    pub base_key: String,
    /// The vertex stage.
    pub vertex: AssetDescriptor,
    /// The fragment stage.
    pub fragment: AssetDescriptor,
}

/// A mesh under `models/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshRecord {
    /// GUID of the mesh file.
    pub guid: AssetGuid,
    /// The mesh file.
    pub descriptor: AssetDescriptor,
}

/// A prefab under `prefabs/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefabRecord {
    /// GUID of the prefab file.
    pub guid: AssetGuid,
    /// The prefab file.
    pub descriptor: AssetDescriptor,
}

/// A script whose path mentions `manifest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// GUID of the manifest file.
    pub guid: AssetGuid,
    /// The manifest file.
    pub descriptor: AssetDescriptor,
}

/// One consistent generation of every view.
#[derive(Debug, Clone, Default)]
pub(crate) struct IndexSnapshot {
    pub(crate) shader_batches: Vec<ShaderBatchRecord>,
    pub(crate) meshes: Vec<MeshRecord>,
    pub(crate) prefabs: Vec<PrefabRecord>,
    pub(crate) manifests: Vec<ManifestRecord>,
    pub(crate) by_guid: HashMap<AssetGuid, AssetDescriptor>,
}

#[derive(Default)]
struct ShaderPair {
    vertex: Option<AssetDescriptor>,
    fragment: Option<AssetDescriptor>,
}

impl IndexSnapshot {
    /// Builds every view from `assets`, which must be sorted by relative path.
    pub(crate) fn build(assets: &[AssetDescriptor]) -> Self {
        let mut snapshot = IndexSnapshot::default();
        let mut pairs: BTreeMap<String, ShaderPair> = BTreeMap::new();

        for descriptor in assets {
            snapshot
                .by_guid
                .insert(descriptor.guid, descriptor.clone());

            match descriptor.asset_type {
                AssetType::Shader if descriptor.is_under(SHADER_DIR) => {
                    let path = descriptor.relative_path.as_str();
                    let pair = pairs.entry(shader_base_key(path)).or_default();
                    if is_vertex_shader(path) {
                        pair.vertex = Some(descriptor.clone());
                    } else if is_fragment_shader(path) {
                        pair.fragment = Some(descriptor.clone());
                    }
                }
                AssetType::Mesh if descriptor.is_under(MESH_DIR) => {
                    snapshot.meshes.push(MeshRecord {
                        guid: descriptor.guid,
                        descriptor: descriptor.clone(),
                    });
                }
                AssetType::Prefab if descriptor.is_under(PREFAB_DIR) => {
                    snapshot.prefabs.push(PrefabRecord {
                        guid: descriptor.guid,
                        descriptor: descriptor.clone(),
                    });
                }
                AssetType::Script if descriptor.relative_path.contains("manifest") => {
                    snapshot.manifests.push(ManifestRecord {
                        guid: descriptor.guid,
                        descriptor: descriptor.clone(),
                    });
                }
                _ => {}
            }
        }

        snapshot.shader_batches = pairs
            .into_iter()
            .filter_map(|(base_key, pair)| match (pair.vertex, pair.fragment) {
                (Some(vertex), Some(fragment)) => Some(ShaderBatchRecord {
                    guid: AssetGuid::derived("shader", &base_key),
                    base_key,
                    vertex,
                    fragment,
                }),
                _ => None,
            })
            .collect();

        snapshot
    }
}

/// `true` if `path` ends with a vertex-stage suffix.
pub fn is_vertex_shader(path: &str) -> bool {
    VERTEX_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// `true` if `path` ends with a fragment-stage suffix.
pub fn is_fragment_shader(path: &str) -> bool {
    FRAGMENT_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// Strips one language suffix, then one stage suffix, then trailing dots.
///
/// `shaders/simple.vert.glsl` and `shaders/simple.frag` both map to
/// `shaders/simple`.
pub fn shader_base_key(path: &str) -> String {
    let mut key = strip_any_suffix(path, &LANGUAGE_SUFFIXES);
    key = strip_any_suffix(key, &STAGE_SUFFIXES);
    key.trim_end_matches('.').to_string()
}

fn strip_any_suffix<'a>(path: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| path.strip_suffix(suffix))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn asset(path: &str, asset_type: AssetType) -> AssetDescriptor {
        AssetDescriptor {
            guid: AssetGuid::from_relative_path(path),
            asset_type,
            relative_path: path.to_string(),
            absolute_path: PathBuf::from("/assets").join(path),
            last_write_time: None,
        }
    }

    #[test]
    fn base_keys() {
        assert_eq!(shader_base_key("shaders/simple.vert.glsl"), "shaders/simple");
        assert_eq!(shader_base_key("shaders/simple.frag"), "shaders/simple");
        assert_eq!(shader_base_key("shaders/lit.pixel.hlsl"), "shaders/lit");
        assert_eq!(shader_base_key("shaders/odd..vs"), "shaders/odd");
        assert_eq!(shader_base_key("shaders/common.glsl"), "shaders/common");
    }

    #[test]
    fn stage_detection() {
        assert!(is_vertex_shader("shaders/a.vs.glsl"));
        assert!(is_fragment_shader("shaders/a.fs"));
        assert!(!is_vertex_shader("shaders/common.glsl"));
        assert!(!is_fragment_shader("shaders/common.glsl"));
    }

    #[test]
    fn only_complete_pairs_become_batches() {
        let assets = [
            asset("shaders/broken.vert", AssetType::Shader),
            asset("shaders/common.glsl", AssetType::Shader),
            asset("shaders/simple.frag.glsl", AssetType::Shader),
            asset("shaders/simple.vert.glsl", AssetType::Shader),
        ];
        let snapshot = IndexSnapshot::build(&assets);
        assert_eq!(snapshot.shader_batches.len(), 1);

        let batch = &snapshot.shader_batches[0];
        assert_eq!(batch.base_key, "shaders/simple");
        assert_eq!(batch.guid, AssetGuid::derived("shader", "shaders/simple"));
        assert_eq!(batch.vertex.relative_path, "shaders/simple.vert.glsl");
        assert_eq!(batch.fragment.relative_path, "shaders/simple.frag.glsl");
    }

    #[test]
    fn shaders_outside_the_shader_directory_are_ignored() {
        let assets = [
            asset("materials/a.frag", AssetType::Shader),
            asset("materials/a.vert", AssetType::Shader),
        ];
        assert!(IndexSnapshot::build(&assets).shader_batches.is_empty());
    }

    #[test]
    fn directory_views() {
        let assets = [
            asset("content/manifest.json", AssetType::Script),
            asset("misc/crate.obj", AssetType::Mesh),
            asset("models/crate.obj", AssetType::Mesh),
            asset("prefabs/tree_prefab.json", AssetType::Prefab),
            asset("scripts/logic.json", AssetType::Script),
        ];
        let snapshot = IndexSnapshot::build(&assets);
        assert_eq!(snapshot.meshes.len(), 1);
        assert_eq!(snapshot.meshes[0].descriptor.relative_path, "models/crate.obj");
        assert_eq!(snapshot.prefabs.len(), 1);
        assert_eq!(snapshot.manifests.len(), 1);
        assert_eq!(snapshot.by_guid.len(), assets.len());
    }
}
