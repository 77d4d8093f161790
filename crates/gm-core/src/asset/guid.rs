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
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Namespace every asset GUID is derived under.
const ASSET_NAMESPACE: Uuid = Uuid::from_u128(0x6d1c_4a5e_9b7f_4f0e_8a2d_3c61_b5e4_9f07);

/// A deterministic, persistent identifier for an asset.
///
/// The GUID is a name-based (version 5) UUID computed from the canonical
/// relative path of the file (lower-cased, forward slashes). The same relative
/// path always yields the same GUID, across scans and across processes, so the
/// identifier survives moving the whole asset root somewhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetGuid(Uuid);

impl AssetGuid {
    /// Derives the GUID of a file from its canonical relative path.
    ///
    /// The caller is expected to canonicalize the path first; no normalisation
    /// happens here.
    pub fn from_relative_path(canonical_relative: &str) -> Self {
        Self(Uuid::new_v5(&ASSET_NAMESPACE, canonical_relative.as_bytes()))
    }

    /// Derives the GUID of a logical record built from several files,
    /// such as a vertex/fragment shader pair.
    pub fn derived(prefix: &str, key: &str) -> Self {
        Self::from_relative_path(&format!("{prefix}::{key}"))
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AssetGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for AssetGuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_yields_same_guid() {
        let a = AssetGuid::from_relative_path("shaders/simple.vert.glsl");
        let b = AssetGuid::from_relative_path("shaders/simple.vert.glsl");
        assert_eq!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 5);
    }

    #[test]
    fn different_paths_yield_different_guids() {
        let a = AssetGuid::from_relative_path("models/cube.obj");
        let b = AssetGuid::from_relative_path("models/cube.gltf");
        assert_ne!(a, b);
    }

    #[test]
    fn derived_guid_is_distinct_from_path_guid() {
        let path = AssetGuid::from_relative_path("shaders/fx");
        let derived = AssetGuid::derived("shader", "shaders/fx");
        assert_ne!(path, derived);
        assert_eq!(derived, AssetGuid::derived("shader", "shaders/fx"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let guid = AssetGuid::from_relative_path("textures/grass.png");
        let parsed: AssetGuid = guid.to_string().parse().unwrap();
        assert_eq!(parsed, guid);
        assert!("not-a-guid".parse::<AssetGuid>().is_err());
    }
}
