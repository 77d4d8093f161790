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

use anyhow::{Context, Result};
use gm_io::CatalogConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the structure of the `Assets.toml` pipeline file.
///
/// ```toml
/// asset_root = "assets"
///
/// [catalog]
/// debounce_ms = 100
/// force_polling = false
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory scanned by the catalog, relative to the working directory.
    pub asset_root: PathBuf,
    /// Watcher and wait timings.
    pub catalog: CatalogConfig,
}

impl Default for PipelineConfig {
    /// The default configuration points at `assets` with default timings.
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            catalog: CatalogConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads `path`, falling back to the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No '{}' found, using the default configuration", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration at '{}'", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;
        log::info!("Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    /// The root to use, preferring a command-line override.
    pub fn resolve_root(&self, root_override: Option<PathBuf>) -> PathBuf {
        root_override.unwrap_or_else(|| self.asset_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::load(&dir.path().join("Assets.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn partial_catalog_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Assets.toml");
        fs::write(&path, "asset_root = \"game/assets\"\n\n[catalog]\ndebounce_ms = 50\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("game/assets"));
        assert_eq!(config.catalog.debounce_ms, 50);
        assert_eq!(config.catalog.poll_interval_ms, 2000);
    }

    #[test]
    fn override_wins() {
        let config = PipelineConfig::default();
        assert_eq!(config.resolve_root(None), PathBuf::from("assets"));
        assert_eq!(
            config.resolve_root(Some(PathBuf::from("other"))),
            PathBuf::from("other")
        );
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Assets.toml");
        fs::write(&path, "asset_root = [").unwrap();
        assert!(PipelineConfig::load(&path).is_err());
    }
}
