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

//! # GotMilked I/O
//!
//! Services that turn an asset directory into live, queryable indexes:
//!
//! - [`AssetCatalog`] scans the asset root, assigns each file a stable GUID and
//!   reports additions, updates and removals; it can keep watching the root in
//!   the background.
//! - [`AssetDatabase`] derives query-friendly views (shader pairs, meshes,
//!   prefabs, manifests) from the catalog on a dedicated index thread.
//! - [`ContentSchemaRegistry`] and [`ContentDatabase`] load declarative
//!   schemas and validate JSON/YAML content records against them, reloading
//!   incrementally as the catalog reports changes.
//!
//! Every service is an explicitly constructed object. Wire them together by
//! sharing `Arc`s:
//!
//! ```no_run
//! use std::sync::Arc;
//! use gm_io::{AssetCatalog, AssetDatabase, CatalogConfig, ContentDatabase, ContentSchemaRegistry};
//!
//! # fn main() -> Result<(), gm_io::IoError> {
//! let catalog = Arc::new(AssetCatalog::new(CatalogConfig::default()));
//! let assets = AssetDatabase::new(catalog.clone());
//! assets.initialize("assets")?;
//!
//! let content = ContentDatabase::new(catalog, Arc::new(ContentSchemaRegistry::new()));
//! content.initialize("assets");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod paths;

pub use catalog::AssetCatalog;
pub use config::CatalogConfig;
pub use content::{simple_yaml, ContentDatabase, ContentSchemaRegistry};
pub use database::{AssetDatabase, ManifestRecord, MeshRecord, PrefabRecord, ShaderBatchRecord};
pub use error::{IoError, IoResult, YamlError};
