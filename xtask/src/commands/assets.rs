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

use crate::commands::assets_config::PipelineConfig;
use crate::helpers::*;
use anyhow::{bail, Context, Result};
use gm_core::asset::{AssetEvent, AssetEventKind, AssetType};
use gm_core::content::ContentEvent;
use gm_io::{AssetCatalog, AssetDatabase, ContentDatabase, ContentSchemaRegistry};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Scans the asset root once and lists every descriptor, grouped by type.
pub fn scan(config: &PipelineConfig, root: &Path) -> Result<()> {
    print_task_start("Scanning Assets", MAGNIFIER, BLUE);
    ensure_root(root)?;

    let catalog = AssetCatalog::new(config.catalog.clone());
    catalog.set_asset_root(root);
    catalog.scan();
    print_info(&format!("Asset root: '{}'", catalog.asset_root().display()));

    for asset_type in AssetType::ALL {
        let assets = catalog.assets_by_type(asset_type);
        if assets.is_empty() {
            continue;
        }
        print_section(asset_type.as_str(), assets.len());
        for descriptor in assets {
            println!("  {}  {}", descriptor.guid, descriptor.relative_path);
        }
    }

    print_success(&format!("Found {} asset(s)", catalog.len()));
    Ok(())
}

/// Builds the asset indexes and prints every view.
pub fn index(config: &PipelineConfig, root: &Path) -> Result<()> {
    print_task_start("Indexing Assets", PACKAGE, MAGENTA);
    ensure_root(root)?;

    let catalog = Arc::new(AssetCatalog::new(config.catalog.clone()));
    let database = AssetDatabase::new(catalog);
    database
        .initialize(root)
        .context("Failed to start the asset database")?;
    database.wait_for_initial_index();

    let batches = database.shader_batches();
    print_section("Shader batches", batches.len());
    for batch in &batches {
        println!(
            "  {}  {}\n      vertex:   {}\n      fragment: {}",
            batch.guid, batch.base_key, batch.vertex.relative_path, batch.fragment.relative_path
        );
    }

    let meshes = database.mesh_records();
    print_section("Meshes", meshes.len());
    for mesh in &meshes {
        println!("  {}  {}", mesh.guid, mesh.descriptor.relative_path);
    }

    let prefabs = database.prefab_records();
    print_section("Prefabs", prefabs.len());
    for prefab in &prefabs {
        println!("  {}  {}", prefab.guid, prefab.descriptor.relative_path);
    }

    let manifests = database.manifest_records();
    print_section("Manifests", manifests.len());
    for manifest in &manifests {
        println!("  {}  {}", manifest.guid, manifest.descriptor.relative_path);
    }

    print_success(&format!(
        "Index version {} ready",
        database.current_version()
    ));
    database.shutdown();
    Ok(())
}

/// Keeps the asset and content databases live and prints their events.
pub fn watch(config: &PipelineConfig, root: &Path, seconds: Option<u64>) -> Result<()> {
    print_task_start("Watching Assets", EYE, CYAN);
    ensure_root(root)?;

    let catalog = Arc::new(AssetCatalog::new(config.catalog.clone()));
    let assets = AssetDatabase::new(catalog.clone());
    assets
        .initialize(root)
        .context("Failed to start the asset database")?;
    assets.wait_for_initial_index();

    let content = ContentDatabase::new(catalog.clone(), Arc::new(ContentSchemaRegistry::new()));
    content.initialize(root);

    assets.register_listener(print_asset_event);
    content.register_listener(print_content_event);
    content.set_notification_callback(|message, is_error| {
        if is_error {
            print_error(message);
        } else {
            print_success(message);
        }
    });

    match seconds {
        Some(seconds) => print_info(&format!(
            "Watching '{}' for {seconds}s",
            catalog.asset_root().display()
        )),
        None => print_info(&format!(
            "Watching '{}', press Ctrl+C to stop",
            catalog.asset_root().display()
        )),
    }

    let deadline = seconds.map(|seconds| Instant::now() + Duration::from_secs(seconds));
    while deadline.map_or(true, |deadline| Instant::now() < deadline) {
        thread::sleep(Duration::from_millis(100));
    }

    content.shutdown();
    assets.shutdown();
    print_success(&format!(
        "Stopped after {} index rebuild(s)",
        assets.current_version()
    ));
    Ok(())
}

fn print_asset_event(event: &AssetEvent) {
    let (label, color) = match event.kind {
        AssetEventKind::Added => ("added", GREEN),
        AssetEventKind::Updated => ("updated", YELLOW),
        AssetEventKind::Removed => ("removed", RED),
    };
    println!(
        "{}{:>8}{} [{}] {}",
        color, label, RESET, event.descriptor.asset_type, event.descriptor.relative_path
    );
}

fn print_content_event(event: &ContentEvent) {
    let status = if event.valid {
        format!("{GREEN}{CHECK}{RESET}")
    } else {
        format!("{RED}{CROSS}{RESET}")
    };
    println!(
        "{} {:?} {} '{}' ({})",
        status,
        event.kind,
        event.content_type,
        event.identifier,
        event.source_path.display()
    );
}

fn ensure_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        print_error(&format!("Asset root '{}' does not exist", root.display()));
        bail!("asset root '{}' is not a directory", root.display());
    }
    Ok(())
}
