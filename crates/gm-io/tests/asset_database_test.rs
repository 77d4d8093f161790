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

mod common;

use common::AssetRoot;
use gm_core::asset::{AssetEvent, AssetEventKind, AssetGuid};
use gm_io::{AssetCatalog, AssetDatabase, CatalogConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(10);

fn database() -> AssetDatabase {
    // Tests drive scans by hand; keep the background poller out of the way.
    AssetDatabase::new(Arc::new(AssetCatalog::new(CatalogConfig {
        poll_interval_ms: 60_000,
        force_polling: true,
        ..CatalogConfig::default()
    })))
}

#[test]
fn complete_shader_pair_becomes_a_batch() {
    let root = AssetRoot::new();
    root.write("shaders/simple.vert.glsl", "void main() {}");
    root.write("shaders/simple.frag.glsl", "void main() {}");

    let db = database();
    db.initialize(&root.path).unwrap();
    assert!(db.wait_for_initial_index_timeout(WAIT));
    assert!(db.is_ready());

    let batches = db.shader_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].base_key, "shaders/simple");
    assert_eq!(batches[0].guid, AssetGuid::derived("shader", "shaders/simple"));
    assert_eq!(batches[0].vertex.relative_path, "shaders/simple.vert.glsl");
    assert_eq!(batches[0].fragment.relative_path, "shaders/simple.frag.glsl");
}

#[test]
fn incomplete_pair_appears_once_completed() {
    let root = AssetRoot::new();
    root.write("shaders/lit.vert", "void main() {}");

    let db = database();
    db.initialize(&root.path).unwrap();
    assert!(db.wait_until_idle_timeout(WAIT));
    assert!(db.shader_batches().is_empty());
    let version = db.current_version();
    assert!(version >= 1);

    root.write("shaders/lit.frag", "void main() {}");
    assert!(db.catalog().scan() > 0);
    assert!(db.wait_until_idle_timeout(WAIT));

    assert_eq!(db.shader_batches().len(), 1);
    assert!(db.current_version() > version);
}

#[test]
fn directory_views_and_guid_lookup() {
    let root = AssetRoot::new();
    root.write("models/crate.obj", "o crate");
    root.write("models/textures/crate.png", "png");
    root.write("prefabs/tree_prefab.json", "{}");
    root.write("content/level_manifest.json", "{}");
    root.write("scripts/logic.json", "{}");

    let db = database();
    db.initialize(&root.path).unwrap();
    db.wait_for_initial_index();

    let meshes = db.mesh_records();
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].descriptor.relative_path, "models/crate.obj");
    assert_eq!(db.prefab_records().len(), 1);
    assert_eq!(db.manifest_records().len(), 1);

    let found = db.find_by_guid(&meshes[0].guid).unwrap();
    assert_eq!(found.relative_path, "models/crate.obj");
    assert_eq!(db.asset_root(), root.path);
}

#[test]
fn listeners_see_catalog_events() {
    let root = AssetRoot::new();
    let db = database();
    db.initialize(&root.path).unwrap();
    db.wait_until_idle();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    db.register_listener(move |event: &AssetEvent| {
        sink.lock().unwrap().push((event.kind, event.descriptor.relative_path.clone()))
    });

    root.write("prefabs/rock_prefab.yaml", "name: rock\n");
    db.catalog().scan();
    assert!(db.wait_until_idle_timeout(WAIT));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(AssetEventKind::Added, "prefabs/rock_prefab.yaml".to_string())]
    );
    assert_eq!(db.prefab_records().len(), 1);
}

#[test]
fn reinitialize_same_root_is_a_no_op_and_shutdown_resets() {
    let root = AssetRoot::new();
    root.write("models/crate.obj", "o crate");

    let db = database();
    db.initialize(&root.path).unwrap();
    db.wait_until_idle();
    let version = db.current_version();

    db.initialize(&root.path).unwrap();
    assert!(db.is_initialized());
    assert!(db.wait_until_idle_timeout(WAIT));
    assert_eq!(db.current_version(), version);

    db.shutdown();
    assert!(!db.is_initialized());
    assert!(!db.is_ready());
    assert!(db.mesh_records().is_empty());
    assert!(!db.catalog().is_watching());
    // Waits return at once on a stopped database.
    db.wait_until_idle();
    db.wait_for_initial_index();
}

#[test]
fn switching_roots_rebuilds_from_the_new_tree() {
    let first = AssetRoot::new();
    first.write("models/crate.obj", "o crate");
    let second = AssetRoot::new();
    second.write("models/barrel.obj", "o barrel");
    second.write("models/ship.glb", "glb");

    let db = database();
    db.initialize(&first.path).unwrap();
    db.wait_until_idle();
    assert_eq!(db.mesh_records().len(), 1);
    let version = db.current_version();

    db.initialize(&second.path).unwrap();
    assert!(db.wait_until_idle_timeout(WAIT));
    assert_eq!(db.mesh_records().len(), 2);
    assert!(db.current_version() > version);
}
