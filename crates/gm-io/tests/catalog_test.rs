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
use gm_core::asset::{AssetEvent, AssetEventKind, AssetGuid, AssetType};
use gm_io::{AssetCatalog, CatalogConfig};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn recording_catalog(root: &AssetRoot) -> (AssetCatalog, Arc<Mutex<Vec<AssetEvent>>>) {
    let catalog = AssetCatalog::new(CatalogConfig::default());
    catalog.set_asset_root(&root.path);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    catalog.register_listener(move |event: &AssetEvent| sink.lock().unwrap().push(event.clone()));
    (catalog, events)
}

fn kinds(events: &Mutex<Vec<AssetEvent>>) -> Vec<(AssetEventKind, String)> {
    events
        .lock()
        .unwrap()
        .drain(..)
        .map(|event| (event.kind, event.descriptor.relative_path))
        .collect()
}

#[test]
fn add_update_remove_cycle() {
    let root = AssetRoot::new();
    root.write("textures/Stone.PNG", "png");
    let (catalog, events) = recording_catalog(&root);

    assert_eq!(catalog.scan(), 1);
    assert_eq!(
        kinds(&events),
        vec![(AssetEventKind::Added, "textures/stone.png".to_string())]
    );
    let descriptor = catalog.find_by_relative_path("Textures\\Stone.png").unwrap();
    assert_eq!(descriptor.asset_type, AssetType::Texture);
    assert_eq!(descriptor.absolute_path, root.path.join("textures/Stone.PNG"));

    root.rewrite("textures/Stone.PNG", "png v2");
    assert_eq!(catalog.scan(), 1);
    assert_eq!(
        kinds(&events),
        vec![(AssetEventKind::Updated, "textures/stone.png".to_string())]
    );

    root.remove("textures/Stone.PNG");
    assert_eq!(catalog.scan(), 1);
    assert_eq!(
        kinds(&events),
        vec![(AssetEventKind::Removed, "textures/stone.png".to_string())]
    );
    assert!(catalog.find_by_guid(&descriptor.guid).is_none());
    assert!(catalog.is_empty());
}

#[test]
fn rescanning_an_unchanged_tree_is_silent() {
    let root = AssetRoot::new();
    root.write("models/crate.obj", "o crate");
    root.write("shaders/simple.vert.glsl", "void main() {}");
    let (catalog, events) = recording_catalog(&root);

    assert_eq!(catalog.scan(), 2);
    events.lock().unwrap().clear();

    assert_eq!(catalog.scan(), 0);
    assert_eq!(catalog.scan(), 0);
    assert!(events.lock().unwrap().is_empty());
    assert_eq!(catalog.len(), 2);
}

#[test]
fn guids_depend_only_on_the_relative_path() {
    let first = AssetRoot::new();
    let second = AssetRoot::new();
    first.write("prefabs/Tree_Prefab.json", "{}");
    second.write("PREFABS/tree_prefab.json", "{\"other\": true}");

    let a = AssetCatalog::default();
    a.set_asset_root(&first.path);
    a.scan();
    let b = AssetCatalog::default();
    b.set_asset_root(&second.path);
    b.scan();

    let guid_a = a.find_by_relative_path("prefabs/tree_prefab.json").unwrap().guid;
    let guid_b = b.find_by_relative_path("prefabs/tree_prefab.json").unwrap().guid;
    assert_eq!(guid_a, guid_b);
    assert_eq!(guid_a, AssetGuid::from_relative_path("prefabs/tree_prefab.json"));
    assert_eq!(a.assets_by_type(AssetType::Prefab).len(), 1);
}

#[test]
fn queries_are_sorted_by_path() {
    let root = AssetRoot::new();
    root.write("b.png", "");
    root.write("a/z.wav", "");
    root.write("a/c.png", "");
    let catalog = AssetCatalog::default();
    catalog.set_asset_root(&root.path);
    catalog.scan();

    let paths: Vec<String> = catalog
        .all_assets()
        .into_iter()
        .map(|descriptor| descriptor.relative_path)
        .collect();
    assert_eq!(paths, vec!["a/c.png", "a/z.wav", "b.png"]);

    let textures: Vec<String> = catalog
        .assets_by_type(AssetType::Texture)
        .into_iter()
        .map(|descriptor| descriptor.relative_path)
        .collect();
    assert_eq!(textures, vec!["a/c.png", "b.png"]);
}

#[test]
fn unregistered_listeners_stop_receiving_events() {
    let root = AssetRoot::new();
    let (catalog, events) = recording_catalog(&root);
    let extra = Arc::new(Mutex::new(0usize));
    let counter = extra.clone();
    let id = catalog.register_listener(move |_| *counter.lock().unwrap() += 1);

    root.write("a.png", "");
    catalog.scan();
    catalog.unregister_listener(id);
    root.write("b.png", "");
    catalog.scan();

    assert_eq!(*extra.lock().unwrap(), 1);
    assert_eq!(events.lock().unwrap().len(), 2);
}

#[test]
fn polling_watcher_picks_up_new_files() {
    let root = AssetRoot::new();
    let catalog = AssetCatalog::new(CatalogConfig {
        poll_interval_ms: 50,
        force_polling: true,
        ..CatalogConfig::default()
    });
    catalog.set_asset_root(&root.path);
    catalog.scan();
    catalog.start_watching();
    assert!(catalog.is_watching());

    root.write("sounds/hit.ogg", "ogg");
    let deadline = Instant::now() + Duration::from_secs(5);
    while catalog.find_by_relative_path("sounds/hit.ogg").is_none() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(catalog.find_by_relative_path("sounds/hit.ogg").is_some());

    catalog.stop_watching();
    assert!(!catalog.is_watching());
}
