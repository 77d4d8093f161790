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

//! The asset catalog: the authoritative list of files under the asset root.

mod classify;
mod watcher;

pub use classify::classify_path;

use crate::config::CatalogConfig;
use crate::paths::{canonical_relative, canonicalize_or_absolute, normalize_relative};
use gm_core::asset::{AssetDescriptor, AssetEvent, AssetGuid, AssetType};
use gm_core::{ListenerId, ListenerRegistry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use walkdir::WalkDir;
use watcher::WatchHandle;

#[derive(Default)]
struct CatalogState {
    root: PathBuf,
    by_guid: HashMap<AssetGuid, AssetDescriptor>,
    guid_by_path: HashMap<String, AssetGuid>,
}

/// State shared between the catalog and its watch thread.
pub(crate) struct CatalogShared {
    config: CatalogConfig,
    state: RwLock<CatalogState>,
    /// Serializes scans so manual and background scans never diff against the same snapshot.
    scan_lock: Mutex<()>,
    listeners: ListenerRegistry<AssetEvent>,
}

impl CatalogShared {
    fn root(&self) -> PathBuf {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .root
            .clone()
    }

    pub(crate) fn scan(&self) -> usize {
        let _scan = self.scan_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let root = self.root();
        if root.as_os_str().is_empty() {
            log::warn!("AssetCatalog: scan requested before an asset root was set");
            return 0;
        }
        if !root.is_dir() {
            log::warn!(
                "AssetCatalog: asset root '{}' does not exist",
                root.display()
            );
            return 0;
        }

        let discovered = discover(&root);

        let events = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.root != root {
                log::debug!("AssetCatalog: asset root changed during scan, discarding results");
                return 0;
            }

            let mut events = Vec::new();
            for descriptor in &discovered {
                match state.by_guid.get(&descriptor.guid) {
                    None => events.push(AssetEvent::added(descriptor.clone())),
                    Some(previous) if previous.differs_from(descriptor) => {
                        events.push(AssetEvent::updated(descriptor.clone()))
                    }
                    Some(_) => {}
                }
            }

            let mut by_guid: HashMap<AssetGuid, AssetDescriptor> =
                HashMap::with_capacity(discovered.len());
            let mut guid_by_path = HashMap::with_capacity(discovered.len());
            for descriptor in discovered {
                guid_by_path.insert(descriptor.relative_path.clone(), descriptor.guid);
                by_guid.insert(descriptor.guid, descriptor);
            }

            let mut removed: Vec<AssetDescriptor> = state
                .by_guid
                .values()
                .filter(|previous| !by_guid.contains_key(&previous.guid))
                .cloned()
                .collect();
            removed.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
            events.extend(removed.into_iter().map(AssetEvent::removed));

            state.by_guid = by_guid;
            state.guid_by_path = guid_by_path;
            events
        };

        if !events.is_empty() {
            log::debug!(
                "AssetCatalog: scan of '{}' produced {} change(s)",
                root.display(),
                events.len()
            );
            self.listeners.notify_all(&events);
        }
        events.len()
    }
}

/// Walks `root` and builds a descriptor for every regular file, sorted by path.
fn discover(root: &Path) -> Vec<AssetDescriptor> {
    let mut discovered = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("AssetCatalog: skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative_path) = canonical_relative(entry.path(), root) else {
            log::warn!(
                "AssetCatalog: '{}' is not under the asset root",
                entry.path().display()
            );
            continue;
        };
        let last_write_time = entry.metadata().ok().and_then(|meta| meta.modified().ok());

        discovered.push(AssetDescriptor {
            guid: AssetGuid::from_relative_path(&relative_path),
            asset_type: classify_path(entry.path()),
            relative_path,
            absolute_path: entry.path().to_path_buf(),
            last_write_time,
        });
    }
    discovered.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    discovered
}

/// Discovers the files under an asset root, assigns them stable GUIDs and
/// reports what changed between scans.
///
/// Scans happen on demand through [`AssetCatalog::scan`] or continuously once
/// [`AssetCatalog::start_watching`] has been called. Listeners are invoked on
/// the scanning thread, after the catalog's own lock has been released, so
/// they may query the catalog freely.
pub struct AssetCatalog {
    shared: Arc<CatalogShared>,
    watch: Mutex<Option<WatchHandle>>,
}

impl AssetCatalog {
    /// Creates an empty catalog without a root.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            shared: Arc::new(CatalogShared {
                config,
                state: RwLock::new(CatalogState::default()),
                scan_lock: Mutex::new(()),
                listeners: ListenerRegistry::new(),
            }),
            watch: Mutex::new(None),
        }
    }

    /// The timing configuration the catalog was created with.
    pub fn config(&self) -> &CatalogConfig {
        &self.shared.config
    }

    /// Points the catalog at a new root.
    ///
    /// Stops watching and forgets every known descriptor; no removal events are
    /// emitted for them. Call [`Self::scan`] to populate the catalog again.
    pub fn set_asset_root(&self, root: impl AsRef<Path>) {
        self.stop_watching();
        let root = canonicalize_or_absolute(root.as_ref());
        let _scan = self
            .shared
            .scan_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut state = self
            .shared
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        log::info!("AssetCatalog: asset root set to '{}'", root.display());
        *state = CatalogState {
            root,
            ..CatalogState::default()
        };
    }

    /// The current root, empty if none was set.
    pub fn asset_root(&self) -> PathBuf {
        self.shared.root()
    }

    /// Rescans the root synchronously and returns the number of emitted events.
    pub fn scan(&self) -> usize {
        self.shared.scan()
    }

    /// Starts the background watch thread. Does nothing if it is already running.
    pub fn start_watching(&self) {
        let mut watch = self.watch.lock().unwrap_or_else(PoisonError::into_inner);
        if watch.as_ref().is_some_and(WatchHandle::is_running) {
            return;
        }
        // Joins a thread that exited on its own.
        watch.take();

        let root = self.asset_root();
        if root.as_os_str().is_empty() {
            log::warn!("AssetCatalog: cannot watch without an asset root");
            return;
        }
        match WatchHandle::spawn(self.shared.clone(), root) {
            Ok(handle) => *watch = Some(handle),
            Err(err) => log::error!("AssetCatalog: failed to spawn the watch thread: {err}"),
        }
    }

    /// Stops and joins the background watch thread, if any.
    pub fn stop_watching(&self) {
        let handle = self
            .watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(handle);
    }

    /// `true` while the background watch thread is alive.
    pub fn is_watching(&self) -> bool {
        self.watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(WatchHandle::is_running)
    }

    /// Looks up a descriptor by GUID.
    pub fn find_by_guid(&self, guid: &AssetGuid) -> Option<AssetDescriptor> {
        self.read_state(|state| state.by_guid.get(guid).cloned())
    }

    /// Looks up a descriptor by root-relative path, ignoring case and separator style.
    pub fn find_by_relative_path(&self, relative_path: &str) -> Option<AssetDescriptor> {
        let key = normalize_relative(relative_path);
        self.read_state(|state| {
            state
                .guid_by_path
                .get(&key)
                .and_then(|guid| state.by_guid.get(guid))
                .cloned()
        })
    }

    /// Every known descriptor, sorted by relative path.
    pub fn all_assets(&self) -> Vec<AssetDescriptor> {
        let mut assets = self.read_state(|state| state.by_guid.values().cloned().collect::<Vec<_>>());
        assets.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        assets
    }

    /// Descriptors of one type, sorted by relative path.
    pub fn assets_by_type(&self, asset_type: AssetType) -> Vec<AssetDescriptor> {
        let mut assets = self.read_state(|state| {
            state
                .by_guid
                .values()
                .filter(|descriptor| descriptor.asset_type == asset_type)
                .cloned()
                .collect::<Vec<_>>()
        });
        assets.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        assets
    }

    /// Number of known descriptors.
    pub fn len(&self) -> usize {
        self.read_state(|state| state.by_guid.len())
    }

    /// `true` if no descriptor is known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a change listener. See [`ListenerRegistry::register`].
    pub fn register_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AssetEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.register(listener)
    }

    /// Removes a change listener. Unknown ids are ignored.
    pub fn unregister_listener(&self, id: ListenerId) {
        self.shared.listeners.unregister(id);
    }

    /// GUID of the file at `absolute` under the current root.
    ///
    /// Returns `None` when the path is outside the root.
    pub fn generate_guid(&self, absolute: &Path) -> Option<AssetGuid> {
        let relative = canonical_relative(absolute, &self.asset_root())?;
        Some(AssetGuid::from_relative_path(&relative))
    }

    /// Canonical relative form of `absolute` under the current root.
    pub fn canonical_relative(&self, absolute: &Path) -> Option<String> {
        canonical_relative(absolute, &self.asset_root())
    }

    fn read_state<T>(&self, f: impl FnOnce(&CatalogState) -> T) -> T {
        let state = self
            .shared
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

impl Drop for AssetCatalog {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::asset::AssetEventKind;
    use std::fs;

    #[test]
    fn scan_without_root_is_empty() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.scan(), 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn scan_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::default();
        catalog.set_asset_root(dir.path().join("missing"));
        assert_eq!(catalog.scan(), 0);
    }

    #[test]
    fn set_root_forgets_previous_descriptors_silently() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("a.png"), b"png").unwrap();

        let catalog = AssetCatalog::default();
        catalog.set_asset_root(first.path());
        catalog.scan();
        assert_eq!(catalog.len(), 1);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        catalog.register_listener(move |event: &AssetEvent| sink.lock().unwrap().push(event.kind));

        catalog.set_asset_root(second.path());
        assert!(catalog.is_empty());
        assert_eq!(catalog.scan(), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn events_are_ordered_added_then_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("old.png"), b"png").unwrap();

        let catalog = AssetCatalog::default();
        catalog.set_asset_root(dir.path());
        catalog.scan();

        fs::remove_file(dir.path().join("old.png")).unwrap();
        fs::write(dir.path().join("new.png"), b"png").unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        catalog.register_listener(move |event: &AssetEvent| {
            sink.lock()
                .unwrap()
                .push((event.kind, event.descriptor.relative_path.clone()))
        });

        assert_eq!(catalog.scan(), 2);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                (AssetEventKind::Added, "new.png".to_string()),
                (AssetEventKind::Removed, "old.png".to_string()),
            ]
        );
    }

    #[test]
    fn generate_guid_matches_scanned_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Textures")).unwrap();
        fs::write(dir.path().join("Textures/Stone.png"), b"png").unwrap();

        let catalog = AssetCatalog::default();
        catalog.set_asset_root(dir.path());
        catalog.scan();

        let descriptor = catalog.find_by_relative_path("textures/stone.png").unwrap();
        let absolute = catalog.asset_root().join("Textures/Stone.png");
        assert_eq!(catalog.generate_guid(&absolute), Some(descriptor.guid));
        assert_eq!(
            catalog.canonical_relative(&absolute).as_deref(),
            Some("textures/stone.png")
        );
    }
}
