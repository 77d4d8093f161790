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

//! The asset database: query views over the catalog, rebuilt in the background.
//!
//! Catalog changes only mark the views dirty. A dedicated index thread picks
//! the flag up and rebuilds every view from a fresh catalog snapshot, so a
//! burst of changes costs a single rebuild. Readers always see one complete
//! generation, tagged by [`AssetDatabase::current_version`].

mod index;

pub use index::{
    is_fragment_shader, is_vertex_shader, shader_base_key, ManifestRecord, MeshRecord,
    PrefabRecord, ShaderBatchRecord,
};

use crate::catalog::AssetCatalog;
use crate::error::{IoError, IoResult};
use crate::paths::canonicalize_or_absolute;
use gm_core::asset::{AssetDescriptor, AssetEvent, AssetGuid};
use gm_core::{ListenerId, ListenerRegistry, INVALID_LISTENER};
use index::IndexSnapshot;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Flags shared between the index thread and waiters, guarded by one mutex.
struct WorkerState {
    dirty: bool,
    in_progress: bool,
    ready: bool,
    stop: bool,
}

impl WorkerState {
    fn stopped() -> Self {
        Self {
            dirty: false,
            in_progress: false,
            ready: false,
            stop: true,
        }
    }

    fn is_idle(&self) -> bool {
        self.ready && !self.dirty && !self.in_progress
    }
}

struct DatabaseShared {
    snapshot: RwLock<IndexSnapshot>,
    worker: Mutex<WorkerState>,
    wake: Condvar,
    version: AtomicU64,
    listeners: ListenerRegistry<AssetEvent>,
}

impl DatabaseShared {
    fn lock_worker(&self) -> MutexGuard<'_, WorkerState> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle_asset_event(&self, event: &AssetEvent) {
        self.listeners.notify(event);
        self.request_rebuild();
    }

    fn request_rebuild(&self) {
        self.lock_worker().dirty = true;
        self.wake.notify_all();
    }

    fn run_worker(&self, catalog: &AssetCatalog) {
        loop {
            {
                let mut state = self
                    .wake
                    .wait_while(self.lock_worker(), |state| !state.stop && !state.dirty)
                    .unwrap_or_else(PoisonError::into_inner);
                if state.stop {
                    break;
                }
                state.dirty = false;
                state.in_progress = true;
            }

            let snapshot = IndexSnapshot::build(&catalog.all_assets());
            *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
            let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
            log::debug!("AssetDatabase: rebuilt indexes (version {version})");

            {
                let mut state = self.lock_worker();
                state.in_progress = false;
                state.ready = true;
            }
            self.wake.notify_all();
        }
        self.wake.notify_all();
    }

    fn wait(&self, timeout: Option<Duration>, done: impl Fn(&WorkerState) -> bool) -> bool {
        let pending = |state: &mut WorkerState| !state.stop && !done(&*state);
        let guard = self.lock_worker();
        match timeout {
            None => {
                let state = self
                    .wake
                    .wait_while(guard, pending)
                    .unwrap_or_else(PoisonError::into_inner);
                done(&*state)
            }
            Some(timeout) => {
                let (state, _) = self
                    .wake
                    .wait_timeout_while(guard, timeout, pending)
                    .unwrap_or_else(PoisonError::into_inner);
                done(&*state)
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&IndexSnapshot) -> T) -> T {
        f(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }
}

struct Lifecycle {
    root: PathBuf,
    initialized: bool,
    catalog_listener: ListenerId,
    worker: Option<JoinHandle<()>>,
}

/// Derived, query-friendly views over an [`AssetCatalog`].
///
/// [`AssetDatabase::initialize`] points the shared catalog at a root, starts
/// watching it and spawns the index thread. Queries never block on a rebuild;
/// use [`AssetDatabase::wait_until_idle`] to observe the effect of a change.
pub struct AssetDatabase {
    catalog: Arc<AssetCatalog>,
    shared: Arc<DatabaseShared>,
    initialized: AtomicBool,
    lifecycle: Mutex<Lifecycle>,
}

impl AssetDatabase {
    /// Creates an uninitialized database over `catalog`.
    pub fn new(catalog: Arc<AssetCatalog>) -> Self {
        Self {
            catalog,
            shared: Arc::new(DatabaseShared {
                snapshot: RwLock::new(IndexSnapshot::default()),
                worker: Mutex::new(WorkerState::stopped()),
                wake: Condvar::new(),
                version: AtomicU64::new(0),
                listeners: ListenerRegistry::new(),
            }),
            initialized: AtomicBool::new(false),
            lifecycle: Mutex::new(Lifecycle {
                root: PathBuf::new(),
                initialized: false,
                catalog_listener: INVALID_LISTENER,
                worker: None,
            }),
        }
    }

    /// The catalog this database reads from.
    pub fn catalog(&self) -> &Arc<AssetCatalog> {
        &self.catalog
    }

    /// Starts indexing `root`.
    ///
    /// Calling it again with the same root is a no-op; a different root tears
    /// the previous session down first. The catalog is rescanned synchronously,
    /// so [`AssetCatalog`] queries are valid on return while the views follow
    /// on the index thread.
    pub fn initialize(&self, root: impl AsRef<Path>) -> IoResult<()> {
        let root = canonicalize_or_absolute(root.as_ref());
        let mut life = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);

        if life.initialized {
            if life.root == root {
                return Ok(());
            }
            self.teardown(&mut life);
        }

        log::info!("AssetDatabase: initializing with root '{}'", root.display());
        life.root = root.clone();
        *self.shared.lock_worker() = WorkerState {
            dirty: true,
            in_progress: false,
            ready: false,
            stop: false,
        };

        self.catalog.set_asset_root(&root);
        self.catalog.scan();

        let weak = Arc::downgrade(&self.shared);
        life.catalog_listener = self.catalog.register_listener(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_asset_event(event);
            }
        });
        self.catalog.start_watching();

        life.initialized = true;
        self.initialized.store(true, Ordering::Release);

        let spawned = thread::Builder::new().name("gm-asset-index".into()).spawn({
            let shared = self.shared.clone();
            let catalog = self.catalog.clone();
            move || shared.run_worker(&catalog)
        });
        match spawned {
            Ok(worker) => {
                life.worker = Some(worker);
                Ok(())
            }
            Err(source) => {
                log::error!("AssetDatabase: failed to spawn the index thread: {source}");
                self.shared.lock_worker().stop = true;
                self.shared.wake.notify_all();
                Err(IoError::ThreadSpawn {
                    name: "asset index",
                    source,
                })
            }
        }
    }

    /// Stops the index thread, detaches from the catalog and clears the views.
    pub fn shutdown(&self) {
        let mut life = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if life.initialized {
            self.teardown(&mut life);
        }
    }

    fn teardown(&self, life: &mut Lifecycle) {
        {
            let mut state = self.shared.lock_worker();
            state.stop = true;
            state.dirty = false;
        }
        self.shared.wake.notify_all();
        if let Some(worker) = life.worker.take() {
            if worker.join().is_err() {
                log::error!("AssetDatabase: index thread panicked");
            }
        }

        self.catalog.unregister_listener(life.catalog_listener);
        life.catalog_listener = INVALID_LISTENER;
        self.catalog.stop_watching();

        *self
            .shared
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = IndexSnapshot::default();
        *self.shared.lock_worker() = WorkerState::stopped();
        self.shared.wake.notify_all();

        life.initialized = false;
        self.initialized.store(false, Ordering::Release);
        log::info!("AssetDatabase: shut down '{}'", life.root.display());
    }

    /// Blocks until the first rebuild has completed, or the database stops.
    pub fn wait_for_initial_index(&self) {
        self.shared.wait(None, |state| state.ready);
    }

    /// Like [`Self::wait_for_initial_index`], giving up after `timeout`.
    /// Returns `true` if the views are ready.
    pub fn wait_for_initial_index_timeout(&self, timeout: Duration) -> bool {
        self.shared.wait(Some(timeout), |state| state.ready)
    }

    /// Blocks until no rebuild is pending or running, or the database stops.
    pub fn wait_until_idle(&self) {
        self.shared.wait(None, WorkerState::is_idle);
    }

    /// Like [`Self::wait_until_idle`], giving up after `timeout`.
    /// Returns `true` if the database is idle.
    pub fn wait_until_idle_timeout(&self, timeout: Duration) -> bool {
        self.shared.wait(Some(timeout), WorkerState::is_idle)
    }

    /// Complete vertex/fragment pairs under `shaders/`, sorted by base key.
    pub fn shader_batches(&self) -> Vec<ShaderBatchRecord> {
        self.shared.read(|snapshot| snapshot.shader_batches.clone())
    }

    /// Meshes under `models/`.
    pub fn mesh_records(&self) -> Vec<MeshRecord> {
        self.shared.read(|snapshot| snapshot.meshes.clone())
    }

    /// Prefabs under `prefabs/`.
    pub fn prefab_records(&self) -> Vec<PrefabRecord> {
        self.shared.read(|snapshot| snapshot.prefabs.clone())
    }

    /// Scripts whose path mentions `manifest`.
    pub fn manifest_records(&self) -> Vec<ManifestRecord> {
        self.shared.read(|snapshot| snapshot.manifests.clone())
    }

    /// Looks up a descriptor in the current generation.
    pub fn find_by_guid(&self, guid: &AssetGuid) -> Option<AssetDescriptor> {
        self.shared.read(|snapshot| snapshot.by_guid.get(guid).cloned())
    }

    /// Root of the current session, empty before initialization.
    pub fn asset_root(&self) -> PathBuf {
        self.lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .root
            .clone()
    }

    /// `true` between a successful [`Self::initialize`] and [`Self::shutdown`].
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// `true` once the first rebuild of the session has completed.
    pub fn is_ready(&self) -> bool {
        self.shared.lock_worker().ready
    }

    /// Number of completed rebuilds. Never decreases, even across sessions.
    pub fn current_version(&self) -> u64 {
        self.shared.version.load(Ordering::Acquire)
    }

    /// Registers a listener receiving every catalog event before the rebuild it triggers.
    pub fn register_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AssetEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.register(listener)
    }

    /// Removes a listener. Unknown ids are ignored.
    pub fn unregister_listener(&self, id: ListenerId) {
        self.shared.listeners.unregister(id);
    }
}

impl Drop for AssetDatabase {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    #[test]
    fn waits_return_immediately_before_initialize() {
        let database = AssetDatabase::new(Arc::new(AssetCatalog::new(CatalogConfig::default())));
        database.wait_for_initial_index();
        database.wait_until_idle();
        assert!(!database.is_ready());
        assert!(!database.is_initialized());
        assert_eq!(database.current_version(), 0);
    }

    #[test]
    fn shutdown_without_initialize_is_harmless() {
        let database = AssetDatabase::new(Arc::new(AssetCatalog::default()));
        database.shutdown();
        database.shutdown();
        assert!(database.asset_root().as_os_str().is_empty());
    }
}
