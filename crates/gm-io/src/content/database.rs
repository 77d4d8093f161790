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

//! Validated content records, kept in sync with the asset catalog.

use super::schema_registry::{ContentSchemaRegistry, SCHEMA_DIRECTORY};
use super::simple_yaml::load_structured_file;
use super::validation::validate_document;
use crate::catalog::AssetCatalog;
use crate::paths::{canonical_relative, canonicalize_or_absolute, is_structured_file, normalize_relative};
use gm_core::asset::{AssetEvent, AssetEventKind};
use gm_core::content::{
    ContentEvent, ContentEventKind, ContentRecord, ContentSummary, ValidationIssue,
};
use gm_core::{ListenerId, ListenerRegistry, INVALID_LISTENER};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use walkdir::WalkDir;

/// Directory, relative to the asset root, holding content data files.
pub const DATA_DIRECTORY: &str = "content/data";

/// `content_type` reported by [`ContentEventKind::SchemaReloaded`] events.
pub const SCHEMA_RELOAD_TYPE: &str = "<schemas>";

/// Stamps every load, across all databases, so newer loads compare greater.
static NEXT_RECORD_VERSION: AtomicU64 = AtomicU64::new(1);

type NotificationCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

#[derive(Default)]
struct RecordStore {
    by_type: HashMap<String, Vec<ContentRecord>>,
    type_by_path: HashMap<String, String>,
}

struct ContentShared {
    schemas: Arc<ContentSchemaRegistry>,
    asset_root: RwLock<PathBuf>,
    records: RwLock<RecordStore>,
    listeners: ListenerRegistry<ContentEvent>,
    notification: RwLock<Option<NotificationCallback>>,
}

impl ContentShared {
    fn asset_root(&self) -> PathBuf {
        self.asset_root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handle_asset_event(&self, event: &AssetEvent) {
        let relative = normalize_relative(&event.descriptor.relative_path);
        let absolute = &event.descriptor.absolute_path;

        if is_under(&relative, SCHEMA_DIRECTORY) {
            if !is_structured_file(absolute) {
                return;
            }
            self.schemas.remove_schema_by_source(absolute);
            let valid = match event.kind {
                AssetEventKind::Removed => true,
                AssetEventKind::Added | AssetEventKind::Updated => {
                    match self.schemas.reload_schema_file(absolute) {
                        Ok(_) => true,
                        Err(err) => {
                            log::error!("ContentDatabase: {err}");
                            false
                        }
                    }
                }
            };
            self.reload_all_content();
            self.emit(ContentEvent {
                kind: ContentEventKind::SchemaReloaded,
                content_type: SCHEMA_RELOAD_TYPE.to_string(),
                identifier: String::new(),
                source_path: absolute.clone(),
                valid,
            });
            self.toast(
                &format!("Schemas reloaded ({})", relative),
                !valid,
            );
            return;
        }

        if !is_under(&relative, DATA_DIRECTORY) {
            return;
        }
        if !is_structured_file(absolute) {
            log::debug!("ContentDatabase: ignoring non-data file '{relative}'");
            return;
        }
        match event.kind {
            AssetEventKind::Removed => self.remove_content_file(&relative),
            AssetEventKind::Added | AssetEventKind::Updated => {
                self.reload_content_file(absolute, &relative)
            }
        }
    }

    fn reload_all_content(&self) {
        let root = self.asset_root();
        let mut store = RecordStore::default();

        for content_type in self.schemas.registered_types() {
            let Some(schema) = self.schemas.schema(&content_type) else {
                continue;
            };
            let records = store.by_type.entry(content_type.clone()).or_default();

            for directory in &schema.data_directories {
                let absolute_dir = root.join(directory);
                if !absolute_dir.is_dir() {
                    continue;
                }
                let files = WalkDir::new(&absolute_dir)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Ok(entry) => Some(entry),
                        Err(err) => {
                            log::warn!("ContentDatabase: skipping unreadable entry: {err}");
                            None
                        }
                    })
                    .filter(|entry| entry.file_type().is_file() && is_structured_file(entry.path()));

                for entry in files {
                    let relative = canonical_relative(entry.path(), &root).unwrap_or_else(|| {
                        entry.file_name().to_string_lossy().to_lowercase()
                    });
                    let record = self.load_record(&content_type, entry.path(), &relative);
                    store.type_by_path.insert(relative, content_type.clone());
                    records.push(record);
                }
            }
        }

        let total: usize = store.by_type.values().map(Vec::len).sum();
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = store;
        log::info!("ContentDatabase: loaded {total} content record(s)");
    }

    fn reload_content_file(&self, absolute: &Path, relative: &str) {
        let Some(content_type) = self.content_type_for(relative) else {
            log::debug!("ContentDatabase: no schema owns '{relative}'");
            return;
        };

        let record = self.load_record(&content_type, absolute, relative);
        let event = ContentEvent {
            kind: ContentEventKind::RecordUpdated,
            content_type: content_type.clone(),
            identifier: record.identifier.clone(),
            source_path: absolute.to_path_buf(),
            valid: record.valid,
        };
        let message = match record.issues.first() {
            Some(issue) if !record.valid => format!("Content '{}': {}", record.identifier, issue.message),
            _ => format!("Content '{}': reloaded", record.identifier),
        };
        let valid = record.valid;

        {
            let mut store = self.records.write().unwrap_or_else(PoisonError::into_inner);
            let records = store.by_type.entry(content_type.clone()).or_default();
            match records.iter_mut().find(|existing| existing.relative_path == relative) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
            store.type_by_path.insert(relative.to_string(), content_type);
        }

        log::debug!("ContentDatabase: reloaded '{relative}' (valid: {valid})");
        self.emit(event);
        self.toast(&message, !valid);
    }

    fn remove_content_file(&self, relative: &str) {
        let removed = {
            let mut store = self.records.write().unwrap_or_else(PoisonError::into_inner);
            let Some(content_type) = store.type_by_path.remove(relative) else {
                return;
            };
            let records = store.by_type.entry(content_type.clone()).or_default();
            let position = records.iter().position(|record| record.relative_path == relative);
            position.map(|index| (content_type, records.remove(index)))
        };
        let Some((content_type, record)) = removed else {
            return;
        };

        log::debug!("ContentDatabase: removed '{relative}'");
        self.emit(ContentEvent {
            kind: ContentEventKind::RecordRemoved,
            content_type,
            identifier: record.identifier.clone(),
            source_path: record.source_path.clone(),
            valid: false,
        });
        let label = if record.identifier.is_empty() {
            relative
        } else {
            record.identifier.as_str()
        };
        self.toast(&format!("Content '{label}' removed"), false);
    }

    /// First registered type (in name order) whose schema owns `relative`.
    fn content_type_for(&self, relative: &str) -> Option<String> {
        self.schemas
            .registered_types()
            .into_iter()
            .find(|content_type| {
                self.schemas
                    .schema(content_type)
                    .is_some_and(|schema| schema.owns_path(relative))
            })
    }

    fn load_record(&self, content_type: &str, absolute: &Path, relative: &str) -> ContentRecord {
        let mut record = ContentRecord {
            content_type: content_type.to_string(),
            identifier: String::new(),
            display_name: String::new(),
            guid: String::new(),
            relative_path: relative.to_string(),
            source_path: absolute.to_path_buf(),
            last_write_time: std::fs::metadata(absolute)
                .and_then(|meta| meta.modified())
                .ok(),
            valid: false,
            issues: Vec::new(),
            document: serde_json::Value::Null,
            version: NEXT_RECORD_VERSION.fetch_add(1, Ordering::Relaxed),
        };

        match load_structured_file(absolute) {
            Ok(document) => {
                let text = |key: &str| {
                    document
                        .get(key)
                        .and_then(serde_json::Value::as_str)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                };
                record.identifier = text("id").or_else(|| text("guid")).unwrap_or_default();
                record.display_name = text("displayName").or_else(|| text("title")).unwrap_or_default();
                record.guid = text("guid").unwrap_or_default();
                record.document = document;

                match self.schemas.schema(content_type) {
                    Some(schema) => {
                        record.valid = validate_document(&schema, &record.document, &mut record.issues);
                    }
                    None => record
                        .issues
                        .push(ValidationIssue::error(content_type, "Schema not found")),
                }
            }
            Err(err) => {
                log::warn!("ContentDatabase: {err}");
                record
                    .issues
                    .push(ValidationIssue::error(content_type, err.to_string()));
            }
        }

        if record.identifier.is_empty() {
            record.identifier = absolute
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        if record.display_name.is_empty() {
            record.display_name = record.identifier.clone();
        }
        if record.guid.is_empty() {
            record.guid = record.identifier.clone();
        }
        record
    }

    fn emit(&self, event: ContentEvent) {
        self.listeners.notify(&event);
    }

    fn toast(&self, message: &str, is_error: bool) {
        let callback = self
            .notification
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(message, is_error);
        }
    }
}

fn is_under(relative: &str, directory: &str) -> bool {
    relative
        .strip_prefix(directory)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Content records validated against the schemas of a [`ContentSchemaRegistry`].
///
/// After [`ContentDatabase::initialize`] the database follows the catalog:
/// schema edits trigger a full reload, data edits reload a single record.
/// Listeners and the notification callback run on the thread that scanned the
/// catalog.
pub struct ContentDatabase {
    catalog: Arc<AssetCatalog>,
    shared: Arc<ContentShared>,
    catalog_listener: Mutex<ListenerId>,
}

impl ContentDatabase {
    /// Creates an empty database.
    pub fn new(catalog: Arc<AssetCatalog>, schemas: Arc<ContentSchemaRegistry>) -> Self {
        Self {
            catalog,
            shared: Arc::new(ContentShared {
                schemas,
                asset_root: RwLock::new(PathBuf::new()),
                records: RwLock::new(RecordStore::default()),
                listeners: ListenerRegistry::new(),
                notification: RwLock::new(None),
            }),
            catalog_listener: Mutex::new(INVALID_LISTENER),
        }
    }

    /// The registry records are validated against.
    pub fn schemas(&self) -> &Arc<ContentSchemaRegistry> {
        &self.shared.schemas
    }

    /// Loads every schema and record under `root` and starts following the catalog.
    ///
    /// The catalog is expected to be rooted at the same directory; event paths
    /// are interpreted relative to it.
    pub fn initialize(&self, root: impl AsRef<Path>) {
        self.shutdown();

        let root = canonicalize_or_absolute(root.as_ref());
        log::info!("ContentDatabase: initializing with root '{}'", root.display());
        *self
            .shared
            .asset_root
            .write()
            .unwrap_or_else(PoisonError::into_inner) = root.clone();
        self.shared.schemas.set_asset_root(root);
        self.reload_all_schemas();
        self.reload_all_content();

        let weak = Arc::downgrade(&self.shared);
        let id = self.catalog.register_listener(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_asset_event(event);
            }
        });
        *self
            .catalog_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = id;
    }

    /// Detaches from the catalog and drops every record.
    pub fn shutdown(&self) {
        let id = std::mem::replace(
            &mut *self
                .catalog_listener
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            INVALID_LISTENER,
        );
        if id != INVALID_LISTENER {
            self.catalog.unregister_listener(id);
            log::info!("ContentDatabase: shut down");
        }
        *self
            .shared
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner) = RecordStore::default();
    }

    /// Routes one catalog event. Called automatically once initialized.
    pub fn handle_asset_event(&self, event: &AssetEvent) {
        self.shared.handle_asset_event(event);
    }

    /// Reloads every schema from disk. Records are not revalidated.
    pub fn reload_all_schemas(&self) -> usize {
        self.shared.schemas.reload_all()
    }

    /// Reloads and revalidates every record of every registered type.
    pub fn reload_all_content(&self) {
        self.shared.reload_all_content();
    }

    /// Sets the callback receiving human-readable messages and an error flag.
    pub fn set_notification_callback<F>(&self, callback: F)
    where
        F: Fn(&str, bool) + Send + Sync + 'static,
    {
        *self
            .shared
            .notification
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Removes the notification callback.
    pub fn clear_notification_callback(&self) {
        *self
            .shared
            .notification
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Registers a structured change listener.
    pub fn register_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ContentEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.register(listener)
    }

    /// Removes a listener. Unknown ids are ignored.
    pub fn unregister_listener(&self, id: ListenerId) {
        self.shared.listeners.unregister(id);
    }

    /// Types with a registered schema, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        self.shared.schemas.registered_types()
    }

    /// Copies of the records of `content_type`.
    pub fn records_snapshot(&self, content_type: &str) -> Vec<ContentRecord> {
        self.read_records(|store| {
            store
                .by_type
                .get(&content_type.to_lowercase())
                .cloned()
                .unwrap_or_default()
        })
    }

    /// Every issue of every record, grouped by type in name order.
    pub fn issues_snapshot(&self) -> Vec<ValidationIssue> {
        self.read_records(|store| {
            let mut types: Vec<&String> = store.by_type.keys().collect();
            types.sort();
            types
                .into_iter()
                .flat_map(|content_type| &store.by_type[content_type])
                .flat_map(|record| record.issues.iter().cloned())
                .collect()
        })
    }

    /// Record counts per registered type, sorted by type.
    pub fn summary(&self) -> Vec<ContentSummary> {
        let types = self.registered_types();
        self.read_records(|store| {
            types
                .into_iter()
                .map(|content_type| {
                    let records = store.by_type.get(&content_type);
                    ContentSummary {
                        total: records.map_or(0, Vec::len),
                        invalid: records.map_or(0, |records| {
                            records.iter().filter(|record| !record.valid).count()
                        }),
                        content_type,
                    }
                })
                .collect()
        })
    }

    /// Finds a record of `content_type` by identifier.
    pub fn find_record(&self, content_type: &str, identifier: &str) -> Option<ContentRecord> {
        self.read_records(|store| {
            store
                .by_type
                .get(&content_type.to_lowercase())?
                .iter()
                .find(|record| record.identifier == identifier)
                .cloned()
        })
    }

    fn read_records<T>(&self, f: impl FnOnce(&RecordStore) -> T) -> T {
        f(&self.shared.records.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Drop for ContentDatabase {
    fn drop(&mut self) {
        self.shutdown();
    }
}
