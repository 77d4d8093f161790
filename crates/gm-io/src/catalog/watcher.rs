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

//! Background thread keeping a catalog in sync with the disk.
//!
//! Native change notification is tried first. Its events only say "something
//! changed", so every burst is collapsed into one debounced full rescan. When
//! the platform watcher cannot be created (or dies), the thread falls back to
//! rescanning on a fixed interval.

use super::CatalogShared;
use crate::error::IoError;
use crossbeam_channel::RecvTimeoutError;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const STOP_CHECK_STEP: Duration = Duration::from_millis(50);

/// Owns the watch thread. Dropping the handle stops and joins it.
pub(crate) struct WatchHandle {
    stop: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    pub(crate) fn spawn(catalog: Arc<CatalogShared>, root: PathBuf) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let thread = thread::Builder::new().name("gm-asset-watch".into()).spawn({
            let stop = stop.clone();
            let running = running.clone();
            move || {
                run(&catalog, &root, &stop);
                running.store(false, Ordering::Release);
            }
        })?;

        Ok(Self {
            stop,
            running,
            thread: Some(thread),
        })
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("AssetCatalog: watch thread panicked");
            }
        }
    }
}

fn run(catalog: &CatalogShared, root: &Path, stop: &AtomicBool) {
    if !catalog.config.force_polling {
        match watch_native(catalog, root, stop) {
            Ok(()) => return,
            Err(err) => {
                log::warn!("AssetCatalog: native watcher unavailable ({err}), falling back to polling");
            }
        }
    }
    watch_polling(catalog, root, stop);
}

fn watch_native(catalog: &CatalogShared, root: &Path, stop: &AtomicBool) -> Result<(), IoError> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = tx.send(res);
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;
    log::info!("AssetCatalog: watching '{}' for changes", root.display());

    let debounce = catalog.config.debounce();
    let mut last_scan = Instant::now();

    while !stop.load(Ordering::Acquire) {
        match rx.recv_timeout(catalog.config.wait_timeout()) {
            // Reads performed by our own scans show up as access events.
            Ok(Ok(event)) if matches!(event.kind, EventKind::Access(_)) => {}
            Ok(Ok(_)) => {
                let since = last_scan.elapsed();
                if since < debounce && sleep_unless_stopped(debounce - since, stop) {
                    break;
                }
                while rx.try_recv().is_ok() {}
                catalog.scan();
                last_scan = Instant::now();
            }
            Ok(Err(err)) => log::warn!("AssetCatalog: watch error: {err}"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(IoError::Watch(notify::Error::generic(
                    "change notification channel disconnected",
                )));
            }
        }
    }
    Ok(())
}

fn watch_polling(catalog: &CatalogShared, root: &Path, stop: &AtomicBool) {
    log::info!(
        "AssetCatalog: polling '{}' every {:?}",
        root.display(),
        catalog.config.poll_interval()
    );
    while !sleep_unless_stopped(catalog.config.poll_interval(), stop) {
        catalog.scan();
    }
}

/// Sleeps for `total` in short steps. Returns `true` if a stop was requested.
fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + total;
    loop {
        if stop.load(Ordering::Acquire) {
            return true;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        thread::sleep(remaining.min(STOP_CHECK_STEP));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_returns_early_when_stopped() {
        let stop = AtomicBool::new(true);
        let started = Instant::now();
        assert!(sleep_unless_stopped(Duration::from_secs(5), &stop));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn sleep_runs_to_completion() {
        let stop = AtomicBool::new(false);
        assert!(!sleep_unless_stopped(Duration::from_millis(20), &stop));
    }
}
