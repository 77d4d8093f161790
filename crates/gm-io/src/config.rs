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

//! Tunables of the background watcher and of the blocking waits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing configuration shared by [`crate::AssetCatalog`] and the services built on it.
///
/// Deserializes from a partial table; missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Delay between two rescans when native change notification is unavailable.
    pub poll_interval_ms: u64,
    /// Minimum delay between two rescans triggered by change notifications.
    pub debounce_ms: u64,
    /// How long blocking loops wait before re-checking their stop flag.
    pub wait_timeout_ms: u64,
    /// Skip native change notification and always poll.
    pub force_polling: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            debounce_ms: 200,
            wait_timeout_ms: 500,
            force_polling: false,
        }
    }
}

impl CatalogConfig {
    /// [`Self::poll_interval_ms`] as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// [`Self::debounce_ms`] as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// [`Self::wait_timeout_ms`] as a [`Duration`].
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert_eq!(config.wait_timeout(), Duration::from_millis(500));
        assert!(!config.force_polling);
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{ "poll_interval_ms": 50, "force_polling": true }"#).unwrap();
        assert_eq!(config.poll_interval_ms, 50);
        assert!(config.force_polling);
        assert_eq!(config.debounce_ms, 200);
    }
}
