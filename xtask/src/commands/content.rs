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
use anyhow::{bail, Result};
use gm_io::{AssetCatalog, ContentDatabase, ContentSchemaRegistry};
use std::path::Path;
use std::sync::Arc;

/// Loads every schema and record under `root`, prints a per-type summary and
/// every issue, and fails when any record is invalid.
pub fn validate(config: &PipelineConfig, root: &Path) -> Result<()> {
    print_task_start("Validating Content", CLIPBOARD, GREEN);
    if !root.is_dir() {
        bail!("asset root '{}' is not a directory", root.display());
    }

    let catalog = Arc::new(AssetCatalog::new(config.catalog.clone()));
    let database = ContentDatabase::new(catalog, Arc::new(ContentSchemaRegistry::new()));
    database.initialize(root);

    let summary = database.summary();
    if summary.is_empty() {
        print_warning("No content schemas found under content/schemas");
        return Ok(());
    }

    let mut invalid = 0;
    for entry in &summary {
        print_section(&entry.content_type, entry.total);
        println!(
            "  {}{} valid{}, {}{} invalid{}",
            GREEN,
            entry.valid(),
            RESET,
            if entry.invalid > 0 { RED } else { RESET },
            entry.invalid,
            RESET
        );
        for record in database.records_snapshot(&entry.content_type) {
            for issue in &record.issues {
                println!(
                    "  {}{}{} {} ({}): {}",
                    RED,
                    CROSS,
                    RESET,
                    record.relative_path,
                    issue.path,
                    issue.message
                );
            }
        }
        invalid += entry.invalid;
    }

    if invalid > 0 {
        print_error(&format!("{invalid} invalid content record(s)"));
        bail!("content validation failed");
    }
    print_success("All content records are valid");
    Ok(())
}
