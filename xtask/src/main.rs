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

// Asset pipeline tasks for GotMilked
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "GotMilked asset pipeline tasks")]
struct Cli {
    /// Asset root to use instead of the one configured in `Assets.toml`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Pipeline configuration file.
    #[arg(long, global = true, default_value = "Assets.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Asset catalog and index commands.
    #[command(subcommand)]
    Assets(AssetsCommand),
    /// Content schema and record commands.
    #[command(subcommand)]
    Content(ContentCommand),
}

#[derive(Subcommand, Debug)]
enum AssetsCommand {
    /// Scans the asset root and lists every file grouped by type.
    Scan,
    /// Builds the asset indexes and prints them.
    Index,
    /// Watches the asset root and prints asset and content events.
    Watch {
        /// Stop after this many seconds; runs until interrupted otherwise.
        #[arg(long)]
        seconds: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
enum ContentCommand {
    /// Validates every content record and fails if any is invalid.
    Validate,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = commands::assets_config::PipelineConfig::load(&cli.config)?;
    let root = config.resolve_root(cli.root);

    match cli.command {
        Command::Assets(AssetsCommand::Scan) => commands::assets::scan(&config, &root),
        Command::Assets(AssetsCommand::Index) => commands::assets::index(&config, &root),
        Command::Assets(AssetsCommand::Watch { seconds }) => {
            commands::assets::watch(&config, &root, seconds)
        }
        Command::Content(ContentCommand::Validate) => commands::content::validate(&config, &root),
    }
}
