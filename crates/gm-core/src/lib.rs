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

//! # GotMilked Core
//!
//! Foundational crate containing the shared types and contracts of the asset
//! and content pipeline.
//!
//! Nothing in here touches the filesystem. `gm-io` builds the catalog, the
//! asset database and the content database on top of these definitions, and
//! the engine/editor layers consume them without depending on `gm-io` at all.

#![warn(missing_docs)]

pub mod asset;
pub mod content;
pub mod event;

pub use event::{ListenerId, ListenerRegistry, INVALID_LISTENER};
