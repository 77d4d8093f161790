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

//! Provides the primitive types describing files discovered under an asset root.
//!
//! This module is the "common language" spoken between the catalog that scans
//! the disk, the database that derives indexes from it, and every consumer that
//! reacts to asset changes. It contains:
//! - [`AssetGuid`]: a stable identifier derived from a file's canonical relative path.
//! - [`AssetType`]: the coarse classification of a file.
//! - [`AssetDescriptor`] and [`AssetEvent`]: the catalog's record of a file and the
//!   change notifications emitted when that record appears, changes or disappears.

mod descriptor;
mod guid;
mod kind;

pub use descriptor::*;
pub use guid::*;
pub use kind::*;
