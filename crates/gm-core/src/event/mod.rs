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

//! Provides foundational primitives for event-driven communication.
//!
//! The pipeline notifies its consumers synchronously: a scan or a content
//! reload calls every registered listener before returning. The
//! [`ListenerRegistry`] implements that fan-out generically so the catalog,
//! the asset database and the content database share one implementation.

mod listeners;

pub use self::listeners::{ListenerId, ListenerRegistry, INVALID_LISTENER};
