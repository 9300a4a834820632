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

//! # Lumina Core
//!
//! Foundational crate containing the contracts shared by the uniform binding
//! and light packing pipelines: reflection records, uniform values, light
//! records, camera and fog views, the device binding trait and error types.

#![warn(missing_docs)]

pub mod event;
pub mod renderer;
pub mod scene;

pub use event::EventBus;
pub use scene::{CameraId, CameraView, Fog, SceneDisposalHook, SceneEvent, SceneId};
