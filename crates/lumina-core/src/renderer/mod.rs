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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module defines the "common language" the uniform and light pipelines
//! speak: reflection records and uniform values (`api`), the light records
//! read by the packer (`light`), the device binding surface (`traits`) and the
//! error types returned when the device rejects a call (`error`).
//!
//! A concrete backend implements [`UniformDevice`]; the lanes and agents use
//! the trait without knowing the underlying graphics API.

pub mod api;
pub mod error;
pub mod light;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::ResourceError;
pub use self::light::{Light, LightId, LightKind, LightShadow, OrthoBounds, ProjectedMap};
pub use self::traits::UniformDevice;
