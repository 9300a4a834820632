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

use glam::Vec3;

/// Scene fog, one variant per falloff model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fog {
    /// Fog growing linearly between two view distances.
    Linear {
        /// Linear RGB fog color.
        color: Vec3,
        /// Distance at which fog starts.
        near: f32,
        /// Distance at which fog is opaque.
        far: f32,
    },
    /// Exponential-squared fog.
    Exp2 {
        /// Linear RGB fog color.
        color: Vec3,
        /// Density of the fog.
        density: f32,
    },
}

impl Fog {
    /// The fog color, shared by every variant.
    pub fn color(&self) -> Vec3 {
        match self {
            Fog::Linear { color, .. } | Fog::Exp2 { color, .. } => *color,
        }
    }
}
