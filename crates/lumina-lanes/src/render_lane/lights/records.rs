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

//! Per-slot uniform records emitted by the packer.
//!
//! Each record converts to the struct value its shader declaration expects,
//! so a packed state can be fed straight into a program's uniform tree.

use glam::{Vec2, Vec3};
use lumina_core::renderer::{LightShadow, UniformValue};

/// Map index written into a light's uniform when it has no projected map slot.
pub const NO_MAP: i32 = -1;

/// Uniforms of one directional light slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLightUniforms {
    /// View-space direction from the target towards the light.
    pub direction: Vec3,
    /// Color scaled by intensity.
    pub color: Vec3,
    /// Projected-map slot, or [`NO_MAP`].
    pub map: i32,
}

impl DirectionalLightUniforms {
    /// A zero-color padding record.
    pub fn dummy() -> Self {
        Self {
            direction: Vec3::ZERO,
            color: Vec3::ZERO,
            map: NO_MAP,
        }
    }

    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("direction", UniformValue::Vec3(self.direction)),
            ("color", UniformValue::Vec3(self.color)),
            ("map", UniformValue::Int(self.map)),
        ])
    }
}

/// Uniforms of one spot light slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLightUniforms {
    /// View-space position.
    pub position: Vec3,
    /// View-space direction from the target towards the light.
    pub direction: Vec3,
    /// Color scaled by intensity.
    pub color: Vec3,
    /// Projected-map slot, or [`NO_MAP`].
    pub map: i32,
    /// Maximum range.
    pub distance: f32,
    /// Cosine of the cone half-angle.
    pub cone_cos: f32,
    /// Cosine of the angle where the penumbra starts.
    pub penumbra_cos: f32,
    /// Distance falloff exponent.
    pub decay: f32,
}

impl SpotLightUniforms {
    /// A zero-color padding record.
    pub fn dummy() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            color: Vec3::ZERO,
            map: NO_MAP,
            distance: 0.0,
            cone_cos: 0.0,
            penumbra_cos: 0.0,
            decay: 0.0,
        }
    }

    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("position", UniformValue::Vec3(self.position)),
            ("direction", UniformValue::Vec3(self.direction)),
            ("color", UniformValue::Vec3(self.color)),
            ("map", UniformValue::Int(self.map)),
            ("distance", UniformValue::Float(self.distance)),
            ("coneCos", UniformValue::Float(self.cone_cos)),
            ("penumbraCos", UniformValue::Float(self.penumbra_cos)),
            ("decay", UniformValue::Float(self.decay)),
        ])
    }
}

/// Uniforms of one point light slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointLightUniforms {
    /// View-space position.
    pub position: Vec3,
    /// Color scaled by intensity.
    pub color: Vec3,
    /// Maximum range.
    pub distance: f32,
    /// Distance falloff exponent.
    pub decay: f32,
}

impl PointLightUniforms {
    /// A zero-color padding record.
    pub fn dummy() -> Self {
        Self::default()
    }

    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("position", UniformValue::Vec3(self.position)),
            ("color", UniformValue::Vec3(self.color)),
            ("distance", UniformValue::Float(self.distance)),
            ("decay", UniformValue::Float(self.decay)),
        ])
    }
}

/// Uniforms of one hemisphere light slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HemisphereLightUniforms {
    /// Normalized view-space up direction.
    pub direction: Vec3,
    /// Sky color scaled by intensity.
    pub sky_color: Vec3,
    /// Ground color scaled by intensity.
    pub ground_color: Vec3,
}

impl HemisphereLightUniforms {
    /// A zero-color padding record.
    pub fn dummy() -> Self {
        Self::default()
    }

    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("direction", UniformValue::Vec3(self.direction)),
            ("skyColor", UniformValue::Vec3(self.sky_color)),
            ("groundColor", UniformValue::Vec3(self.ground_color)),
        ])
    }
}

/// Uniforms of one rect area light slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectAreaLightUniforms {
    /// Color scaled by intensity.
    pub color: Vec3,
    /// View-space center.
    pub position: Vec3,
    /// View-space vector from the center to the right edge.
    pub half_width: Vec3,
    /// View-space vector from the center to the top edge.
    pub half_height: Vec3,
}

impl RectAreaLightUniforms {
    /// A zero-color padding record.
    pub fn dummy() -> Self {
        Self::default()
    }

    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("color", UniformValue::Vec3(self.color)),
            ("position", UniformValue::Vec3(self.position)),
            ("halfWidth", UniformValue::Vec3(self.half_width)),
            ("halfHeight", UniformValue::Vec3(self.half_height)),
        ])
    }
}

/// Shadow uniforms of a directional or spot shadow slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightShadowUniforms {
    /// Depth bias.
    pub bias: f32,
    /// Normal bias.
    pub normal_bias: f32,
    /// Filter radius.
    pub radius: f32,
    /// Map resolution.
    pub map_size: Vec2,
}

impl Default for LightShadowUniforms {
    fn default() -> Self {
        Self {
            bias: 0.0,
            normal_bias: 0.0,
            radius: 1.0,
            map_size: Vec2::ZERO,
        }
    }
}

impl From<&LightShadow> for LightShadowUniforms {
    fn from(shadow: &LightShadow) -> Self {
        Self {
            bias: shadow.bias,
            normal_bias: shadow.normal_bias,
            radius: shadow.radius,
            map_size: shadow.map_size,
        }
    }
}

impl LightShadowUniforms {
    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("shadowBias", UniformValue::Float(self.bias)),
            ("shadowNormalBias", UniformValue::Float(self.normal_bias)),
            ("shadowRadius", UniformValue::Float(self.radius)),
            ("shadowMapSize", UniformValue::Vec2(self.map_size)),
        ])
    }
}

/// Shadow uniforms of a point shadow slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightShadowUniforms {
    /// Depth bias.
    pub bias: f32,
    /// Normal bias.
    pub normal_bias: f32,
    /// Filter radius.
    pub radius: f32,
    /// Map resolution.
    pub map_size: Vec2,
    /// Near plane of the cube shadow camera.
    pub camera_near: f32,
    /// Far plane of the cube shadow camera.
    pub camera_far: f32,
}

impl Default for PointLightShadowUniforms {
    fn default() -> Self {
        Self {
            bias: 0.0,
            normal_bias: 0.0,
            radius: 1.0,
            map_size: Vec2::ZERO,
            camera_near: 1.0,
            camera_far: 1000.0,
        }
    }
}

impl From<&LightShadow> for PointLightShadowUniforms {
    fn from(shadow: &LightShadow) -> Self {
        Self {
            bias: shadow.bias,
            normal_bias: shadow.normal_bias,
            radius: shadow.radius,
            map_size: shadow.map_size,
            camera_near: shadow.camera.near,
            camera_far: shadow.camera.far,
        }
    }
}

impl PointLightShadowUniforms {
    /// The shader struct value.
    pub fn to_uniform_value(&self) -> UniformValue {
        UniformValue::structure([
            ("shadowBias", UniformValue::Float(self.bias)),
            ("shadowNormalBias", UniformValue::Float(self.normal_bias)),
            ("shadowRadius", UniformValue::Float(self.radius)),
            ("shadowMapSize", UniformValue::Vec2(self.map_size)),
            ("shadowCameraNear", UniformValue::Float(self.camera_near)),
            ("shadowCameraFar", UniformValue::Float(self.camera_far)),
        ])
    }
}
