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

//! The packed, versioned light state.

use super::records::*;
use glam::{Mat4, Vec3};
use lumina_core::renderer::{TextureId, UniformValue, UniformValues};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A shared source of light state versions.
///
/// Every packer created from the same source draws from one counter, so two
/// states never report the same version for different shapes. Versions start
/// at 1; a state that has never been packed reports 0.
#[derive(Debug, Clone)]
pub struct LightStateVersions(Arc<AtomicU64>);

impl LightStateVersions {
    /// Creates a new counter.
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(1)))
    }

    /// Draws the next version.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for LightStateVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// The shape of a packed state: slot counts per type and sub-budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightStateHash {
    /// Directional slots.
    pub directional_length: usize,
    /// Point slots.
    pub point_length: usize,
    /// Spot slots.
    pub spot_length: usize,
    /// Rect area slots.
    pub rect_area_length: usize,
    /// Hemisphere slots.
    pub hemi_length: usize,
    /// Directional shadow slots.
    pub num_directional_shadows: usize,
    /// Point shadow slots.
    pub num_point_shadows: usize,
    /// Spot shadow slots.
    pub num_spot_shadows: usize,
    /// Directional projected-map slots.
    pub num_directional_maps: usize,
    /// Spot projected-map slots.
    pub num_spot_maps: usize,
}

impl LightStateHash {
    /// Reads the shape of `state`.
    pub fn of(state: &LightState) -> Self {
        Self {
            directional_length: state.directional.len(),
            point_length: state.point.len(),
            spot_length: state.spot.len(),
            rect_area_length: state.rect_area.len(),
            hemi_length: state.hemi.len(),
            num_directional_shadows: state.directional_shadow.len(),
            num_point_shadows: state.point_shadow.len(),
            num_spot_shadows: state.spot_shadow.len(),
            num_directional_maps: state.directional_map.len(),
            num_spot_maps: state.spot_map.len(),
        }
    }
}

/// Lighting data for one (scene, camera) pair, rebuilt by every packing pass.
///
/// Shadow and map arrays run parallel to their uniform arrays: entry `i` of
/// `spot_shadow_map` belongs to entry `i` of `spot_shadow`. Every array is
/// present even when empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightState {
    /// Bumped whenever the shape changes.
    pub version: u64,
    /// The shape at the last version bump, `None` before the first pass.
    pub hash: Option<LightStateHash>,
    /// Accumulated ambient color.
    pub ambient: [f32; 3],
    /// Accumulated spherical harmonics coefficients.
    pub probe: [Vec3; 9],

    /// Directional light slots.
    pub directional: Vec<DirectionalLightUniforms>,
    /// Directional shadow slots.
    pub directional_shadow: Vec<LightShadowUniforms>,
    /// Shadow maps, parallel to `directional_shadow`.
    pub directional_shadow_map: Vec<Option<TextureId>>,
    /// Shadow matrices, parallel to `directional_shadow`.
    pub directional_shadow_matrix: Vec<Mat4>,
    /// Projected maps of directional lights.
    pub directional_map: Vec<Option<TextureId>>,
    /// Projection matrices, parallel to `directional_map`.
    pub directional_map_matrix: Vec<Mat4>,

    /// Spot light slots.
    pub spot: Vec<SpotLightUniforms>,
    /// Spot shadow slots.
    pub spot_shadow: Vec<LightShadowUniforms>,
    /// Shadow maps, parallel to `spot_shadow`.
    pub spot_shadow_map: Vec<Option<TextureId>>,
    /// Shadow matrices, parallel to `spot_shadow`.
    pub spot_shadow_matrix: Vec<Mat4>,
    /// Projected maps of spot lights.
    pub spot_map: Vec<Option<TextureId>>,
    /// Projection matrices, parallel to `spot_map`.
    pub spot_map_matrix: Vec<Mat4>,

    /// Point light slots.
    pub point: Vec<PointLightUniforms>,
    /// Point shadow slots.
    pub point_shadow: Vec<PointLightShadowUniforms>,
    /// Shadow maps, parallel to `point_shadow`.
    pub point_shadow_map: Vec<Option<TextureId>>,
    /// Shadow matrices, parallel to `point_shadow`.
    pub point_shadow_matrix: Vec<Mat4>,

    /// Hemisphere light slots.
    pub hemi: Vec<HemisphereLightUniforms>,
    /// Rect area light slots.
    pub rect_area: Vec<RectAreaLightUniforms>,
}

impl LightState {
    /// Zeroes the accumulators and empties every array, keeping allocations.
    pub(crate) fn clear(&mut self) {
        self.ambient = [0.0; 3];
        self.probe = [Vec3::ZERO; 9];
        self.directional.clear();
        self.directional_shadow.clear();
        self.directional_shadow_map.clear();
        self.directional_shadow_matrix.clear();
        self.directional_map.clear();
        self.directional_map_matrix.clear();
        self.spot.clear();
        self.spot_shadow.clear();
        self.spot_shadow_map.clear();
        self.spot_shadow_matrix.clear();
        self.spot_map.clear();
        self.spot_map_matrix.clear();
        self.point.clear();
        self.point_shadow.clear();
        self.point_shadow_map.clear();
        self.point_shadow_matrix.clear();
        self.hemi.clear();
        self.rect_area.clear();
    }

    /// Writes the state into `values` under the names lit shaders declare.
    ///
    /// Arrays of structs become [`UniformValue::Array`]s of
    /// [`UniformValue::Struct`]s; map and matrix arrays become flat arrays.
    pub fn write_uniforms(&self, values: &mut UniformValues) {
        fn structs<T>(items: &[T], f: impl Fn(&T) -> UniformValue) -> UniformValue {
            UniformValue::Array(items.iter().map(f).collect())
        }

        values.insert("ambientLightColor", Vec3::from_array(self.ambient));
        values.insert("lightProbe", UniformValue::Vec3Array(self.probe.to_vec()));

        values.insert(
            "directionalLights",
            structs(&self.directional, DirectionalLightUniforms::to_uniform_value),
        );
        values.insert(
            "directionalLightShadows",
            structs(&self.directional_shadow, LightShadowUniforms::to_uniform_value),
        );
        values.insert(
            "directionalShadowMap",
            UniformValue::Textures(self.directional_shadow_map.clone()),
        );
        values.insert(
            "directionalShadowMatrix",
            UniformValue::Mat4Array(self.directional_shadow_matrix.clone()),
        );
        values.insert(
            "directionalLightMap",
            UniformValue::Textures(self.directional_map.clone()),
        );
        values.insert(
            "directionalLightMapMatrix",
            UniformValue::Mat4Array(self.directional_map_matrix.clone()),
        );

        values.insert("spotLights", structs(&self.spot, SpotLightUniforms::to_uniform_value));
        values.insert(
            "spotLightShadows",
            structs(&self.spot_shadow, LightShadowUniforms::to_uniform_value),
        );
        values.insert("spotShadowMap", UniformValue::Textures(self.spot_shadow_map.clone()));
        values.insert(
            "spotShadowMatrix",
            UniformValue::Mat4Array(self.spot_shadow_matrix.clone()),
        );
        values.insert("spotLightMap", UniformValue::Textures(self.spot_map.clone()));
        values.insert(
            "spotLightMapMatrix",
            UniformValue::Mat4Array(self.spot_map_matrix.clone()),
        );

        values.insert("pointLights", structs(&self.point, PointLightUniforms::to_uniform_value));
        values.insert(
            "pointLightShadows",
            structs(&self.point_shadow, PointLightShadowUniforms::to_uniform_value),
        );
        values.insert("pointShadowMap", UniformValue::Textures(self.point_shadow_map.clone()));
        values.insert(
            "pointShadowMatrix",
            UniformValue::Mat4Array(self.point_shadow_matrix.clone()),
        );

        values.insert(
            "hemisphereLights",
            structs(&self.hemi, HemisphereLightUniforms::to_uniform_value),
        );
        values.insert(
            "rectAreaLights",
            structs(&self.rect_area, RectAreaLightUniforms::to_uniform_value),
        );
    }
}
