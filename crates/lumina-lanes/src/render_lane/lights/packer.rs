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

use super::config::{LightPackerConfig, LightSortFn, StaticLightConfig};
use super::records::*;
use super::state::{LightState, LightStateHash, LightStateVersions};
use glam::{Mat4, Vec3};
use lumina_core::renderer::{Light, LightKind, LightShadow, OrthoBounds, ProjectedMap};
use lumina_core::CameraView;
use std::cmp::Ordering;
use std::fmt;

/// Packs an unordered light list into fixed-capacity, shader-visible slots.
///
/// Each [`setup`](Self::setup) rebuilds the owned [`LightState`] in place.
/// The state's version changes only when a slot count changes; values that
/// move from frame to frame update without a version bump.
pub struct LightPacker {
    static_config: Option<StaticLightConfig>,
    sort: Option<LightSortFn>,
    versions: LightStateVersions,
    state: LightState,
}

impl LightPacker {
    /// Creates a packer drawing versions from `versions`.
    pub fn new(config: LightPackerConfig, versions: LightStateVersions) -> Self {
        Self {
            static_config: config.static_config,
            sort: config.sort,
            versions,
            state: LightState::default(),
        }
    }

    /// The fixed capacities, if any.
    pub fn static_config(&self) -> Option<&StaticLightConfig> {
        self.static_config.as_ref()
    }

    /// The state produced by the last pass.
    pub fn state(&self) -> &LightState {
        &self.state
    }

    /// Sorts `lights` in place, packs them for `camera` and returns the state.
    ///
    /// Every light's `light_in_use` and `shadow_in_use` flags are rewritten.
    /// `shadows` is the list of shadow casters collected for the frame; slot
    /// admission reads the lights' own `cast_shadow` flags instead.
    pub fn setup(&mut self, lights: &mut [Light], shadows: &[Light], camera: &CameraView) -> &LightState {
        match &self.sort {
            Some(sort) => lights.sort_by(|a, b| sort(camera, a, b)),
            None => lights.sort_by(shadow_casters_first),
        }

        let config = self.static_config.as_ref();
        let state = &mut self.state;
        state.clear();

        let view = camera.world_inverse;
        let mut ambient = Vec3::ZERO;

        for light in lights.iter_mut() {
            light.light_in_use = false;
            light.shadow_in_use = false;
            let color = light.color * light.intensity;

            match light.kind {
                LightKind::Ambient => {
                    ambient += color;
                    light.light_in_use = true;
                }
                LightKind::Probe { sh } => {
                    for (sum, coefficient) in state.probe.iter_mut().zip(sh) {
                        *sum += coefficient * light.intensity;
                    }
                    light.light_in_use = true;
                }
                LightKind::Directional { target, map } => {
                    if !admits(config, state.directional.len(), |c| c.directional) {
                        continue;
                    }
                    let mut uniforms = DirectionalLightUniforms {
                        direction: transform_direction(&view, light.position() - target),
                        color,
                        map: NO_MAP,
                    };

                    if light.cast_shadow
                        && admits(config, state.directional_shadow.len(), |c| c.directional_shadows)
                    {
                        let shadow = light.shadow.unwrap_or_default();
                        state.directional_shadow.push(LightShadowUniforms::from(&shadow));
                        state.directional_shadow_map.push(shadow.map);
                        state.directional_shadow_matrix.push(shadow.matrix);
                        light.shadow_in_use = true;
                    }

                    if let Some(map) = map {
                        if admits(config, state.directional_map.len(), |c| c.directional_maps) {
                            uniforms.map = state.directional_map.len() as i32;
                            state.directional_map.push(Some(map.texture));
                            state
                                .directional_map_matrix
                                .push(directional_map_matrix(light, &map, camera));
                        }
                    }

                    state.directional.push(uniforms);
                    light.light_in_use = true;
                }
                LightKind::Spot {
                    target,
                    distance,
                    angle,
                    penumbra,
                    decay,
                    map,
                } => {
                    if !admits(config, state.spot.len(), |c| c.spot) {
                        continue;
                    }
                    let mut uniforms = SpotLightUniforms {
                        position: view.transform_point3(light.position()),
                        direction: transform_direction(&view, light.position() - target),
                        color,
                        map: NO_MAP,
                        distance,
                        cone_cos: angle.cos(),
                        penumbra_cos: (angle * (1.0 - penumbra)).cos(),
                        decay,
                    };

                    if light.cast_shadow && admits(config, state.spot_shadow.len(), |c| c.spot_shadows) {
                        let shadow = light.shadow.unwrap_or_default();
                        state.spot_shadow.push(LightShadowUniforms::from(&shadow));
                        state.spot_shadow_map.push(shadow.map);
                        state.spot_shadow_matrix.push(shadow.matrix);
                        light.shadow_in_use = true;
                    }

                    if let Some(map) = map {
                        if admits(config, state.spot_map.len(), |c| c.spot_maps) {
                            uniforms.map = state.spot_map.len() as i32;
                            state.spot_map.push(Some(map.texture));
                            state
                                .spot_map_matrix
                                .push(spot_map_matrix(light, angle, camera));
                        }
                    }

                    state.spot.push(uniforms);
                    light.light_in_use = true;
                }
                LightKind::RectArea { width, height } => {
                    if !admits(config, state.rect_area.len(), |c| c.rect_area) {
                        continue;
                    }
                    let local = view * light.world;
                    state.rect_area.push(RectAreaLightUniforms {
                        color,
                        position: view.transform_point3(light.position()),
                        half_width: local.x_axis.truncate().normalize_or_zero() * (width * 0.5),
                        half_height: local.y_axis.truncate().normalize_or_zero() * (height * 0.5),
                    });
                    light.light_in_use = true;
                }
                LightKind::Point { distance, decay } => {
                    if !admits(config, state.point.len(), |c| c.point) {
                        continue;
                    }
                    if light.cast_shadow && admits(config, state.point_shadow.len(), |c| c.point_shadows) {
                        let shadow = light.shadow.unwrap_or_default();
                        state.point_shadow.push(PointLightShadowUniforms::from(&shadow));
                        state.point_shadow_map.push(shadow.map);
                        state.point_shadow_matrix.push(shadow.matrix);
                        light.shadow_in_use = true;
                    }
                    state.point.push(PointLightUniforms {
                        position: view.transform_point3(light.position()),
                        color,
                        distance,
                        decay,
                    });
                    light.light_in_use = true;
                }
                LightKind::Hemisphere { ground_color } => {
                    if !admits(config, state.hemi.len(), |c| c.hemi) {
                        continue;
                    }
                    state.hemi.push(HemisphereLightUniforms {
                        direction: transform_direction(&view, light.position()),
                        sky_color: color,
                        ground_color: ground_color * light.intensity,
                    });
                    light.light_in_use = true;
                }
            }
        }

        state.ambient = ambient.to_array();

        if let Some(config) = config {
            pad_state(state, config);
        }

        let hash = LightStateHash::of(state);
        if state.hash != Some(hash) {
            state.hash = Some(hash);
            state.version = self.versions.next();
            log::trace!(
                "Light state shape changed to {hash:?}, version {} ({} lights, {} shadow casters).",
                state.version,
                lights.len(),
                shadows.len()
            );
        }

        &self.state
    }
}

impl fmt::Debug for LightPacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightPacker")
            .field("static_config", &self.static_config)
            .field("custom_sort", &self.sort.is_some())
            .field("version", &self.state.version)
            .finish()
    }
}

fn shadow_casters_first(a: &Light, b: &Light) -> Ordering {
    b.cast_shadow.cmp(&a.cast_shadow)
}

fn admits(
    config: Option<&StaticLightConfig>,
    count: usize,
    capacity: impl Fn(&StaticLightConfig) -> usize,
) -> bool {
    config.map_or(true, |c| count < capacity(c))
}

/// Rotates `direction` into view space and normalizes it.
fn transform_direction(view: &Mat4, direction: Vec3) -> Vec3 {
    view.transform_vector3(direction).normalize_or_zero()
}

fn directional_map_matrix(light: &Light, map: &ProjectedMap, camera: &CameraView) -> Mat4 {
    let shadow: Option<&LightShadow> = light.shadow.as_ref();
    let bounds = map
        .dimension
        .or_else(|| shadow.and_then(|s| s.camera.frustum))
        .unwrap_or_default();
    let light_view = shadow.map_or_else(|| light.world.inverse(), |s| s.camera.world_inverse);
    orthographic(bounds) * light_view * camera.world
}

fn orthographic(bounds: OrthoBounds) -> Mat4 {
    Mat4::orthographic_rh_gl(bounds.left, bounds.right, bounds.bottom, bounds.top, 1.0, 10.0)
}

fn spot_map_matrix(light: &Light, angle: f32, camera: &CameraView) -> Mat4 {
    Mat4::perspective_rh_gl(2.0 * angle, 1.0, 1.0, 10.0) * light.world.inverse() * camera.world
}

fn pad_state(state: &mut LightState, config: &StaticLightConfig) {
    fn pad<T: Clone>(items: &mut Vec<T>, len: usize, value: T) {
        if items.len() < len {
            items.resize(len, value);
        }
    }

    pad(&mut state.directional, config.directional, DirectionalLightUniforms::dummy());
    pad(&mut state.directional_shadow, config.directional_shadows, LightShadowUniforms::default());
    pad(&mut state.directional_shadow_map, config.directional_shadows, None);
    pad(&mut state.directional_shadow_matrix, config.directional_shadows, Mat4::IDENTITY);
    pad(&mut state.directional_map, config.directional_maps, None);
    pad(&mut state.directional_map_matrix, config.directional_maps, Mat4::IDENTITY);

    pad(&mut state.spot, config.spot, SpotLightUniforms::dummy());
    pad(&mut state.spot_shadow, config.spot_shadows, LightShadowUniforms::default());
    pad(&mut state.spot_shadow_map, config.spot_shadows, None);
    pad(&mut state.spot_shadow_matrix, config.spot_shadows, Mat4::IDENTITY);
    pad(&mut state.spot_map, config.spot_maps, None);
    pad(&mut state.spot_map_matrix, config.spot_maps, Mat4::IDENTITY);

    pad(&mut state.point, config.point, PointLightUniforms::dummy());
    pad(&mut state.point_shadow, config.point_shadows, PointLightShadowUniforms::default());
    pad(&mut state.point_shadow_map, config.point_shadows, None);
    pad(&mut state.point_shadow_matrix, config.point_shadows, Mat4::IDENTITY);

    pad(&mut state.hemi, config.hemi, HemisphereLightUniforms::dummy());
    pad(&mut state.rect_area, config.rect_area, RectAreaLightUniforms::dummy());
}
