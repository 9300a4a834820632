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

//! Defines light records for the rendering system.
//!
//! Lights reach the binding layer as extracted value records: the scene graph
//! resolves transforms and targets beforehand, and the packer in `lumina-lanes`
//! reads the record, computes view-space uniforms from it and writes back the
//! two transient usage flags.

use crate::renderer::api::TextureId;
use glam::{Mat4, Vec2, Vec3};
use uuid::Uuid;

/// A stable identity for a light across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(pub Uuid);

impl LightId {
    /// Creates a new random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LightId {
    fn default() -> Self {
        Self::new()
    }
}

/// Orthographic bounds of a light-space projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    /// Left plane.
    pub left: f32,
    /// Right plane.
    pub right: f32,
    /// Top plane.
    pub top: f32,
    /// Bottom plane.
    pub bottom: f32,
}

impl OrthoBounds {
    /// Symmetric bounds of half-extent `half` on both axes.
    pub fn symmetric(half: f32) -> Self {
        Self {
            left: -half,
            right: half,
            top: half,
            bottom: -half,
        }
    }
}

impl Default for OrthoBounds {
    fn default() -> Self {
        Self::symmetric(5.0)
    }
}

/// The camera a shadow map is rendered from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    /// Inverse of the shadow camera's world transform.
    pub world_inverse: Mat4,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Orthographic frustum, for cameras of directional lights.
    pub frustum: Option<OrthoBounds>,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            world_inverse: Mat4::IDENTITY,
            near: 0.5,
            far: 500.0,
            frustum: None,
        }
    }
}

/// Shadow parameters of a shadow-casting light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightShadow {
    /// Depth bias applied when sampling the shadow map.
    pub bias: f32,
    /// Bias applied along the surface normal.
    pub normal_bias: f32,
    /// Filter radius.
    pub radius: f32,
    /// Shadow map resolution in texels.
    pub map_size: Vec2,
    /// The camera the map is rendered from.
    pub camera: ShadowCamera,
    /// The rendered shadow map, once allocated.
    pub map: Option<TextureId>,
    /// World-to-shadow-map transform.
    pub matrix: Mat4,
}

impl Default for LightShadow {
    fn default() -> Self {
        Self {
            bias: 0.0,
            normal_bias: 0.0,
            radius: 1.0,
            map_size: Vec2::new(512.0, 512.0),
            camera: ShadowCamera::default(),
            map: None,
            matrix: Mat4::IDENTITY,
        }
    }
}

/// A texture projected by a directional or spot light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedMap {
    /// The projected texture.
    pub texture: TextureId,
    /// Explicit orthographic extent for directional projection.
    ///
    /// When `None`, the shadow camera's frustum is used.
    pub dimension: Option<OrthoBounds>,
}

/// Type-specific parameters of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light added to every surface.
    Ambient,
    /// Spherical harmonics irradiance probe with 9 coefficients.
    Probe {
        /// The SH coefficients, one RGB triple per band.
        sh: [Vec3; 9],
    },
    /// Infinitely distant light shining from its position towards `target`.
    Directional {
        /// World-space position of the target.
        target: Vec3,
        /// Optional projected texture.
        map: Option<ProjectedMap>,
    },
    /// Cone light shining from its position towards `target`.
    Spot {
        /// World-space position of the target.
        target: Vec3,
        /// Maximum range, 0 for unbounded.
        distance: f32,
        /// Half-angle of the cone in radians.
        angle: f32,
        /// Fraction of the cone that is attenuated, in `[0, 1]`.
        penumbra: f32,
        /// Distance falloff exponent.
        decay: f32,
        /// Optional projected texture.
        map: Option<ProjectedMap>,
    },
    /// Omnidirectional light.
    Point {
        /// Maximum range, 0 for unbounded.
        distance: f32,
        /// Distance falloff exponent.
        decay: f32,
    },
    /// Rectangular area light facing down its local -Z axis.
    RectArea {
        /// Width in local X.
        width: f32,
        /// Height in local Y.
        height: f32,
    },
    /// Sky/ground gradient light. `color` is the sky color.
    Hemisphere {
        /// The ground color.
        ground_color: Vec3,
    },
}

/// An extracted light, as seen by the light packer.
///
/// # Examples
///
/// ```
/// use lumina_core::renderer::light::{Light, LightShadow};
/// use glam::Vec3;
///
/// let sun = Light::directional(Vec3::new(1.0, 0.95, 0.8), 2.0)
///     .at(Vec3::new(10.0, 20.0, 5.0))
///     .with_shadow(LightShadow::default());
/// assert!(sun.cast_shadow);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Stable identity.
    pub id: LightId,
    /// Linear RGB color.
    pub color: Vec3,
    /// Intensity multiplier applied to `color`.
    pub intensity: f32,
    /// World transform.
    pub world: Mat4,
    /// Whether the light requests a shadow slot.
    pub cast_shadow: bool,
    /// Shadow parameters, if the light has any.
    pub shadow: Option<LightShadow>,
    /// Type-specific parameters.
    pub kind: LightKind,
    /// Set by the packer when the light contributes to lighting this frame.
    pub light_in_use: bool,
    /// Set by the packer when the light occupies a shadow slot this frame.
    pub shadow_in_use: bool,
}

impl Light {
    /// Creates a light of the given kind at the origin.
    pub fn new(kind: LightKind, color: Vec3, intensity: f32) -> Self {
        Self {
            id: LightId::new(),
            color,
            intensity,
            world: Mat4::IDENTITY,
            cast_shadow: false,
            shadow: None,
            kind,
            light_in_use: false,
            shadow_in_use: false,
        }
    }

    /// An ambient light.
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self::new(LightKind::Ambient, color, intensity)
    }

    /// A light probe. `color` is unused by probes and set to white.
    pub fn probe(sh: [Vec3; 9], intensity: f32) -> Self {
        Self::new(LightKind::Probe { sh }, Vec3::ONE, intensity)
    }

    /// A directional light aimed at the origin.
    pub fn directional(color: Vec3, intensity: f32) -> Self {
        Self::new(
            LightKind::Directional {
                target: Vec3::ZERO,
                map: None,
            },
            color,
            intensity,
        )
    }

    /// A spot light aimed at the origin with a 60 degree half-angle.
    pub fn spot(color: Vec3, intensity: f32) -> Self {
        Self::new(
            LightKind::Spot {
                target: Vec3::ZERO,
                distance: 0.0,
                angle: std::f32::consts::FRAC_PI_3,
                penumbra: 0.0,
                decay: 2.0,
                map: None,
            },
            color,
            intensity,
        )
    }

    /// An unbounded point light.
    pub fn point(color: Vec3, intensity: f32) -> Self {
        Self::new(
            LightKind::Point {
                distance: 0.0,
                decay: 2.0,
            },
            color,
            intensity,
        )
    }

    /// A rectangular area light.
    pub fn rect_area(color: Vec3, intensity: f32, width: f32, height: f32) -> Self {
        Self::new(LightKind::RectArea { width, height }, color, intensity)
    }

    /// A hemisphere light.
    pub fn hemisphere(sky_color: Vec3, ground_color: Vec3, intensity: f32) -> Self {
        Self::new(LightKind::Hemisphere { ground_color }, sky_color, intensity)
    }

    /// Places the light at `position`, keeping the rest of its world transform.
    pub fn at(mut self, position: Vec3) -> Self {
        self.world.w_axis = position.extend(1.0);
        self
    }

    /// Replaces the world transform.
    pub fn with_world(mut self, world: Mat4) -> Self {
        self.world = world;
        self
    }

    /// Attaches shadow parameters and enables shadow casting.
    pub fn with_shadow(mut self, shadow: LightShadow) -> Self {
        self.shadow = Some(shadow);
        self.cast_shadow = true;
        self
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// The shadow map texture, if the light has a rendered shadow map.
    pub fn shadow_map(&self) -> Option<TextureId> {
        self.shadow.as_ref().and_then(|s| s.map)
    }

    /// The projected map of a directional or spot light.
    pub fn projected_map(&self) -> Option<&ProjectedMap> {
        match &self.kind {
            LightKind::Directional { map, .. } | LightKind::Spot { map, .. } => map.as_ref(),
            _ => None,
        }
    }
}
