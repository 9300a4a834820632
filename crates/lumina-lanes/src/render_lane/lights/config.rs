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

//! Capacity budgets and ordering for the light packer.

use lumina_core::renderer::Light;
use lumina_core::CameraView;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Fixed per-type slot capacities.
///
/// When a packer has a static configuration, every light type is bounded by
/// its field and every slot array is padded up to it, so shaders declaring
/// fixed-length arrays always receive fully populated data. Fields left out
/// of a RON description default to 0, which admits nothing of that type.
///
/// ```
/// use lumina_lanes::render_lane::StaticLightConfig;
///
/// let config = StaticLightConfig::from_ron_str("(directional: 2, directional_shadows: 1)").unwrap();
/// assert_eq!(config.directional, 2);
/// assert_eq!(config.point, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticLightConfig {
    /// Directional light slots.
    pub directional: usize,
    /// Directional shadow slots.
    pub directional_shadows: usize,
    /// Directional projected-map slots.
    pub directional_maps: usize,
    /// Spot light slots.
    pub spot: usize,
    /// Spot shadow slots.
    pub spot_shadows: usize,
    /// Spot projected-map slots.
    pub spot_maps: usize,
    /// Point light slots.
    pub point: usize,
    /// Point shadow slots.
    pub point_shadows: usize,
    /// Hemisphere light slots.
    pub hemi: usize,
    /// Rect area light slots.
    pub rect_area: usize,
}

impl StaticLightConfig {
    /// Parses a configuration from RON.
    pub fn from_ron_str(source: &str) -> Result<Self, LightConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Serializes the configuration to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, LightConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}

/// An error raised while reading or writing a [`StaticLightConfig`].
#[derive(Debug, Error)]
pub enum LightConfigError {
    /// The RON source is malformed or has fields of the wrong type.
    #[error("invalid light configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The configuration could not be serialized.
    #[error("failed to serialize light configuration: {0}")]
    Serialize(#[from] ron::Error),
}

/// A custom light ordering. Receives the camera and two lights.
pub type LightSortFn = Arc<dyn Fn(&CameraView, &Light, &Light) -> Ordering + Send + Sync>;

/// Everything a render state needs to build its packer.
#[derive(Clone, Default)]
pub struct LightPackerConfig {
    /// Fixed capacities, or `None` for unbounded packing without padding.
    pub static_config: Option<StaticLightConfig>,
    /// Custom ordering, or `None` to place shadow casters first.
    pub sort: Option<LightSortFn>,
}

impl LightPackerConfig {
    /// Unbounded packing with the default ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every light type by `config`.
    pub fn with_static(mut self, config: StaticLightConfig) -> Self {
        self.static_config = Some(config);
        self
    }

    /// Orders lights with `sort` instead of placing shadow casters first.
    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(&CameraView, &Light, &Light) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(sort));
        self
    }
}

impl fmt::Debug for LightPackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightPackerConfig")
            .field("static_config", &self.static_config)
            .field("sort", &self.sort.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let config = StaticLightConfig::from_ron_str("(spot: 4, spot_maps: 1)").unwrap();
        assert_eq!(
            config,
            StaticLightConfig {
                spot: 4,
                spot_maps: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn ron_round_trip() {
        let config = StaticLightConfig {
            directional: 2,
            point: 8,
            point_shadows: 2,
            ..Default::default()
        };
        let text = config.to_ron_string().unwrap();
        assert_eq!(StaticLightConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_ron_is_an_error() {
        let err = StaticLightConfig::from_ron_str("(directional: \"two\")").unwrap_err();
        assert!(matches!(err, LightConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid light configuration"));
    }

    #[test]
    fn debug_hides_the_comparator() {
        let config = LightPackerConfig::new().with_sort(|_, _, _| Ordering::Equal);
        assert!(format!("{config:?}").contains("<custom>"));
    }
}
