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

use glam::{Mat4, Vec3};

/// The camera data the pipelines read each frame.
///
/// `world` is the camera's world transform and `world_inverse` its view
/// matrix. Both are kept so light-space matrices can be composed without
/// inverting on the hot path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// The projection matrix.
    pub projection: Mat4,
    /// The camera's world transform.
    pub world: Mat4,
    /// The inverse of `world` (the view matrix).
    pub world_inverse: Mat4,
    /// `true` for orthographic projections.
    pub orthographic: bool,
}

impl CameraView {
    /// Creates a view from a projection and a world transform.
    pub fn new(projection: Mat4, world: Mat4, orthographic: bool) -> Self {
        Self {
            projection,
            world,
            world_inverse: world.inverse(),
            orthographic,
        }
    }

    /// The camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn view_matrix_is_inverse_of_world() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let view = CameraView::new(Mat4::IDENTITY, world, false);

        let origin = view.world_inverse.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(origin.length(), 0.0);
        assert_eq!(view.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
