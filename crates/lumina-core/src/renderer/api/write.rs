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

//! The payloads handed to [`UniformDevice::write_uniform`].
//!
//! [`UniformDevice::write_uniform`]: crate::renderer::traits::UniformDevice::write_uniform

/// A single device write for one uniform location.
///
/// `data` may hold several elements for array uniforms; `components` is the
/// number of components per element (1 for scalars, 2 to 4 for vectors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformWrite<'a> {
    /// `uniform{1..4}fv`.
    Float {
        /// Components per element.
        components: u8,
        /// Flattened element data.
        data: &'a [f32],
    },
    /// `uniform{1..4}iv`, also used for booleans and texture units.
    Int {
        /// Components per element.
        components: u8,
        /// Flattened element data.
        data: &'a [i32],
    },
    /// `uniform{1..4}uiv`.
    UInt {
        /// Components per element.
        components: u8,
        /// Flattened element data.
        data: &'a [u32],
    },
    /// `uniformMatrix{2,3,4}fv`, column-major, never transposed.
    Matrix {
        /// The matrix dimension (2, 3 or 4).
        dimension: u8,
        /// Flattened column-major data.
        data: &'a [f32],
    },
}

impl UniformWrite<'_> {
    /// Number of scalar values carried by this write.
    pub fn len(&self) -> usize {
        match self {
            UniformWrite::Float { data, .. } | UniformWrite::Matrix { data, .. } => data.len(),
            UniformWrite::Int { data, .. } => data.len(),
            UniformWrite::UInt { data, .. } => data.len(),
        }
    }

    /// Returns `true` when the write carries no data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
