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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The device binding surface consumed by uniform trees and block registries.
///
/// Implementations wrap a concrete graphics context. Methods take `&self`;
/// backends that need to mutate state use interior mutability.
pub trait UniformDevice: Send + Sync + Debug {
    /// Lists the active uniforms of a linked program.
    /// ## Errors
    /// * `ResourceError::InvalidProgram` - If the program is not known to the device.
    fn query_active_uniforms(&self, program: ProgramId)
        -> Result<Vec<ActiveUniformInfo>, ResourceError>;

    /// Queries the layout of a uniform block declared by `program`.
    ///
    /// Returns `Ok(None)` when the program does not declare the block.
    fn query_uniform_block(
        &self,
        program: ProgramId,
        name: &str,
    ) -> Result<Option<UniformBlockInfo>, ResourceError>;

    /// Writes a scalar, vector or matrix value to a uniform location.
    fn write_uniform(
        &self,
        location: UniformLocation,
        write: UniformWrite<'_>,
    ) -> Result<(), ResourceError>;

    /// Allocates the next free texture unit for the current draw call.
    /// ## Errors
    /// * `ResourceError::TextureUnitsExhausted` - If every unit is taken.
    fn allocate_texture_unit(&self) -> Result<u32, ResourceError>;

    /// Binds a texture to a unit. `None` binds the empty placeholder for `binding`.
    fn bind_texture(
        &self,
        unit: u32,
        binding: TextureBinding,
        texture: Option<TextureId>,
    ) -> Result<(), ResourceError>;

    /// Creates a uniform buffer of `byte_size` bytes.
    fn create_buffer(&self, byte_size: u64, label: Option<&str>) -> Result<BufferId, ResourceError>;

    /// Uploads `data` into `buffer` starting at byte `offset`.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the range does not fit in the buffer.
    fn upload_buffer_range(
        &self,
        buffer: BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError>;

    /// Binds a uniform buffer to a binding index.
    fn bind_buffer_to_index(&self, buffer: BufferId, index: u32) -> Result<(), ResourceError>;

    /// Points a program's block declaration at a binding index.
    fn bind_uniform_block(
        &self,
        program: ProgramId,
        block_index: u32,
        binding: u32,
    ) -> Result<(), ResourceError>;

    /// Destroys a uniform buffer.
    fn destroy_buffer(&self, buffer: BufferId) -> Result<(), ResourceError>;
}
