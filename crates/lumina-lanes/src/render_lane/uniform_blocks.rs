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

//! Shared uniform buffers for the blocks every program may declare.
//!
//! A block is identified by its name and byte size. Programs that agree on
//! both share one device buffer and one binding index, on the assumption
//! that their member layouts are identical. Two declarations with the same
//! name and size but different member layouts will receive wrong offsets;
//! this is a known limitation of the key.

use crate::render_lane::lights::LightState;
use ahash::AHashMap;
use lumina_core::renderer::{BufferId, ProgramId, ResourceError, UniformBlockInfo, UniformDevice};
use lumina_core::{CameraView, Fog};

/// Block carrying the camera matrices and position.
pub const CAMERA_BLOCK: &str = "CameraBlock";
/// Block carrying the fog parameters.
pub const FOG_BLOCK: &str = "FogBlock";
/// Block carrying ambient and probe lighting.
pub const LIGHT_BLOCK: &str = "LightBlock";
/// Every block a program is queried for, in binding order.
pub const KNOWN_BLOCKS: [&str; 3] = [CAMERA_BLOCK, FOG_BLOCK, LIGHT_BLOCK];

/// Byte placement of one block member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMemberLayout {
    /// Byte offset from the start of the block.
    pub offset: u32,
    /// Byte stride between array elements.
    pub stride: u32,
}

/// One program's declaration of a shared block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramBlock {
    name: String,
    index: u32,
    byte_size: u32,
    members: AHashMap<String, BlockMemberLayout>,
}

impl ProgramBlock {
    fn from_info(name: &str, info: &UniformBlockInfo) -> Self {
        let members = info
            .members
            .iter()
            .map(|m| {
                (
                    m.name.clone(),
                    BlockMemberLayout {
                        offset: m.offset,
                        stride: m.stride,
                    },
                )
            })
            .collect();
        Self {
            name: name.to_string(),
            index: info.index,
            byte_size: info.byte_size,
            members,
        }
    }

    /// The block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The block index within the program.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The data size in bytes.
    pub fn byte_size(&self) -> u32 {
        self.byte_size
    }

    /// The layout of a member.
    pub fn member(&self, name: &str) -> Option<BlockMemberLayout> {
        self.members.get(name).copied()
    }

    /// The registry key: name followed by byte size.
    pub fn key(&self) -> String {
        block_key(&self.name, self.byte_size)
    }
}

fn block_key(name: &str, byte_size: u32) -> String {
    format!("{name}{byte_size}")
}

/// A device buffer shared by every program declaring the same block.
#[derive(Debug)]
pub struct SharedUniformBlock {
    binding: u32,
    buffer: BufferId,
    byte_size: usize,
    data: Vec<f32>,
}

impl SharedUniformBlock {
    fn new(binding: u32, buffer: BufferId, byte_size: u32) -> Self {
        let byte_size = byte_size as usize;
        Self {
            binding,
            buffer,
            byte_size,
            data: vec![0.0; byte_size.div_ceil(4)],
        }
    }

    /// The binding index shared by every program using this block.
    pub fn binding(&self) -> u32 {
        self.binding
    }

    /// The device buffer.
    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// The CPU-side contents, as uploaded.
    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<f32, u8>(&self.data)[..self.byte_size]
    }

    /// The CPU-side contents as floats.
    pub fn floats(&self) -> &[f32] {
        &self.data
    }

    fn write_floats(&mut self, offset: u32, values: &[f32]) {
        let start = (offset / 4) as usize;
        let end = start + values.len();
        if offset % 4 != 0 || end * 4 > self.byte_size {
            log::warn!(
                "Skipping block write of {} floats at byte {offset}: block is {} bytes.",
                values.len(),
                self.byte_size
            );
            return;
        }
        self.data[start..end].copy_from_slice(values);
    }

    fn write_u32(&mut self, offset: u32, value: u32) {
        let start = offset as usize;
        let byte_size = self.byte_size;
        let bytes = bytemuck::cast_slice_mut::<f32, u8>(&mut self.data);
        match bytes.get_mut(start..start + 4) {
            Some(slot) if start + 4 <= byte_size => slot.copy_from_slice(&value.to_ne_bytes()),
            _ => log::warn!("Skipping block write of a u32 at byte {offset}: block is {byte_size} bytes."),
        }
    }

    fn upload(&self, device: &dyn UniformDevice) -> Result<(), ResourceError> {
        device.upload_buffer_range(self.buffer, 0, self.bytes())
    }
}

/// The table of shared uniform blocks for one device context.
///
/// Created alongside the context and torn down with [`dispose`](Self::dispose).
/// Binding indices are handed out from a counter in creation order.
#[derive(Debug, Default)]
pub struct UniformBlockRegistry {
    blocks: AHashMap<String, SharedUniformBlock>,
    next_binding_index: u32,
}

impl UniformBlockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries `program` for the block `name` and binds it to its shared buffer.
    ///
    /// The shared buffer is created on first sight of its `(name, size)` key.
    /// Returns `Ok(None)` when the program does not declare the block.
    pub fn parse_block(
        &mut self,
        device: &dyn UniformDevice,
        program: ProgramId,
        name: &str,
    ) -> Result<Option<ProgramBlock>, ResourceError> {
        let Some(info) = device.query_uniform_block(program, name)? else {
            return Ok(None);
        };
        let block = ProgramBlock::from_info(name, &info);
        let key = block.key();

        let binding = match self.blocks.get(&key) {
            Some(shared) => shared.binding,
            None => {
                let buffer = device.create_buffer(u64::from(info.byte_size), Some(&key))?;
                let binding = self.next_binding_index;
                device.bind_buffer_to_index(buffer, binding)?;
                self.next_binding_index += 1;
                log::debug!(
                    "Created shared uniform block `{key}` ({} bytes) at binding {binding}.",
                    info.byte_size
                );
                self.blocks
                    .insert(key, SharedUniformBlock::new(binding, buffer, info.byte_size));
                binding
            }
        };

        device.bind_uniform_block(program, block.index, binding)?;
        Ok(Some(block))
    }

    /// The shared block for a registry key.
    pub fn get(&self, key: &str) -> Option<&SharedUniformBlock> {
        self.blocks.get(key)
    }

    /// The shared block a program declaration maps to.
    pub fn shared(&self, block: &ProgramBlock) -> Option<&SharedUniformBlock> {
        self.blocks.get(&block.key())
    }

    /// Number of distinct shared blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no block has been created.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The binding index the next new block will receive.
    pub fn next_binding_index(&self) -> u32 {
        self.next_binding_index
    }

    /// Packs the camera into its block and uploads it.
    ///
    /// Members: `projectionMatrix`, `viewMatrix`, `cameraPosition`, `isOrthographic`.
    pub fn write_camera(
        &mut self,
        device: &dyn UniformDevice,
        block: &ProgramBlock,
        camera: &CameraView,
    ) -> Result<(), ResourceError> {
        let Some(shared) = self.blocks.get_mut(&block.key()) else {
            return Ok(());
        };
        if let Some(m) = block.member("projectionMatrix") {
            shared.write_floats(m.offset, &camera.projection.to_cols_array());
        }
        if let Some(m) = block.member("viewMatrix") {
            shared.write_floats(m.offset, &camera.world_inverse.to_cols_array());
        }
        if let Some(m) = block.member("cameraPosition") {
            shared.write_floats(m.offset, &camera.position().to_array());
        }
        if let Some(m) = block.member("isOrthographic") {
            shared.write_u32(m.offset, u32::from(camera.orthographic));
        }
        shared.upload(device)
    }

    /// Packs the fog into its block and uploads it.
    ///
    /// `fogColor` is always written; linear fog writes `fogNear` and `fogFar`,
    /// exponential fog writes `fogDensity`.
    pub fn write_fog(
        &mut self,
        device: &dyn UniformDevice,
        block: &ProgramBlock,
        fog: &Fog,
    ) -> Result<(), ResourceError> {
        let Some(shared) = self.blocks.get_mut(&block.key()) else {
            return Ok(());
        };
        if let Some(m) = block.member("fogColor") {
            shared.write_floats(m.offset, &fog.color().to_array());
        }
        match *fog {
            Fog::Linear { near, far, .. } => {
                if let Some(m) = block.member("fogNear") {
                    shared.write_floats(m.offset, &[near]);
                }
                if let Some(m) = block.member("fogFar") {
                    shared.write_floats(m.offset, &[far]);
                }
            }
            Fog::Exp2 { density, .. } => {
                if let Some(m) = block.member("fogDensity") {
                    shared.write_floats(m.offset, &[density]);
                }
            }
        }
        shared.upload(device)
    }

    /// Packs ambient color and the 9 probe coefficients into their block and uploads it.
    pub fn write_lights(
        &mut self,
        device: &dyn UniformDevice,
        block: &ProgramBlock,
        lights: &LightState,
    ) -> Result<(), ResourceError> {
        let Some(shared) = self.blocks.get_mut(&block.key()) else {
            return Ok(());
        };
        if let Some(m) = block.member("ambientLightColor") {
            shared.write_floats(m.offset, &lights.ambient);
        }
        if let Some(m) = block.member("lightProbe[0]") {
            for (i, coefficient) in lights.probe.iter().enumerate() {
                shared.write_floats(m.offset + i as u32 * m.stride, &coefficient.to_array());
            }
        }
        shared.upload(device)
    }

    /// Destroys every shared buffer and resets the binding counter.
    ///
    /// Programs parsed before this call must be parsed again.
    pub fn dispose(&mut self, device: &dyn UniformDevice) -> Result<(), ResourceError> {
        let mut result = Ok(());
        for (key, shared) in self.blocks.drain() {
            log::debug!("Destroying shared uniform block `{key}`.");
            if let Err(err) = device.destroy_buffer(shared.buffer) {
                log::error!("Failed to destroy uniform block `{key}`: {err}");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        self.next_binding_index = 0;
        result
    }
}
