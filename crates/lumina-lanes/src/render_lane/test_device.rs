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

//! A recording [`UniformDevice`] for unit tests.

use lumina_core::renderer::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeviceCall {
    WriteFloat {
        location: u32,
        components: u8,
        data: Vec<f32>,
    },
    WriteInt {
        location: u32,
        components: u8,
        data: Vec<i32>,
    },
    WriteUInt {
        location: u32,
        components: u8,
        data: Vec<u32>,
    },
    WriteMatrix {
        location: u32,
        dimension: u8,
        data: Vec<f32>,
    },
    BindTexture {
        unit: u32,
        binding: TextureBinding,
        texture: Option<TextureId>,
    },
    CreateBuffer {
        buffer: BufferId,
        byte_size: u64,
    },
    Upload {
        buffer: BufferId,
        offset: u64,
        data: Vec<u8>,
    },
    BindBufferToIndex {
        buffer: BufferId,
        index: u32,
    },
    BindUniformBlock {
        program: ProgramId,
        block_index: u32,
        binding: u32,
    },
    DestroyBuffer(BufferId),
}

impl DeviceCall {
    pub(crate) fn is_uniform_write(&self) -> bool {
        matches!(
            self,
            DeviceCall::WriteFloat { .. }
                | DeviceCall::WriteInt { .. }
                | DeviceCall::WriteUInt { .. }
                | DeviceCall::WriteMatrix { .. }
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    uniforms: Mutex<HashMap<ProgramId, Vec<ActiveUniformInfo>>>,
    blocks: Mutex<HashMap<(ProgramId, String), UniformBlockInfo>>,
    calls: Mutex<Vec<DeviceCall>>,
    next_unit: AtomicU32,
    next_buffer: AtomicUsize,
}

impl RecordingDevice {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_program(self, program: ProgramId, uniforms: Vec<ActiveUniformInfo>) -> Self {
        self.uniforms.lock().unwrap().insert(program, uniforms);
        self
    }

    pub(crate) fn with_block(self, program: ProgramId, name: &str, info: UniformBlockInfo) -> Self {
        self.uniforms.lock().unwrap().entry(program).or_default();
        self.blocks
            .lock()
            .unwrap()
            .insert((program, name.to_string()), info);
        self
    }

    pub(crate) fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn take_calls(&self) -> Vec<DeviceCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub(crate) fn uniform_writes(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_uniform_write())
            .count()
    }

    /// Starts a new draw call: texture units are handed out from 0 again.
    pub(crate) fn reset_texture_units(&self) {
        self.next_unit.store(0, Ordering::Relaxed);
    }

    fn record(&self, call: DeviceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl UniformDevice for RecordingDevice {
    fn query_active_uniforms(
        &self,
        program: ProgramId,
    ) -> Result<Vec<ActiveUniformInfo>, ResourceError> {
        self.uniforms
            .lock()
            .unwrap()
            .get(&program)
            .cloned()
            .ok_or(ResourceError::InvalidProgram(program))
    }

    fn query_uniform_block(
        &self,
        program: ProgramId,
        name: &str,
    ) -> Result<Option<UniformBlockInfo>, ResourceError> {
        Ok(self
            .blocks
            .lock()
            .unwrap()
            .get(&(program, name.to_string()))
            .cloned())
    }

    fn write_uniform(
        &self,
        location: UniformLocation,
        write: UniformWrite<'_>,
    ) -> Result<(), ResourceError> {
        let location = location.0;
        self.record(match write {
            UniformWrite::Float { components, data } => DeviceCall::WriteFloat {
                location,
                components,
                data: data.to_vec(),
            },
            UniformWrite::Int { components, data } => DeviceCall::WriteInt {
                location,
                components,
                data: data.to_vec(),
            },
            UniformWrite::UInt { components, data } => DeviceCall::WriteUInt {
                location,
                components,
                data: data.to_vec(),
            },
            UniformWrite::Matrix { dimension, data } => DeviceCall::WriteMatrix {
                location,
                dimension,
                data: data.to_vec(),
            },
        });
        Ok(())
    }

    fn allocate_texture_unit(&self) -> Result<u32, ResourceError> {
        let unit = self.next_unit.fetch_add(1, Ordering::Relaxed);
        if unit >= 16 {
            return Err(ResourceError::TextureUnitsExhausted);
        }
        Ok(unit)
    }

    fn bind_texture(
        &self,
        unit: u32,
        binding: TextureBinding,
        texture: Option<TextureId>,
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::BindTexture {
            unit,
            binding,
            texture,
        });
        Ok(())
    }

    fn create_buffer(&self, byte_size: u64, _label: Option<&str>) -> Result<BufferId, ResourceError> {
        let buffer = BufferId(self.next_buffer.fetch_add(1, Ordering::Relaxed) + 1);
        self.record(DeviceCall::CreateBuffer { buffer, byte_size });
        Ok(buffer)
    }

    fn upload_buffer_range(
        &self,
        buffer: BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::Upload {
            buffer,
            offset,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn bind_buffer_to_index(&self, buffer: BufferId, index: u32) -> Result<(), ResourceError> {
        self.record(DeviceCall::BindBufferToIndex { buffer, index });
        Ok(())
    }

    fn bind_uniform_block(
        &self,
        program: ProgramId,
        block_index: u32,
        binding: u32,
    ) -> Result<(), ResourceError> {
        self.record(DeviceCall::BindUniformBlock {
            program,
            block_index,
            binding,
        });
        Ok(())
    }

    fn destroy_buffer(&self, buffer: BufferId) -> Result<(), ResourceError> {
        self.record(DeviceCall::DestroyBuffer(buffer));
        Ok(())
    }
}

pub(crate) fn uniform(name: &str, ty: UniformType, array_size: u32, location: u32) -> ActiveUniformInfo {
    ActiveUniformInfo {
        name: name.to_string(),
        ty,
        array_size,
        location: Some(UniformLocation(location)),
    }
}

pub(crate) fn block(index: u32, byte_size: u32, members: &[(&str, u32, u32)]) -> UniformBlockInfo {
    UniformBlockInfo {
        index,
        byte_size,
        members: members
            .iter()
            .map(|&(name, offset, stride)| UniformBlockMember {
                name: name.to_string(),
                offset,
                stride,
            })
            .collect(),
    }
}
