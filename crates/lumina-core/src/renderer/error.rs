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

//! Defines the error types returned by the device binding layer.
//!
//! The pipelines themselves never fail on policy grounds: a block or uniform
//! missing from a program, or a type without a setter, is a silent no-op. The
//! only errors that travel through them are the ones a device call reports.

use crate::renderer::api::{BufferId, ProgramId};
use std::fmt;

/// An error related to a device call made on behalf of a uniform or block.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// The program handle is not known to the device.
    InvalidProgram(ProgramId),
    /// The buffer handle is not known to the device.
    InvalidBuffer(BufferId),
    /// An upload would have gone past the end of a buffer.
    OutOfBounds {
        /// The buffer being written.
        buffer: BufferId,
        /// The first byte written.
        offset: u64,
        /// The number of bytes written.
        len: u64,
    },
    /// The device ran out of texture units for the current draw call.
    TextureUnitsExhausted,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidProgram(id) => write!(f, "Invalid program handle: {id:?}"),
            ResourceError::InvalidBuffer(id) => write!(f, "Invalid buffer handle: {id:?}"),
            ResourceError::OutOfBounds {
                buffer,
                offset,
                len,
            } => write!(
                f,
                "Write of {len} bytes at offset {offset} is out of bounds for {buffer:?}"
            ),
            ResourceError::TextureUnitsExhausted => {
                write!(f, "No texture unit left for the current draw call.")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}
