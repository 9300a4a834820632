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

//! Reflection records reported by a device for a linked program.

use super::handles::UniformLocation;

/// The texture target a sampler uniform reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureBinding {
    /// A 2D texture.
    D2,
    /// A 3D texture.
    D3,
    /// A cube map.
    Cube,
    /// A 2D texture array.
    D2Array,
}

/// The declared type of an active uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum UniformType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    UInt,
    UIntVec2,
    UIntVec3,
    UIntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Sampler2D,
    Sampler2DShadow,
    SamplerExternal,
    IntSampler2D,
    UIntSampler2D,
    Sampler3D,
    IntSampler3D,
    UIntSampler3D,
    SamplerCube,
    SamplerCubeShadow,
    IntSamplerCube,
    UIntSamplerCube,
    Sampler2DArray,
    Sampler2DArrayShadow,
    IntSampler2DArray,
    UIntSampler2DArray,
    /// A type the binding layer has no setter for, carrying the raw backend enum.
    Unsupported(u32),
}

impl UniformType {
    /// Maps an OpenGL ES 3.0 type enum to a `UniformType`.
    ///
    /// Unknown values map to [`UniformType::Unsupported`].
    pub fn from_gl(raw: u32) -> Self {
        match raw {
            0x1406 => Self::Float,
            0x8b50 => Self::FloatVec2,
            0x8b51 => Self::FloatVec3,
            0x8b52 => Self::FloatVec4,
            0x1404 => Self::Int,
            0x8b53 => Self::IntVec2,
            0x8b54 => Self::IntVec3,
            0x8b55 => Self::IntVec4,
            0x1405 => Self::UInt,
            0x8dc6 => Self::UIntVec2,
            0x8dc7 => Self::UIntVec3,
            0x8dc8 => Self::UIntVec4,
            0x8b56 => Self::Bool,
            0x8b57 => Self::BoolVec2,
            0x8b58 => Self::BoolVec3,
            0x8b59 => Self::BoolVec4,
            0x8b5a => Self::FloatMat2,
            0x8b5b => Self::FloatMat3,
            0x8b5c => Self::FloatMat4,
            0x8b5e => Self::Sampler2D,
            0x8b62 => Self::Sampler2DShadow,
            0x8d66 => Self::SamplerExternal,
            0x8dca => Self::IntSampler2D,
            0x8dd2 => Self::UIntSampler2D,
            0x8b5f => Self::Sampler3D,
            0x8dcb => Self::IntSampler3D,
            0x8dd3 => Self::UIntSampler3D,
            0x8b60 => Self::SamplerCube,
            0x8dc5 => Self::SamplerCubeShadow,
            0x8dcc => Self::IntSamplerCube,
            0x8dd4 => Self::UIntSamplerCube,
            0x8dc1 => Self::Sampler2DArray,
            0x8dc4 => Self::Sampler2DArrayShadow,
            0x8dcf => Self::IntSampler2DArray,
            0x8dd7 => Self::UIntSampler2DArray,
            other => Self::Unsupported(other),
        }
    }

    /// Returns the texture target for sampler types, `None` otherwise.
    pub fn texture_binding(self) -> Option<TextureBinding> {
        use UniformType::*;
        match self {
            Sampler2D | Sampler2DShadow | SamplerExternal | IntSampler2D | UIntSampler2D => {
                Some(TextureBinding::D2)
            }
            Sampler3D | IntSampler3D | UIntSampler3D => Some(TextureBinding::D3),
            SamplerCube | SamplerCubeShadow | IntSamplerCube | UIntSamplerCube => {
                Some(TextureBinding::Cube)
            }
            Sampler2DArray | Sampler2DArrayShadow | IntSampler2DArray | UIntSampler2DArray => {
                Some(TextureBinding::D2Array)
            }
            _ => None,
        }
    }
}

/// One active uniform as reported by [`UniformDevice::query_active_uniforms`].
///
/// [`UniformDevice::query_active_uniforms`]: crate::renderer::traits::UniformDevice::query_active_uniforms
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveUniformInfo {
    /// The full reflected name, e.g. `pointLights[0].color` or `boneMatrices[0]`.
    pub name: String,
    /// The declared type.
    pub ty: UniformType,
    /// The declared array length, 1 for non-arrays.
    pub array_size: u32,
    /// The device location, `None` when the uniform lives inside a block.
    pub location: Option<UniformLocation>,
}

/// Byte layout of a single member of a uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlockMember {
    /// The member name as declared in the block.
    pub name: String,
    /// Byte offset of the member from the start of the block.
    pub offset: u32,
    /// Byte stride between array elements, 0 for non-arrays.
    pub stride: u32,
}

/// Layout of a uniform block as declared by one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlockInfo {
    /// The block index within the program.
    pub index: u32,
    /// Total data size of the block in bytes.
    pub byte_size: u32,
    /// The members of the block.
    pub members: Vec<UniformBlockMember>,
}

impl UniformBlockInfo {
    /// Finds a member by name.
    pub fn member(&self, name: &str) -> Option<&UniformBlockMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_gl_known_and_unknown() {
        assert_eq!(UniformType::from_gl(0x8b5c), UniformType::FloatMat4);
        assert_eq!(UniformType::from_gl(0x8b60), UniformType::SamplerCube);
        assert_eq!(UniformType::from_gl(0x1234), UniformType::Unsupported(0x1234));
    }

    #[test]
    fn texture_binding_for_samplers() {
        assert_eq!(
            UniformType::Sampler2DShadow.texture_binding(),
            Some(TextureBinding::D2)
        );
        assert_eq!(
            UniformType::UIntSampler3D.texture_binding(),
            Some(TextureBinding::D3)
        );
        assert_eq!(UniformType::FloatVec3.texture_binding(), None);
    }
}
