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

//! Setter selection and the cached device writes behind every leaf.

use super::cache::ValueCache;
use lumina_core::renderer::{
    ResourceError, TextureBinding, UniformDevice, UniformLocation, UniformType, UniformValue,
    UniformWrite,
};

/// How a leaf turns a [`UniformValue`] into device writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetterKind {
    /// `float` and `vecN`, or arrays of them.
    Float {
        /// Components per element.
        components: u8,
    },
    /// `matN`, or arrays of them.
    Matrix {
        /// The matrix dimension.
        dimension: u8,
    },
    /// `int`, `ivecN`, `bool` and `bvecN`, or arrays of them.
    Int {
        /// Components per element.
        components: u8,
    },
    /// `uint` and `uvecN`.
    UInt {
        /// Components per element.
        components: u8,
    },
    /// A single sampler.
    Texture(TextureBinding),
    /// An array of samplers.
    TextureArray(TextureBinding),
}

impl SetterKind {
    /// Number of scalars in one element written by this setter.
    pub fn element_len(self) -> usize {
        match self {
            SetterKind::Float { components }
            | SetterKind::Int { components }
            | SetterKind::UInt { components } => components as usize,
            SetterKind::Matrix { dimension } => (dimension as usize) * (dimension as usize),
            SetterKind::Texture(_) | SetterKind::TextureArray(_) => 1,
        }
    }
}

/// Picks the setter for a declared type.
///
/// `pure_array` selects the whole-array variant. Returns `None` for types the
/// binding layer cannot write; such leaves ignore every value.
pub fn setter_for(ty: UniformType, pure_array: bool) -> Option<SetterKind> {
    use UniformType::*;

    let kind = match ty {
        Float => SetterKind::Float { components: 1 },
        FloatVec2 => SetterKind::Float { components: 2 },
        FloatVec3 => SetterKind::Float { components: 3 },
        FloatVec4 => SetterKind::Float { components: 4 },
        FloatMat2 => SetterKind::Matrix { dimension: 2 },
        FloatMat3 => SetterKind::Matrix { dimension: 3 },
        FloatMat4 => SetterKind::Matrix { dimension: 4 },
        Int | Bool => SetterKind::Int { components: 1 },
        IntVec2 | BoolVec2 => SetterKind::Int { components: 2 },
        IntVec3 | BoolVec3 => SetterKind::Int { components: 3 },
        IntVec4 | BoolVec4 => SetterKind::Int { components: 4 },
        UInt if !pure_array => SetterKind::UInt { components: 1 },
        UIntVec2 if !pure_array => SetterKind::UInt { components: 2 },
        UIntVec3 if !pure_array => SetterKind::UInt { components: 3 },
        UIntVec4 if !pure_array => SetterKind::UInt { components: 4 },
        sampler => {
            let binding = sampler.texture_binding()?;
            if !pure_array {
                SetterKind::Texture(binding)
            } else if matches!(binding, TextureBinding::D2 | TextureBinding::Cube) {
                SetterKind::TextureArray(binding)
            } else {
                return None;
            }
        }
    };
    Some(kind)
}

fn shape_matches(len: usize, element_len: usize, pure_array: bool) -> bool {
    if pure_array {
        len > 0 && len % element_len == 0
    } else {
        len == element_len
    }
}

fn write_cached<T: bytemuck::Pod>(
    device: &dyn UniformDevice,
    location: UniformLocation,
    cache: &mut ValueCache,
    data: &[T],
    write: UniformWrite<'_>,
) -> Result<(), ResourceError> {
    if cache.matches(data) {
        return Ok(());
    }
    device.write_uniform(location, write)?;
    cache.store(data);
    Ok(())
}

/// A leaf's view of the device: where it lives and what it last wrote.
pub(crate) struct LeafTarget<'a> {
    pub location: UniformLocation,
    pub array_size: u32,
    pub pure_array: bool,
    pub cache: &'a mut ValueCache,
}

/// Writes `value` through `kind`, skipping the device when the cache matches.
///
/// A value whose shape does not fit the setter is ignored.
pub(crate) fn apply(
    kind: SetterKind,
    device: &dyn UniformDevice,
    target: LeafTarget<'_>,
    value: &UniformValue,
) -> Result<(), ResourceError> {
    let LeafTarget {
        location,
        array_size,
        pure_array,
        cache,
    } = target;
    let element_len = kind.element_len();

    match kind {
        SetterKind::Float { components } => match value.float_components() {
            Some(data) if shape_matches(data.len(), element_len, pure_array) => {
                let write = UniformWrite::Float { components, data };
                write_cached(device, location, cache, data, write)
            }
            _ => ignore(kind, value),
        },
        SetterKind::Matrix { dimension } => match value.float_components() {
            Some(data) if shape_matches(data.len(), element_len, pure_array) => {
                let write = UniformWrite::Matrix { dimension, data };
                write_cached(device, location, cache, data, write)
            }
            _ => ignore(kind, value),
        },
        SetterKind::Int { components } => match value.int_components() {
            Some(data) if shape_matches(data.len(), element_len, pure_array) => {
                let data: &[i32] = &data;
                let write = UniformWrite::Int { components, data };
                write_cached(device, location, cache, data, write)
            }
            _ => ignore(kind, value),
        },
        SetterKind::UInt { components } => match value.uint_components() {
            Some(data) if shape_matches(data.len(), element_len, pure_array) => {
                let data: &[u32] = &data;
                let write = UniformWrite::UInt { components, data };
                write_cached(device, location, cache, data, write)
            }
            _ => ignore(kind, value),
        },
        SetterKind::Texture(binding) => {
            let Some(textures) = value.textures() else {
                return ignore(kind, value);
            };
            let texture = textures.first().copied().flatten();
            let unit = device.allocate_texture_unit()?;
            let units = [unit as i32];
            let write = UniformWrite::Int {
                components: 1,
                data: &units,
            };
            write_cached(device, location, cache, &units, write)?;
            device.bind_texture(unit, binding, texture)
        }
        SetterKind::TextureArray(binding) => {
            let Some(textures) = value.textures() else {
                return ignore(kind, value);
            };
            let units = (0..array_size)
                .map(|_| device.allocate_texture_unit().map(|unit| unit as i32))
                .collect::<Result<Vec<_>, _>>()?;
            let write = UniformWrite::Int {
                components: 1,
                data: &units,
            };
            write_cached(device, location, cache, &units, write)?;
            for (i, unit) in units.iter().enumerate() {
                let texture = textures.get(i).copied().flatten();
                device.bind_texture(*unit as u32, binding, texture)?;
            }
            Ok(())
        }
    }
}

fn ignore(kind: SetterKind, value: &UniformValue) -> Result<(), ResourceError> {
    log::warn!("Ignoring value {value:?} that does not fit a {kind:?} uniform.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_vector_and_matrix_types() {
        assert_eq!(
            setter_for(UniformType::FloatVec3, false),
            Some(SetterKind::Float { components: 3 })
        );
        assert_eq!(
            setter_for(UniformType::FloatMat4, true),
            Some(SetterKind::Matrix { dimension: 4 })
        );
        assert_eq!(
            setter_for(UniformType::BoolVec2, false),
            Some(SetterKind::Int { components: 2 })
        );
        assert_eq!(
            setter_for(UniformType::UInt, false),
            Some(SetterKind::UInt { components: 1 })
        );
    }

    #[test]
    fn sampler_types() {
        assert_eq!(
            setter_for(UniformType::Sampler2DShadow, false),
            Some(SetterKind::Texture(TextureBinding::D2))
        );
        assert_eq!(
            setter_for(UniformType::Sampler2DArray, false),
            Some(SetterKind::Texture(TextureBinding::D2Array))
        );
        assert_eq!(
            setter_for(UniformType::SamplerCube, true),
            Some(SetterKind::TextureArray(TextureBinding::Cube))
        );
    }

    #[test]
    fn unsupported_types_have_no_setter() {
        assert_eq!(setter_for(UniformType::Unsupported(0xdead), false), None);
        assert_eq!(setter_for(UniformType::UInt, true), None);
        assert_eq!(setter_for(UniformType::Sampler3D, true), None);
    }

    #[test]
    fn element_lengths() {
        assert_eq!(SetterKind::Matrix { dimension: 3 }.element_len(), 9);
        assert_eq!(SetterKind::Int { components: 4 }.element_len(), 4);
        assert_eq!(SetterKind::Texture(TextureBinding::D3).element_len(), 1);
    }
}
