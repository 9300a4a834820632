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

//! Values that can be assigned to a uniform.
//!
//! A [`UniformValue`] is the CPU-side representation of whatever a caller wants
//! to push into a uniform location. Leaves of the binding tree read it through
//! the flat component accessors; structured nodes walk [`UniformValue::Struct`]
//! and [`UniformValue::Array`] to reach their children.

use super::handles::TextureId;
use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};
use std::borrow::Cow;
use std::collections::HashMap;

/// A value assignable to a uniform.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    UInt(u32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    IVec2(IVec2),
    IVec3(IVec3),
    IVec4(IVec4),
    UVec2(UVec2),
    UVec3(UVec3),
    UVec4(UVec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
    /// A flat float array, already laid out the way the shader expects it.
    Floats(Vec<f32>),
    /// A flat integer array.
    Ints(Vec<i32>),
    Vec2Array(Vec<Vec2>),
    Vec3Array(Vec<Vec3>),
    Vec4Array(Vec<Vec4>),
    Mat2Array(Vec<Mat2>),
    Mat3Array(Vec<Mat3>),
    Mat4Array(Vec<Mat4>),
    /// A texture, or `None` to bind the backend's empty placeholder.
    Texture(Option<TextureId>),
    Textures(Vec<Option<TextureId>>),
    /// Field values for a structured uniform, keyed by member name.
    Struct(HashMap<String, UniformValue>),
    /// Element values for an array of structured uniforms.
    Array(Vec<UniformValue>),
}

fn flat<T: bytemuck::Pod>(values: &[T]) -> &[f32] {
    bytemuck::cast_slice(values)
}

impl UniformValue {
    /// Views the value as a flat run of `f32` components.
    ///
    /// Vectors and matrices (and arrays of them) are reinterpreted without copying.
    pub fn float_components(&self) -> Option<&[f32]> {
        Some(match self {
            UniformValue::Float(v) => std::slice::from_ref(v),
            UniformValue::Vec2(v) => flat(std::slice::from_ref(v)),
            UniformValue::Vec3(v) => flat(std::slice::from_ref(v)),
            UniformValue::Vec4(v) => flat(std::slice::from_ref(v)),
            UniformValue::Mat2(v) => flat(std::slice::from_ref(v)),
            UniformValue::Mat3(v) => flat(std::slice::from_ref(v)),
            UniformValue::Mat4(v) => flat(std::slice::from_ref(v)),
            UniformValue::Floats(v) => v.as_slice(),
            UniformValue::Vec2Array(v) => flat(v),
            UniformValue::Vec3Array(v) => flat(v),
            UniformValue::Vec4Array(v) => flat(v),
            UniformValue::Mat2Array(v) => flat(v),
            UniformValue::Mat3Array(v) => flat(v),
            UniformValue::Mat4Array(v) => flat(v),
            _ => return None,
        })
    }

    /// Views the value as a flat run of `i32` components.
    ///
    /// Booleans are widened to 0 or 1.
    pub fn int_components(&self) -> Option<Cow<'_, [i32]>> {
        Some(match self {
            UniformValue::Int(v) => Cow::Borrowed(std::slice::from_ref(v)),
            UniformValue::Bool(v) => Cow::Owned(vec![i32::from(*v)]),
            UniformValue::IVec2(v) => Cow::Borrowed(bytemuck::cast_slice(std::slice::from_ref(v))),
            UniformValue::IVec3(v) => Cow::Borrowed(bytemuck::cast_slice(std::slice::from_ref(v))),
            UniformValue::IVec4(v) => Cow::Borrowed(bytemuck::cast_slice(std::slice::from_ref(v))),
            UniformValue::Ints(v) => Cow::Borrowed(v.as_slice()),
            _ => return None,
        })
    }

    /// Views the value as a flat run of `u32` components.
    pub fn uint_components(&self) -> Option<Cow<'_, [u32]>> {
        Some(match self {
            UniformValue::UInt(v) => Cow::Borrowed(std::slice::from_ref(v)),
            UniformValue::Bool(v) => Cow::Owned(vec![u32::from(*v)]),
            UniformValue::UVec2(v) => Cow::Borrowed(bytemuck::cast_slice(std::slice::from_ref(v))),
            UniformValue::UVec3(v) => Cow::Borrowed(bytemuck::cast_slice(std::slice::from_ref(v))),
            UniformValue::UVec4(v) => Cow::Borrowed(bytemuck::cast_slice(std::slice::from_ref(v))),
            _ => return None,
        })
    }

    /// Views the value as a list of texture handles.
    pub fn textures(&self) -> Option<&[Option<TextureId>]> {
        match self {
            UniformValue::Texture(t) => Some(std::slice::from_ref(t)),
            UniformValue::Textures(t) => Some(t.as_slice()),
            _ => None,
        }
    }

    /// Returns a named field of a [`UniformValue::Struct`].
    pub fn field(&self, name: &str) -> Option<&UniformValue> {
        match self {
            UniformValue::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Returns an element of a [`UniformValue::Array`].
    pub fn element(&self, index: usize) -> Option<&UniformValue> {
        match self {
            UniformValue::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Builds a [`UniformValue::Struct`] from `(name, value)` pairs.
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, UniformValue)>,
    {
        UniformValue::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    f32 => Float,
    i32 => Int,
    u32 => UInt,
    bool => Bool,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    IVec2 => IVec2,
    IVec3 => IVec3,
    IVec4 => IVec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
    Option<TextureId> => Texture,
}

impl From<TextureId> for UniformValue {
    fn from(value: TextureId) -> Self {
        UniformValue::Texture(Some(value))
    }
}

/// A value together with its upload policy.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformEntry {
    /// The value to upload.
    pub value: UniformValue,
    /// `Some(false)` suppresses the upload; anything else writes.
    pub needs_update: Option<bool>,
}

impl UniformEntry {
    /// Returns `true` unless the entry explicitly opted out of the upload.
    pub fn should_upload(&self) -> bool {
        self.needs_update != Some(false)
    }
}

/// A name-keyed set of uniform values, as consumed by a bulk upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformValues {
    entries: HashMap<String, UniformEntry>,
}

impl UniformValues {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a value with no upload flag and returns its entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> &mut UniformEntry {
        let entry = UniformEntry {
            value: value.into(),
            needs_update: None,
        };
        match self.entries.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                slot.insert(entry);
                slot.into_mut()
            }
            std::collections::hash_map::Entry::Vacant(slot) => slot.insert(entry),
        }
    }

    /// Returns the entry for `name`.
    pub fn get(&self, name: &str) -> Option<&UniformEntry> {
        self.entries.get(name)
    }

    /// Returns the entry for `name` mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut UniformEntry> {
        self.entries.get_mut(name)
    }

    /// Returns `true` if a value is present for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An object exposing optional named properties that may feed a uniform.
pub trait UniformProperties {
    /// Returns the property called `name`, or `None` if it is not defined.
    fn property(&self, name: &str) -> Option<&UniformValue>;
}

impl UniformProperties for HashMap<String, UniformValue> {
    fn property(&self, name: &str) -> Option<&UniformValue> {
        self.get(name)
    }
}

impl UniformProperties for UniformValues {
    fn property(&self, name: &str) -> Option<&UniformValue> {
        self.get(name).map(|entry| &entry.value)
    }
}
