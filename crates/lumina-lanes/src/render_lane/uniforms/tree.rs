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

//! The per-program uniform tree.

use super::cache::ValueCache;
use super::path::{parse_uniform_path, UniformKey, UniformPath, UniformPathError};
use super::setter::{self, setter_for, LeafTarget, SetterKind};
use crate::render_lane::lights::LightState;
use crate::render_lane::uniform_blocks::{
    ProgramBlock, UniformBlockRegistry, CAMERA_BLOCK, FOG_BLOCK, KNOWN_BLOCKS, LIGHT_BLOCK,
};
use ahash::AHashMap;
use lumina_core::renderer::{
    ActiveUniformInfo, ProgramId, ResourceError, UniformDevice, UniformLocation,
    UniformProperties, UniformType, UniformValue, UniformValues,
};
use lumina_core::{CameraView, Fog};

/// A bottom-level uniform bound to a single device location.
#[derive(Debug)]
pub struct LeafUniform {
    key: UniformKey,
    ty: UniformType,
    array_size: u32,
    location: UniformLocation,
    setter: Option<SetterKind>,
    cache: ValueCache,
}

impl LeafUniform {
    fn new(key: UniformKey, info: &ActiveUniformInfo, location: UniformLocation, pure: bool) -> Self {
        Self {
            key,
            ty: info.ty,
            array_size: info.array_size.max(1),
            location,
            setter: setter_for(info.ty, pure),
            cache: ValueCache::new(),
        }
    }

    /// The key of this leaf within its parent.
    pub fn key(&self) -> &UniformKey {
        &self.key
    }

    /// The declared type.
    pub fn ty(&self) -> UniformType {
        self.ty
    }

    /// The declared array length, 1 for non-arrays.
    pub fn array_size(&self) -> u32 {
        self.array_size
    }

    /// The device location.
    pub fn location(&self) -> UniformLocation {
        self.location
    }

    /// The setter, `None` for unsupported types.
    pub fn setter(&self) -> Option<SetterKind> {
        self.setter
    }

    /// The last value written to the device.
    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    fn set(
        &mut self,
        device: &dyn UniformDevice,
        value: &UniformValue,
        pure_array: bool,
    ) -> Result<(), ResourceError> {
        let Some(kind) = self.setter else {
            return Ok(());
        };
        let target = LeafTarget {
            location: self.location,
            array_size: self.array_size,
            pure_array,
            cache: &mut self.cache,
        };
        setter::apply(kind, device, target, value)
    }
}

/// An interior node grouping the members or elements of a struct uniform.
#[derive(Debug)]
pub struct StructuredUniform {
    key: UniformKey,
    children: UniformContainer,
}

impl StructuredUniform {
    fn new(key: UniformKey) -> Self {
        Self {
            key,
            children: UniformContainer::default(),
        }
    }

    /// The key of this node within its parent.
    pub fn key(&self) -> &UniformKey {
        &self.key
    }

    /// The children of this node.
    pub fn children(&self) -> &UniformContainer {
        &self.children
    }
}

/// A node of the uniform tree.
#[derive(Debug)]
pub enum UniformNode {
    /// A scalar, vector, matrix or sampler.
    Single(LeafUniform),
    /// A whole bottom-level array written with one call.
    PureArray(LeafUniform),
    /// A struct, or an array of structs, with one child per member or element.
    Structured(StructuredUniform),
}

impl UniformNode {
    /// The key of this node within its parent.
    pub fn key(&self) -> &UniformKey {
        match self {
            UniformNode::Single(leaf) | UniformNode::PureArray(leaf) => &leaf.key,
            UniformNode::Structured(node) => &node.key,
        }
    }

    /// Writes `value` into this node.
    ///
    /// Structured nodes hand each child the matching field or element of
    /// `value`; children without a counterpart are left untouched.
    pub fn set_value(
        &mut self,
        device: &dyn UniformDevice,
        value: &UniformValue,
    ) -> Result<(), ResourceError> {
        match self {
            UniformNode::Single(leaf) => leaf.set(device, value, false),
            UniformNode::PureArray(leaf) => leaf.set(device, value, true),
            UniformNode::Structured(node) => {
                for child in node.children.seq.iter_mut() {
                    let member = match child.key() {
                        UniformKey::Name(name) => value.field(name),
                        UniformKey::Index(index) => value.element(*index),
                    };
                    if let Some(member) = member {
                        child.set_value(device, member)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// An ordered set of sibling nodes with keyed lookup.
#[derive(Debug, Default)]
pub struct UniformContainer {
    seq: Vec<UniformNode>,
    by_name: AHashMap<String, usize>,
    by_index: AHashMap<usize, usize>,
}

impl UniformContainer {
    /// The nodes in declaration order.
    pub fn nodes(&self) -> &[UniformNode] {
        &self.seq
    }

    /// Looks up a named child.
    pub fn get(&self, name: &str) -> Option<&UniformNode> {
        self.by_name.get(name).map(|&i| &self.seq[i])
    }

    /// Looks up a child by key.
    pub fn get_key(&self, key: &UniformKey) -> Option<&UniformNode> {
        self.position(key).map(|i| &self.seq[i])
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Returns `true` if there are no children.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Adds one reflected uniform to the tree.
    ///
    /// Interior nodes along the path are reused when they already exist.
    /// Uniforms without a location are skipped.
    pub fn parse_uniform(&mut self, info: &ActiveUniformInfo) -> Result<(), UniformPathError> {
        let Some(location) = info.location else {
            return Ok(());
        };
        let path = parse_uniform_path(&info.name)?;
        self.insert_path(path, info, location);
        Ok(())
    }

    fn insert_path(&mut self, path: UniformPath, info: &ActiveUniformInfo, location: UniformLocation) {
        let Some((leaf_key, parents)) = path.segments.split_last() else {
            return;
        };
        let mut container: &mut UniformContainer = self;
        for key in parents {
            container = match container.structured_child(key) {
                Some(children) => children,
                None => {
                    log::warn!(
                        "Uniform `{}` nests under `{key}`, which is already a leaf.",
                        info.name
                    );
                    return;
                }
            };
        }
        let leaf = LeafUniform::new(leaf_key.clone(), info, location, path.pure_array);
        container.insert(if path.pure_array {
            UniformNode::PureArray(leaf)
        } else {
            UniformNode::Single(leaf)
        });
    }

    fn position(&self, key: &UniformKey) -> Option<usize> {
        match key {
            UniformKey::Name(name) => self.by_name.get(name.as_str()).copied(),
            UniformKey::Index(index) => self.by_index.get(index).copied(),
        }
    }

    fn insert(&mut self, node: UniformNode) -> usize {
        if let Some(i) = self.position(node.key()) {
            self.seq[i] = node;
            return i;
        }
        let i = self.seq.len();
        match node.key() {
            UniformKey::Name(name) => {
                self.by_name.insert(name.clone(), i);
            }
            UniformKey::Index(index) => {
                self.by_index.insert(*index, i);
            }
        }
        self.seq.push(node);
        i
    }

    fn structured_child(&mut self, key: &UniformKey) -> Option<&mut UniformContainer> {
        let i = match self.position(key) {
            Some(i) => i,
            None => self.insert(UniformNode::Structured(StructuredUniform::new(key.clone()))),
        };
        match &mut self.seq[i] {
            UniformNode::Structured(node) => Some(&mut node.children),
            _ => None,
        }
    }
}

/// Positions of top-level uniforms, as returned by [`ProgramUniforms::seq_with_value`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformSequence(Vec<usize>);

impl UniformSequence {
    /// Number of uniforms in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The uniform tree and block layouts of one linked program.
///
/// Built once per program; every leaf keeps the last value it wrote so
/// repeated assignments of the same value never reach the device.
#[derive(Debug)]
pub struct ProgramUniforms {
    program: ProgramId,
    root: UniformContainer,
    blocks: AHashMap<&'static str, ProgramBlock>,
}

impl ProgramUniforms {
    /// Reflects `program` and builds its uniform tree.
    ///
    /// The known blocks (`CameraBlock`, `FogBlock`, `LightBlock`) are bound
    /// through `registry` first. Uniforms with malformed names are skipped.
    pub fn new(
        device: &dyn UniformDevice,
        program: ProgramId,
        registry: &mut UniformBlockRegistry,
    ) -> Result<Self, ResourceError> {
        let mut blocks = AHashMap::new();
        for name in KNOWN_BLOCKS {
            if let Some(block) = registry.parse_block(device, program, name)? {
                blocks.insert(name, block);
            }
        }

        let mut root = UniformContainer::default();
        for info in device.query_active_uniforms(program)? {
            if let Err(err) = root.parse_uniform(&info) {
                log::warn!("Skipping uniform of {program:?}: {err}");
            }
        }

        log::debug!(
            "Built uniform tree for {:?}: {} top-level uniforms, {} blocks.",
            program,
            root.len(),
            blocks.len()
        );

        Ok(Self {
            program,
            root,
            blocks,
        })
    }

    /// The program this tree was built for.
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// The top-level uniforms.
    pub fn root(&self) -> &UniformContainer {
        &self.root
    }

    /// Returns `true` if the program declares the block called `name`.
    pub fn has_block(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// The layout of a declared block.
    pub fn block(&self, name: &str) -> Option<&ProgramBlock> {
        self.blocks.get(name)
    }

    /// Sets a top-level uniform by name. A name the program does not declare is a no-op.
    pub fn set_value(
        &mut self,
        device: &dyn UniformDevice,
        name: &str,
        value: &UniformValue,
    ) -> Result<(), ResourceError> {
        match self.root.by_name.get(name) {
            Some(&i) => self.root.seq[i].set_value(device, value),
            None => Ok(()),
        }
    }

    /// Sets a top-level uniform from the property of the same name, if defined.
    pub fn set_optional(
        &mut self,
        device: &dyn UniformDevice,
        object: &dyn UniformProperties,
        name: &str,
    ) -> Result<(), ResourceError> {
        match object.property(name) {
            Some(value) => self.set_value(device, name, value),
            None => Ok(()),
        }
    }

    /// All top-level uniforms in declaration order.
    pub fn sequence(&self) -> UniformSequence {
        UniformSequence((0..self.root.len()).collect())
    }

    /// The top-level uniforms that have an entry in `values`.
    pub fn seq_with_value(&self, values: &UniformValues) -> UniformSequence {
        let positions = self
            .root
            .seq
            .iter()
            .enumerate()
            .filter(|(_, node)| match node.key() {
                UniformKey::Name(name) => values.contains(name),
                UniformKey::Index(_) => false,
            })
            .map(|(i, _)| i)
            .collect();
        UniformSequence(positions)
    }

    /// Writes every uniform of `seq` whose entry does not opt out with `needs_update: Some(false)`.
    pub fn upload(
        &mut self,
        device: &dyn UniformDevice,
        seq: &UniformSequence,
        values: &UniformValues,
    ) -> Result<(), ResourceError> {
        for &i in &seq.0 {
            let Some(node) = self.root.seq.get_mut(i) else {
                continue;
            };
            let UniformKey::Name(name) = node.key() else {
                continue;
            };
            let Some(entry) = values.get(name) else {
                continue;
            };
            if entry.should_upload() {
                node.set_value(device, &entry.value)?;
            }
        }
        Ok(())
    }

    /// Writes the camera into `CameraBlock`. Returns `false` if the program does not declare it.
    pub fn set_camera_block(
        &self,
        device: &dyn UniformDevice,
        registry: &mut UniformBlockRegistry,
        camera: &CameraView,
    ) -> Result<bool, ResourceError> {
        match self.blocks.get(CAMERA_BLOCK) {
            Some(block) => registry.write_camera(device, block, camera).map(|_| true),
            None => Ok(false),
        }
    }

    /// Writes the fog into `FogBlock`. Returns `false` if the program does not declare it.
    pub fn set_fog_block(
        &self,
        device: &dyn UniformDevice,
        registry: &mut UniformBlockRegistry,
        fog: &Fog,
    ) -> Result<bool, ResourceError> {
        match self.blocks.get(FOG_BLOCK) {
            Some(block) => registry.write_fog(device, block, fog).map(|_| true),
            None => Ok(false),
        }
    }

    /// Writes ambient and probe lighting into `LightBlock`. Returns `false` if
    /// the program does not declare it.
    pub fn set_lights_block(
        &self,
        device: &dyn UniformDevice,
        registry: &mut UniformBlockRegistry,
        lights: &LightState,
    ) -> Result<bool, ResourceError> {
        match self.blocks.get(LIGHT_BLOCK) {
            Some(block) => registry.write_lights(device, block, lights).map(|_| true),
            None => Ok(false),
        }
    }
}
