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

use super::*;
use crate::render_lane::test_device::{uniform, DeviceCall, RecordingDevice};
use crate::render_lane::uniform_blocks::UniformBlockRegistry;
use glam::{Mat4, Vec3};
use lumina_core::renderer::{
    ProgramId, ResourceError, TextureBinding, TextureId, UniformType, UniformValue, UniformValues,
};
use std::collections::HashMap;

const PROGRAM: ProgramId = ProgramId(1);

fn build(device: &RecordingDevice) -> ProgramUniforms {
    let mut registry = UniformBlockRegistry::new();
    ProgramUniforms::new(device, PROGRAM, &mut registry).unwrap()
}

fn lit_program() -> RecordingDevice {
    RecordingDevice::new().with_program(
        PROGRAM,
        vec![
            uniform("opacity", UniformType::Float, 1, 0),
            uniform("diffuse", UniformType::FloatVec3, 1, 1),
            uniform("modelMatrix", UniformType::FloatMat4, 1, 2),
            uniform("boneMatrices[0]", UniformType::FloatMat4, 4, 3),
            uniform("pointLights[0].position", UniformType::FloatVec3, 1, 4),
            uniform("pointLights[0].color", UniformType::FloatVec3, 1, 5),
            uniform("pointLights[1].position", UniformType::FloatVec3, 1, 6),
            uniform("pointLights[1].color", UniformType::FloatVec3, 1, 7),
            uniform("map", UniformType::Sampler2D, 1, 8),
            uniform("useFog", UniformType::Bool, 1, 9),
            uniform("mystery", UniformType::Unsupported(0x9999), 1, 10),
        ],
    )
}

#[test]
fn tree_mirrors_reflected_names() {
    let device = lit_program();
    let uniforms = build(&device);
    let root = uniforms.root();

    assert_eq!(root.len(), 8);
    assert!(matches!(root.get("opacity"), Some(UniformNode::Single(_))));
    assert!(matches!(
        root.get("boneMatrices"),
        Some(UniformNode::PureArray(leaf)) if leaf.array_size() == 4
    ));

    let Some(UniformNode::Structured(point_lights)) = root.get("pointLights") else {
        panic!("pointLights should be structured");
    };
    assert_eq!(point_lights.children().len(), 2);
    let Some(UniformNode::Structured(second)) = point_lights.children().get_key(&UniformKey::Index(1))
    else {
        panic!("pointLights[1] should be structured");
    };
    let keys: Vec<_> = second.children().nodes().iter().map(|n| n.key().clone()).collect();
    assert_eq!(
        keys,
        vec![
            UniformKey::Name("position".into()),
            UniformKey::Name("color".into())
        ]
    );
}

#[test]
fn reparsing_a_name_reuses_nodes() {
    let mut root = UniformContainer::default();
    let position = uniform("lights.point[2].position", UniformType::FloatVec3, 1, 0);
    let color = uniform("lights.point[2].color", UniformType::FloatVec3, 1, 1);

    root.parse_uniform(&position).unwrap();
    root.parse_uniform(&color).unwrap();
    root.parse_uniform(&position).unwrap();

    assert_eq!(root.len(), 1);
    let Some(UniformNode::Structured(lights)) = root.get("lights") else {
        panic!("lights should be structured");
    };
    let Some(UniformNode::Structured(point)) = lights.children().get("point") else {
        panic!("point should be structured");
    };
    assert_eq!(point.children().len(), 1);
    let Some(UniformNode::Structured(element)) = point.children().get_key(&UniformKey::Index(2))
    else {
        panic!("point[2] should be structured");
    };
    assert_eq!(element.children().len(), 2);
}

#[test]
fn uniforms_without_location_or_with_bad_names_are_skipped() {
    let mut in_block = uniform("projectionMatrix", UniformType::FloatMat4, 1, 0);
    in_block.location = None;
    let device = RecordingDevice::new().with_program(
        PROGRAM,
        vec![
            in_block,
            uniform("bad-name", UniformType::Float, 1, 1),
            uniform("good", UniformType::Float, 1, 2),
        ],
    );
    let uniforms = build(&device);
    assert_eq!(uniforms.root().len(), 1);
    assert!(uniforms.root().get("good").is_some());
}

#[test]
fn unchanged_value_is_written_once() {
    let device = lit_program();
    let mut uniforms = build(&device);
    let diffuse = UniformValue::Vec3(Vec3::new(1.0, 0.5, 0.25));

    uniforms.set_value(&device, "diffuse", &diffuse).unwrap();
    uniforms.set_value(&device, "diffuse", &diffuse).unwrap();
    assert_eq!(device.uniform_writes(), 1);

    uniforms
        .set_value(&device, "diffuse", &UniformValue::Vec3(Vec3::ONE))
        .unwrap();
    assert_eq!(device.uniform_writes(), 2);
    assert_eq!(
        device.calls().last(),
        Some(&DeviceCall::WriteFloat {
            location: 1,
            components: 3,
            data: vec![1.0, 1.0, 1.0]
        })
    );
}

#[test]
fn matrices_and_pure_arrays_use_the_cache() {
    let device = lit_program();
    let mut uniforms = build(&device);
    let model = UniformValue::Mat4(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    let bones = UniformValue::Mat4Array(vec![Mat4::IDENTITY; 4]);

    for _ in 0..3 {
        uniforms.set_value(&device, "modelMatrix", &model).unwrap();
        uniforms.set_value(&device, "boneMatrices", &bones).unwrap();
    }
    let calls = device.take_calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[1],
        DeviceCall::WriteMatrix { location: 3, dimension: 4, data } if data.len() == 64
    ));

    let fewer = UniformValue::Mat4Array(vec![Mat4::IDENTITY; 2]);
    uniforms.set_value(&device, "boneMatrices", &fewer).unwrap();
    assert_eq!(device.uniform_writes(), 1);
}

#[test]
fn structured_values_reach_each_member() {
    let device = lit_program();
    let mut uniforms = build(&device);
    let light = |x: f32| {
        UniformValue::structure([
            ("position", UniformValue::Vec3(Vec3::splat(x))),
            ("color", UniformValue::Vec3(Vec3::ONE)),
        ])
    };
    let lights = UniformValue::Array(vec![light(1.0), light(2.0)]);

    uniforms.set_value(&device, "pointLights", &lights).unwrap();
    assert_eq!(device.uniform_writes(), 4);

    let moved = UniformValue::Array(vec![light(1.0), light(3.0)]);
    uniforms.set_value(&device, "pointLights", &moved).unwrap();
    assert_eq!(device.uniform_writes(), 5);
    assert_eq!(
        device.calls().last(),
        Some(&DeviceCall::WriteFloat {
            location: 6,
            components: 3,
            data: vec![3.0, 3.0, 3.0]
        })
    );
}

#[test]
fn absent_uniforms_and_mismatched_values_are_no_ops() {
    let device = lit_program();
    let mut uniforms = build(&device);

    uniforms
        .set_value(&device, "notDeclared", &UniformValue::Float(1.0))
        .unwrap();
    uniforms
        .set_value(&device, "mystery", &UniformValue::Float(1.0))
        .unwrap();
    uniforms
        .set_value(&device, "diffuse", &UniformValue::Float(1.0))
        .unwrap();
    assert!(device.calls().is_empty());
}

#[test]
fn booleans_are_written_as_ints() {
    let device = lit_program();
    let mut uniforms = build(&device);
    uniforms
        .set_value(&device, "useFog", &UniformValue::Bool(true))
        .unwrap();
    assert_eq!(
        device.calls(),
        vec![DeviceCall::WriteInt {
            location: 9,
            components: 1,
            data: vec![1]
        }]
    );
}

#[test]
fn textures_bind_every_time_but_write_the_unit_once() {
    let device = lit_program();
    let mut uniforms = build(&device);
    let texture = UniformValue::Texture(Some(TextureId(42)));

    for _ in 0..2 {
        device.reset_texture_units();
        uniforms.set_value(&device, "map", &texture).unwrap();
    }
    assert_eq!(
        device.calls(),
        vec![
            DeviceCall::WriteInt {
                location: 8,
                components: 1,
                data: vec![0]
            },
            DeviceCall::BindTexture {
                unit: 0,
                binding: TextureBinding::D2,
                texture: Some(TextureId(42))
            },
            DeviceCall::BindTexture {
                unit: 0,
                binding: TextureBinding::D2,
                texture: Some(TextureId(42))
            },
        ]
    );
}

#[test]
fn missing_texture_binds_the_placeholder() {
    let device = lit_program();
    let mut uniforms = build(&device);
    uniforms
        .set_value(&device, "map", &UniformValue::Texture(None))
        .unwrap();
    assert!(device.calls().contains(&DeviceCall::BindTexture {
        unit: 0,
        binding: TextureBinding::D2,
        texture: None
    }));
}

#[test]
fn texture_arrays_allocate_one_unit_per_element() {
    let device = RecordingDevice::new().with_program(
        PROGRAM,
        vec![uniform("shadowMaps[0]", UniformType::Sampler2D, 3, 0)],
    );
    let mut uniforms = build(&device);
    let maps = UniformValue::Textures(vec![Some(TextureId(1)), None]);
    uniforms.set_value(&device, "shadowMaps", &maps).unwrap();

    let calls = device.calls();
    assert_eq!(
        calls[0],
        DeviceCall::WriteInt {
            location: 0,
            components: 1,
            data: vec![0, 1, 2]
        }
    );
    assert_eq!(
        calls[1..],
        [
            DeviceCall::BindTexture {
                unit: 0,
                binding: TextureBinding::D2,
                texture: Some(TextureId(1))
            },
            DeviceCall::BindTexture {
                unit: 1,
                binding: TextureBinding::D2,
                texture: None
            },
            DeviceCall::BindTexture {
                unit: 2,
                binding: TextureBinding::D2,
                texture: None
            },
        ]
    );
}

#[test]
fn set_optional_reads_defined_properties_only() {
    let device = lit_program();
    let mut uniforms = build(&device);
    let mut material = HashMap::new();
    material.insert("opacity".to_string(), UniformValue::Float(0.5));

    uniforms.set_optional(&device, &material, "opacity").unwrap();
    uniforms.set_optional(&device, &material, "diffuse").unwrap();
    assert_eq!(
        device.calls(),
        vec![DeviceCall::WriteFloat {
            location: 0,
            components: 1,
            data: vec![0.5]
        }]
    );
}

#[test]
fn seq_with_value_filters_declared_uniforms() {
    let device = lit_program();
    let uniforms = build(&device);
    let mut values = UniformValues::new();
    values.insert("opacity", 1.0f32);
    values.insert("diffuse", Vec3::ONE);
    values.insert("notDeclared", 3.0f32);

    let seq = uniforms.seq_with_value(&values);
    assert_eq!(seq.len(), 2);
    assert_eq!(uniforms.sequence().len(), uniforms.root().len());
}

#[test]
fn upload_honours_needs_update() {
    let device = lit_program();
    let mut uniforms = build(&device);
    let mut values = UniformValues::new();
    values.insert("opacity", 0.25f32);
    values.insert("diffuse", Vec3::ONE).needs_update = Some(false);
    values.insert("modelMatrix", Mat4::IDENTITY).needs_update = Some(true);

    let seq = uniforms.seq_with_value(&values);
    uniforms.upload(&device, &seq, &values).unwrap();

    let calls = device.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|c| !matches!(c, DeviceCall::WriteFloat { location: 1, .. })));
}

#[test]
fn unknown_program_is_an_error() {
    let device = RecordingDevice::new();
    let mut registry = UniformBlockRegistry::new();
    let err = ProgramUniforms::new(&device, ProgramId(9), &mut registry).unwrap_err();
    assert_eq!(err, ResourceError::InvalidProgram(ProgramId(9)));
}
