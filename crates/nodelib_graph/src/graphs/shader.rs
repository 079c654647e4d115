// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material/shader graph node types.

use super::common::{group_node_type, register_common_nodes};
use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::port::{Port, PortType, PortValue};

/// Register scalar math nodes. Geometry graphs share these types.
pub fn register_math_nodes(registry: &mut NodeRegistry) {
    registry.register(
        NodeType::new("ShaderNodeMath", "Math", NodeCategory::Converter, "Scalar math")
            .with_inputs(vec![
                Port::input("Value", PortType::Float).with_default(PortValue::Float(0.5)),
                Port::input("Value", PortType::Float).with_identifier("Value_001").with_default(PortValue::Float(0.5)),
                Port::input("Value", PortType::Float)
                    .with_identifier("Value_002")
                    .with_default(PortValue::Float(0.5))
                    .disabled(),
            ])
            .with_outputs(vec![Port::output("Value", PortType::Float)])
            .with_property("operation", PortValue::String("ADD".to_string()))
            .with_property("use_clamp", PortValue::Bool(false)),
    );

    registry.register(
        NodeType::new("ShaderNodeMapRange", "Map Range", NodeCategory::Converter, "Remap a value between ranges")
            .with_inputs(vec![
                Port::input("Value", PortType::Float).with_default(PortValue::Float(1.0)),
                Port::input("From Min", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("From Max", PortType::Float).with_default(PortValue::Float(1.0)),
                Port::input("To Min", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("To Max", PortType::Float).with_default(PortValue::Float(1.0)),
            ])
            .with_outputs(vec![Port::output("Result", PortType::Float)])
            .with_property("interpolation_type", PortValue::String("LINEAR".to_string()))
            .with_property("clamp", PortValue::Bool(true)),
    );
}

/// Create the shader node registry with all available node types
pub fn create_shader_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output
    // ========================================================================

    registry.register(
        NodeType::new("ShaderNodeOutputMaterial", "Material Output", NodeCategory::Output, "Final material output")
            .with_inputs(vec![
                Port::input("Surface", PortType::Shader),
                Port::input("Volume", PortType::Shader),
                Port::input("Displacement", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
            ])
            .with_property("target", PortValue::String("ALL".to_string()))
            .with_property("is_active_output", PortValue::Bool(true)),
    );

    // ========================================================================
    // Shader
    // ========================================================================

    registry.register(
        NodeType::new("ShaderNodeBsdfPrincipled", "Principled BSDF", NodeCategory::Shader, "Physically based surface")
            .with_inputs(vec![
                Port::input("Base Color", PortType::Color).with_default(PortValue::Color([0.8, 0.8, 0.8, 1.0])),
                Port::input("Metallic", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("Roughness", PortType::Float).with_default(PortValue::Float(0.5)),
                Port::input("IOR", PortType::Float).with_default(PortValue::Float(1.5)),
                Port::input("Alpha", PortType::Float).with_default(PortValue::Float(1.0)),
                Port::input("Normal", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Emission Color", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
                Port::input("Emission Strength", PortType::Float).with_default(PortValue::Float(0.0)),
            ])
            .with_outputs(vec![Port::output("BSDF", PortType::Shader)])
            .with_property("distribution", PortValue::String("MULTI_GGX".to_string()))
            .with_property("subsurface_method", PortValue::String("RANDOM_WALK".to_string())),
    );

    registry.register(
        NodeType::new("ShaderNodeEmission", "Emission", NodeCategory::Shader, "Light-emitting surface")
            .with_inputs(vec![
                Port::input("Color", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
                Port::input("Strength", PortType::Float).with_default(PortValue::Float(1.0)),
            ])
            .with_outputs(vec![Port::output("Emission", PortType::Shader)]),
    );

    registry.register(
        NodeType::new("ShaderNodeMixShader", "Mix Shader", NodeCategory::Shader, "Blend two shaders")
            .with_inputs(vec![
                Port::input("Fac", PortType::Float).with_default(PortValue::Float(0.5)),
                Port::input("Shader", PortType::Shader),
                Port::input("Shader", PortType::Shader).with_identifier("Shader_001"),
            ])
            .with_outputs(vec![Port::output("Shader", PortType::Shader)]),
    );

    // ========================================================================
    // Texture & Input
    // ========================================================================

    registry.register(
        NodeType::new("ShaderNodeTexCoord", "Texture Coordinate", NodeCategory::Input, "Texture space coordinates")
            .with_outputs(vec![
                Port::output("Generated", PortType::Vector),
                Port::output("Normal", PortType::Vector),
                Port::output("UV", PortType::Vector),
                Port::output("Object", PortType::Vector),
            ])
            .with_property("object", PortValue::Object(None)),
    );

    registry.register(
        NodeType::new("ShaderNodeTexImage", "Image Texture", NodeCategory::Texture, "Sample an image")
            .with_inputs(vec![Port::input("Vector", PortType::Vector)])
            .with_outputs(vec![
                Port::output("Color", PortType::Color),
                Port::output("Alpha", PortType::Float),
            ])
            .with_property("image", PortValue::Object(None))
            .with_property("interpolation", PortValue::String("Linear".to_string()))
            .with_property("extension", PortValue::String("REPEAT".to_string())),
    );

    registry.register(
        NodeType::new("ShaderNodeTexNoise", "Noise Texture", NodeCategory::Texture, "Procedural noise")
            .with_inputs(vec![
                Port::input("Vector", PortType::Vector),
                Port::input("Scale", PortType::Float).with_default(PortValue::Float(5.0)),
                Port::input("Detail", PortType::Float).with_default(PortValue::Float(2.0)),
                Port::input("Roughness", PortType::Float).with_default(PortValue::Float(0.5)),
            ])
            .with_outputs(vec![
                Port::output("Fac", PortType::Float),
                Port::output("Color", PortType::Color),
            ])
            .with_property("noise_dimensions", PortValue::String("3D".to_string())),
    );

    // ========================================================================
    // Color, Vector & Converter
    // ========================================================================

    registry.register(
        NodeType::new("ShaderNodeMix", "Mix", NodeCategory::Color, "Mix values, vectors or colors")
            .with_inputs(vec![
                Port::input("Factor", PortType::Float).with_identifier("Factor_Float").with_default(PortValue::Float(0.5)),
                Port::input("A", PortType::Color).with_identifier("A_Color").with_default(PortValue::Color([0.5, 0.5, 0.5, 1.0])),
                Port::input("B", PortType::Color).with_identifier("B_Color").with_default(PortValue::Color([0.5, 0.5, 0.5, 1.0])),
            ])
            .with_outputs(vec![Port::output("Result", PortType::Color).with_identifier("Result_Color")])
            .with_property("data_type", PortValue::String("RGBA".to_string()))
            .with_property("blend_type", PortValue::String("MIX".to_string()))
            .with_property("clamp_result", PortValue::Bool(false)),
    );

    registry.register(
        NodeType::new("ShaderNodeMapping", "Mapping", NodeCategory::Vector, "Transform texture coordinates")
            .with_inputs(vec![
                Port::input("Vector", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Location", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Rotation", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Scale", PortType::Vector).with_default(PortValue::Vector([1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![Port::output("Vector", PortType::Vector)])
            .with_property("vector_type", PortValue::String("POINT".to_string())),
    );

    registry.register(
        NodeType::new("ShaderNodeSeparateColor", "Separate Color", NodeCategory::Converter, "Split color channels")
            .with_inputs(vec![
                Port::input("Color", PortType::Color).with_default(PortValue::Color([0.8, 0.8, 0.8, 1.0])),
            ])
            .with_outputs(vec![
                Port::output("Red", PortType::Float),
                Port::output("Green", PortType::Float),
                Port::output("Blue", PortType::Float),
            ])
            .with_property("mode", PortValue::String("RGB".to_string())),
    );

    register_math_nodes(&mut registry);

    // ========================================================================
    // Group & Layout
    // ========================================================================

    registry.register(group_node_type("ShaderNodeGroup"));
    register_common_nodes(&mut registry);

    registry
}
