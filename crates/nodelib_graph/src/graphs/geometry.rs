// SPDX-License-Identifier: MIT OR Apache-2.0
//! Geometry node graph types.

use super::common::{group_node_type, register_common_nodes};
use super::shader::register_math_nodes;
use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::port::{Port, PortType, PortValue};

/// Create the geometry node registry with all available node types
pub fn create_geometry_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Input
    // ========================================================================

    // The object input is a reference and has no numeric representation
    registry.register(
        NodeType::new("GeometryNodeObjectInfo", "Object Info", NodeCategory::Input, "Read another object's data")
            .with_inputs(vec![
                Port::input("Object", PortType::Object).with_default(PortValue::Object(None)),
                Port::input("As Instance", PortType::Bool).with_default(PortValue::Bool(false)),
            ])
            .with_outputs(vec![
                Port::output("Location", PortType::Vector),
                Port::output("Rotation", PortType::Vector),
                Port::output("Scale", PortType::Vector),
                Port::output("Geometry", PortType::Geometry),
            ])
            .with_property("transform_space", PortValue::String("ORIGINAL".to_string())),
    );

    registry.register(
        NodeType::new("FunctionNodeInputVector", "Vector", NodeCategory::Input, "Constant vector")
            .with_outputs(vec![Port::output("Vector", PortType::Vector)])
            .with_property("vector", PortValue::Vector([0.0, 0.0, 0.0])),
    );

    registry.register(
        NodeType::new("FunctionNodeRandomValue", "Random Value", NodeCategory::Input, "Per-element random numbers")
            .with_inputs(vec![
                Port::input("Min", PortType::Float).with_identifier("Min_001").with_default(PortValue::Float(0.0)),
                Port::input("Max", PortType::Float).with_identifier("Max_001").with_default(PortValue::Float(1.0)),
                Port::input("Seed", PortType::Int).with_default(PortValue::Int(0)),
            ])
            .with_outputs(vec![Port::output("Value", PortType::Float).with_identifier("Value_001")])
            .with_property("data_type", PortValue::String("FLOAT".to_string())),
    );

    // ========================================================================
    // Mesh & Points
    // ========================================================================

    registry.register(
        NodeType::new("GeometryNodeMeshCube", "Cube", NodeCategory::Geometry, "Cube mesh primitive")
            .with_inputs(vec![
                Port::input("Size", PortType::Vector).with_default(PortValue::Vector([1.0, 1.0, 1.0])),
                Port::input("Vertices X", PortType::Int).with_default(PortValue::Int(2)),
                Port::input("Vertices Y", PortType::Int).with_default(PortValue::Int(2)),
                Port::input("Vertices Z", PortType::Int).with_default(PortValue::Int(2)),
            ])
            .with_outputs(vec![Port::output("Mesh", PortType::Geometry)]),
    );

    registry.register(
        NodeType::new("GeometryNodeMeshToPoints", "Mesh to Points", NodeCategory::Geometry, "Create points from mesh elements")
            .with_inputs(vec![
                Port::input("Mesh", PortType::Geometry),
                Port::input("Selection", PortType::Bool).with_default(PortValue::Bool(true)),
                Port::input("Position", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Radius", PortType::Float).with_default(PortValue::Float(0.05)),
            ])
            .with_outputs(vec![Port::output("Points", PortType::Geometry)])
            .with_property("mode", PortValue::String("VERTICES".to_string())),
    );

    registry.register(
        NodeType::new("GeometryNodeInstanceOnPoints", "Instance on Points", NodeCategory::Geometry, "Place instances on points")
            .with_inputs(vec![
                Port::input("Points", PortType::Geometry),
                Port::input("Selection", PortType::Bool).with_default(PortValue::Bool(true)),
                Port::input("Instance", PortType::Geometry),
                Port::input("Rotation", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Scale", PortType::Vector).with_default(PortValue::Vector([1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![Port::output("Instances", PortType::Geometry)]),
    );

    registry.register(
        NodeType::new("GeometryNodeRealizeInstances", "Realize Instances", NodeCategory::Geometry, "Convert instances to real geometry")
            .with_inputs(vec![Port::input("Geometry", PortType::Geometry)])
            .with_outputs(vec![Port::output("Geometry", PortType::Geometry)]),
    );

    // ========================================================================
    // Geometry operations
    // ========================================================================

    registry.register(
        NodeType::new("GeometryNodeSetPosition", "Set Position", NodeCategory::Geometry, "Move geometry elements")
            .with_inputs(vec![
                Port::input("Geometry", PortType::Geometry),
                Port::input("Selection", PortType::Bool).with_default(PortValue::Bool(true)),
                Port::input("Position", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Offset", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
            ])
            .with_outputs(vec![Port::output("Geometry", PortType::Geometry)]),
    );

    registry.register(
        NodeType::new("GeometryNodeJoinGeometry", "Join Geometry", NodeCategory::Geometry, "Merge geometry sets")
            .with_inputs(vec![Port::input("Geometry", PortType::Geometry).multi()])
            .with_outputs(vec![Port::output("Geometry", PortType::Geometry)]),
    );

    registry.register(
        NodeType::new("GeometryNodeTransform", "Transform Geometry", NodeCategory::Geometry, "Translate, rotate and scale")
            .with_inputs(vec![
                Port::input("Geometry", PortType::Geometry),
                Port::input("Translation", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Rotation", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
                Port::input("Scale", PortType::Vector).with_default(PortValue::Vector([1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![Port::output("Geometry", PortType::Geometry)]),
    );

    register_math_nodes(&mut registry);

    // ========================================================================
    // Group & Layout
    // ========================================================================

    registry.register(group_node_type("GeometryNodeGroup"));
    register_common_nodes(&mut registry);

    registry
}
