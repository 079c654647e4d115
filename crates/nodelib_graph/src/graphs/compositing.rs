// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compositor graph node types.

use super::common::{group_node_type, register_common_nodes};
use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::port::{Port, PortType, PortValue};

fn string(value: &str) -> PortValue {
    PortValue::String(value.to_string())
}

/// Create the compositor node registry with all available node types
pub fn create_compositing_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Input / Output
    // ========================================================================

    registry.register(
        NodeType::new("CompositorNodeRLayers", "Render Layers", NodeCategory::Input, "Rendered passes of a view layer")
            .with_outputs(vec![
                Port::output("Image", PortType::Image),
                Port::output("Alpha", PortType::Float),
                Port::output("Depth", PortType::Float).disabled(),
            ])
            .with_property("layer", string("ViewLayer")),
    );

    registry.register(
        NodeType::new("CompositorNodeImage", "Image", NodeCategory::Input, "Image file input")
            .with_outputs(vec![
                Port::output("Image", PortType::Image),
                Port::output("Alpha", PortType::Float),
            ])
            .with_property("image", PortValue::Object(None)),
    );

    registry.register(
        NodeType::new("CompositorNodeValue", "Value", NodeCategory::Input, "Constant value")
            .with_outputs(vec![Port::output("Value", PortType::Float).with_default(PortValue::Float(0.5))]),
    );

    registry.register(
        NodeType::new("CompositorNodeRGB", "RGB", NodeCategory::Input, "Constant color")
            .with_outputs(vec![
                Port::output("RGBA", PortType::Color).with_default(PortValue::Color([0.5, 0.5, 0.5, 1.0])),
            ]),
    );

    registry.register(
        NodeType::new("CompositorNodeComposite", "Composite", NodeCategory::Output, "Final render output")
            .with_inputs(vec![
                Port::input("Image", PortType::Image),
                Port::input("Alpha", PortType::Float).with_default(PortValue::Float(1.0)),
            ])
            .with_property("use_alpha", PortValue::Bool(true)),
    );

    registry.register(
        NodeType::new("CompositorNodeViewer", "Viewer", NodeCategory::Output, "Backdrop preview")
            .with_inputs(vec![
                Port::input("Image", PortType::Image),
                Port::input("Alpha", PortType::Float).with_default(PortValue::Float(1.0)),
            ])
            .with_property("use_alpha", PortValue::Bool(true)),
    );

    // ========================================================================
    // Color
    // ========================================================================

    // Both color inputs are displayed as "Image"
    registry.register(
        NodeType::new("CompositorNodeMixRGB", "Mix", NodeCategory::Color, "Blend two images")
            .with_inputs(vec![
                Port::input("Fac", PortType::Float).with_default(PortValue::Float(1.0)),
                Port::input("Image", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
                Port::input("Image", PortType::Color)
                    .with_identifier("Image_001")
                    .with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("blend_type", string("MIX"))
            .with_property("use_alpha", PortValue::Bool(false))
            .with_property("use_clamp", PortValue::Bool(false)),
    );

    registry.register(
        NodeType::new("CompositorNodeColorBalance", "Color Balance", NodeCategory::Color, "Lift/gamma/gain grading")
            .with_inputs(vec![
                Port::input("Fac", PortType::Float).with_default(PortValue::Float(1.0)),
                Port::input("Image", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("correction_method", string("LIFT_GAMMA_GAIN"))
            .with_property("lift", PortValue::Color([1.0, 1.0, 1.0, 1.0]))
            .with_property("gamma", PortValue::Color([1.0, 1.0, 1.0, 1.0]))
            .with_property("gain", PortValue::Color([1.0, 1.0, 1.0, 1.0])),
    );

    registry.register(
        NodeType::new("CompositorNodeCurveRGB", "RGB Curves", NodeCategory::Color, "Tone curves")
            .with_inputs(vec![
                Port::input("Fac", PortType::Float).with_default(PortValue::Float(1.0)),
                Port::input("Image", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
                Port::input("Black Level", PortType::Color).with_default(PortValue::Color([0.0, 0.0, 0.0, 1.0])),
                Port::input("White Level", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)]),
    );

    // ========================================================================
    // Filter
    // ========================================================================

    registry.register(
        NodeType::new("CompositorNodeBlur", "Blur", NodeCategory::Filter, "Blur an image")
            .with_inputs(vec![
                Port::input("Image", PortType::Image),
                Port::input("Size", PortType::Float).with_default(PortValue::Float(1.0)),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("filter_type", string("GAUSS"))
            .with_property("size_x", PortValue::Int(0))
            .with_property("size_y", PortValue::Int(0))
            .with_property("use_relative", PortValue::Bool(false)),
    );

    registry.register(
        NodeType::new("CompositorNodeGlare", "Glare", NodeCategory::Filter, "Streaks, ghosts and bloom")
            .with_inputs(vec![Port::input("Image", PortType::Image)])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("glare_type", string("STREAKS"))
            .with_property("quality", string("MEDIUM"))
            .with_property("threshold", PortValue::Float(1.0))
            .with_property("streaks", PortValue::Int(4)),
    );

    registry.register(
        NodeType::new("CompositorNodeDenoise", "Denoise", NodeCategory::Filter, "Remove render noise")
            .with_inputs(vec![
                Port::input("Image", PortType::Image),
                Port::input("Normal", PortType::Vector),
                Port::input("Albedo", PortType::Color),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("use_hdr", PortValue::Bool(true)),
    );

    // ========================================================================
    // Converter
    // ========================================================================

    registry.register(
        NodeType::new("CompositorNodeMath", "Math", NodeCategory::Converter, "Scalar math")
            .with_inputs(vec![
                Port::input("Value", PortType::Float).with_default(PortValue::Float(0.5)),
                Port::input("Value", PortType::Float).with_identifier("Value_001").with_default(PortValue::Float(0.5)),
                Port::input("Value", PortType::Float)
                    .with_identifier("Value_002")
                    .with_default(PortValue::Float(0.5))
                    .disabled(),
            ])
            .with_outputs(vec![Port::output("Value", PortType::Float)])
            .with_property("operation", string("ADD"))
            .with_property("use_clamp", PortValue::Bool(false)),
    );

    registry.register(
        NodeType::new("CompositorNodeSeparateColor", "Separate Color", NodeCategory::Converter, "Split color channels")
            .with_inputs(vec![
                Port::input("Image", PortType::Color).with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])),
            ])
            .with_outputs(vec![
                Port::output("Red", PortType::Float),
                Port::output("Green", PortType::Float),
                Port::output("Blue", PortType::Float),
                Port::output("Alpha", PortType::Float),
            ])
            .with_property("mode", string("RGB")),
    );

    registry.register(
        NodeType::new("CompositorNodeCombineColor", "Combine Color", NodeCategory::Converter, "Merge color channels")
            .with_inputs(vec![
                Port::input("Red", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("Green", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("Blue", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("Alpha", PortType::Float).with_default(PortValue::Float(1.0)),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("mode", string("RGB")),
    );

    // ========================================================================
    // Group & Layout
    // ========================================================================

    registry.register(group_node_type("CompositorNodeGroup"));
    register_common_nodes(&mut registry);

    registry
}
