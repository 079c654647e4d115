// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node types shared by every graph kind: frames, reroutes and the group
//! interface nodes.

use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::port::{Port, PortDirection, PortType};

/// Number of interface slots on group nodes and group input/output nodes
pub const GROUP_SLOTS: usize = 4;

/// Interface slots `Input_0..` or `Output_0..` for group nodes
pub fn group_slots(direction: PortDirection) -> Vec<Port> {
    let prefix = match direction {
        PortDirection::Input => "Input",
        PortDirection::Output => "Output",
    };
    (0..GROUP_SLOTS)
        .map(|i| {
            Port::new(
                format!("{prefix}_{i}"),
                format!("{prefix} {i}"),
                PortType::Any,
                direction,
            )
        })
        .collect()
}

/// Register layout and group interface nodes
pub fn register_common_nodes(registry: &mut NodeRegistry) {
    registry.register(NodeType::new(
        "NodeFrame",
        "Frame",
        NodeCategory::Layout,
        "Visual container for other nodes",
    ));

    registry.register(
        NodeType::new("NodeReroute", "Reroute", NodeCategory::Layout, "Redirect a link")
            .with_inputs(vec![Port::input("Input", PortType::Any)])
            .with_outputs(vec![Port::output("Output", PortType::Any)]),
    );

    // Group input exposes the group's inputs as outputs inside the group
    registry.register(
        NodeType::new(
            "NodeGroupInput",
            "Group Input",
            NodeCategory::Group,
            "Inputs of the enclosing group",
        )
        .with_outputs(
            group_slots(PortDirection::Input)
                .into_iter()
                .map(|mut p| {
                    p.direction = PortDirection::Output;
                    p.multi_connect = true;
                    p
                })
                .collect(),
        ),
    );

    registry.register(
        NodeType::new(
            "NodeGroupOutput",
            "Group Output",
            NodeCategory::Group,
            "Outputs of the enclosing group",
        )
        .with_inputs(
            group_slots(PortDirection::Output)
                .into_iter()
                .map(|mut p| {
                    p.direction = PortDirection::Input;
                    p.multi_connect = false;
                    p
                })
                .collect(),
        ),
    );
}

/// Group node type for a kind-specific identifier
pub fn group_node_type(id: &str) -> NodeType {
    NodeType::new(id, "Group", NodeCategory::Group, "Node group instance")
        .with_inputs(group_slots(PortDirection::Input))
        .with_outputs(group_slots(PortDirection::Output))
        .group()
}
