// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::graph::GraphId;
use crate::port::{Port, PortValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default node width in graph units
pub const DEFAULT_NODE_WIDTH: f32 = 140.0;

/// Default node height in graph units
pub const DEFAULT_NODE_HEIGHT: f32 = 100.0;

/// Node handle. Names can change; the ID does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Fresh random ID
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Palette section a node type is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Input nodes (render layers, constants, coordinates)
    Input,
    /// Output nodes (composite, material output)
    Output,
    /// Color adjustments and mixing
    Color,
    /// Image filters
    Filter,
    /// Value conversion and math
    Converter,
    /// Vector operations
    Vector,
    /// Procedural and image textures
    Texture,
    /// Shader closures
    Shader,
    /// Geometry operations
    Geometry,
    /// Group nodes and group interface nodes
    Group,
    /// Frames and reroutes
    Layout,
}

/// Blueprint for nodes of one type: sockets, settings and their defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Type identifier such as `CompositorNodeBlur`
    pub id: String,
    /// Default node name for new instances
    pub name: String,
    /// Palette section
    pub category: NodeCategory,
    /// Tooltip text
    pub description: String,
    /// Input sockets copied into every instance
    pub inputs: Vec<Port>,
    /// Output sockets copied into every instance
    pub outputs: Vec<Port>,
    /// Settings in declaration order
    pub properties: Vec<(String, PortValue)>,
    /// Instances own a nested graph
    pub is_group: bool,
}

impl NodeType {
    /// Create a type with no ports or settings
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: NodeCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: Vec::new(),
            is_group: false,
        }
    }

    /// Set the input ports
    pub fn with_inputs(mut self, inputs: Vec<Port>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the output ports
    pub fn with_outputs(mut self, outputs: Vec<Port>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Declare a setting with its default value
    pub fn with_property(mut self, key: impl Into<String>, default: PortValue) -> Self {
        self.properties.push((key.into(), default));
        self
    }

    /// Mark the type as a group node
    pub fn group(mut self) -> Self {
        self.is_group = true;
        self
    }
}

/// One placed node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable handle
    pub id: NodeId,
    /// [`NodeType::id`] this node was created from
    pub node_type: String,
    /// Name, unique within the owning graph
    pub name: String,
    /// Display label, empty to show the type name
    pub label: String,
    /// Position in the graph
    pub position: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
    /// Input sockets in declaration order
    pub inputs: Vec<Port>,
    /// Output sockets in declaration order
    pub outputs: Vec<Port>,
    /// Muted nodes pass their input through
    pub muted: bool,
    /// Hidden (collapsed) in the editor
    pub hidden: bool,
    /// Custom color
    pub color: [f32; 3],
    /// Whether `color` is shown
    pub use_custom_color: bool,
    /// Selection state
    pub selected: bool,
    /// Node settings
    pub properties: IndexMap<String, PortValue>,
    /// Internal graph for group nodes
    pub group: Option<GraphId>,
    /// Whether the node type supports a nested graph
    pub is_group: bool,
}

impl Node {
    /// Instantiate `node_type` at the origin, named after the type
    pub fn new(node_type: &NodeType) -> Self {
        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            name: node_type.name.clone(),
            label: String::new(),
            position: [0.0, 0.0],
            size: [DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT],
            inputs: node_type.inputs.clone(),
            outputs: node_type.outputs.clone(),
            muted: false,
            hidden: false,
            color: [0.608, 0.608, 0.608],
            use_custom_color: false,
            selected: false,
            properties: node_type.properties.iter().cloned().collect(),
            group: None,
            is_group: node_type.is_group,
        }
    }

    /// Place the node at `(x, y)`
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Get an input port by identifier
    pub fn input(&self, identifier: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.identifier == identifier)
    }

    /// Get a mutable input port by identifier
    pub fn input_mut(&mut self, identifier: &str) -> Option<&mut Port> {
        self.inputs.iter_mut().find(|p| p.identifier == identifier)
    }

    /// Get an output port by identifier
    pub fn output(&self, identifier: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.identifier == identifier)
    }

    /// Change a declared setting, converting the value to the declared type.
    ///
    /// Returns `false` when the setting does not exist or the value does not fit.
    pub fn set_property(&mut self, key: &str, value: PortValue) -> bool {
        let Some(current) = self.properties.get_mut(key) else {
            return false;
        };
        match value.convert_to(current.port_type()) {
            Some(converted) => {
                *current = converted;
                true
            }
            None => false,
        }
    }
}

/// Node types available in one graph kind, in registration order
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    types: IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Registry with no types
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type. A later registration with the same ID replaces the earlier one.
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Type by ID
    pub fn get(&self, type_id: &str) -> Option<&NodeType> {
        self.types.get(type_id)
    }

    /// Type IDs starting with `prefix`, in registration order
    pub fn ids_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.types.keys().map(String::as_str).filter(move |id| id.starts_with(prefix))
    }

    /// Instantiate a type, `None` when the ID is not registered
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    fn blur_type() -> NodeType {
        NodeType::new("CompositorNodeBlur", "Blur", NodeCategory::Filter, "Blur an image")
            .with_inputs(vec![Port::input("Image", PortType::Image)])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
            .with_property("filter_type", PortValue::String("GAUSS".to_string()))
            .with_property("size_x", PortValue::Int(0))
    }

    #[test]
    fn test_node_from_type() {
        let node = Node::new(&blur_type());
        assert_eq!(node.name, "Blur");
        assert_eq!(node.node_type, "CompositorNodeBlur");
        assert!(node.input("Image").is_some());
        assert!(node.output("Image").is_some());
        assert_eq!(node.properties.len(), 2);
    }

    #[test]
    fn test_set_property() {
        let mut node = Node::new(&blur_type());
        assert!(node.set_property("size_x", PortValue::Float(12.0)));
        assert_eq!(node.properties["size_x"], PortValue::Int(12));
        assert!(!node.set_property("unknown", PortValue::Int(1)));
        assert!(!node.set_property("filter_type", PortValue::Vector([0.0; 3])));
    }

    #[test]
    fn test_registry_prefix_listing() {
        let mut registry = NodeRegistry::new();
        registry.register(blur_type());
        registry.register(NodeType::new("NodeFrame", "Frame", NodeCategory::Layout, ""));

        let ids: Vec<&str> = registry.ids_with_prefix("CompositorNode").collect();
        assert_eq!(ids, vec!["CompositorNodeBlur"]);
        assert!(registry.create_node("NodeFrame").is_some());
        assert!(registry.create_node("NodeMissing").is_none());
    }
}
