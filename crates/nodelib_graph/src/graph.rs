// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.

use crate::connection::{Connection, ConnectionId, SocketRef};
use crate::node::{Node, NodeId};
use crate::port::PortDirection;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Create a new random graph ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

/// Category of a graph. Node types are only valid inside graphs of their kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphKind {
    /// Compositor graphs
    Compositing,
    /// Material/shader graphs
    Shader,
    /// Geometry node graphs
    Geometry,
}

impl GraphKind {
    /// All graph kinds
    pub fn all() -> &'static [GraphKind] {
        &[GraphKind::Compositing, GraphKind::Shader, GraphKind::Geometry]
    }

    /// Canonical upper-case tag
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphKind::Compositing => "COMPOSITING",
            GraphKind::Shader => "SHADER",
            GraphKind::Geometry => "GEOMETRY",
        }
    }

    /// Type identifier prefix owned by this kind
    pub fn type_prefix(&self) -> &'static str {
        match self {
            GraphKind::Compositing => "CompositorNode",
            GraphKind::Shader => "ShaderNode",
            GraphKind::Geometry => "GeometryNode",
        }
    }

    /// Other prefixes whose types may appear in graphs of this kind
    pub fn shared_prefixes(&self) -> &'static [&'static str] {
        match self {
            GraphKind::Compositing | GraphKind::Shader => &["Node"],
            GraphKind::Geometry => &["FunctionNode", "ShaderNode", "Node"],
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphKind {
    type Err = UnknownGraphKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMPOSITING" | "COMPOSITOR" => Ok(GraphKind::Compositing),
            "SHADER" | "MATERIAL" => Ok(GraphKind::Shader),
            "GEOMETRY" => Ok(GraphKind::Geometry),
            _ => Err(UnknownGraphKind(s.to_string())),
        }
    }
}

/// Error when parsing a graph kind tag
#[derive(Debug, thiserror::Error)]
#[error("Unknown graph kind: {0}")]
pub struct UnknownGraphKind(pub String);

/// Nodes and links of one graph kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Unique graph ID
    pub id: GraphId,
    /// Graph name
    pub name: String,
    /// Graph kind
    pub kind: GraphKind,
    /// Insertion order is display and export order
    nodes: IndexMap<NodeId, Node>,
    connections: IndexMap<ConnectionId, Connection>,
    /// Active node
    active: Option<NodeId>,
}

impl Graph {
    /// Empty graph of `kind`
    pub fn new(name: impl Into<String>, kind: GraphKind) -> Self {
        Self {
            id: GraphId::new(),
            name: name.into(),
            kind,
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            active: None,
        }
    }

    /// Insert a node as is. Name uniqueness is the caller's concern.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove every node and connection
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.active = None;
    }

    /// Node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Find a node by name
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a connection from an output port to an input port
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: &str,
        to_node: NodeId,
        to_port: &str,
    ) -> Result<ConnectionId, ConnectionError> {
        let node = |id: NodeId| self.nodes.get(&id).ok_or(ConnectionError::NodeNotFound(id));
        let (source_node, target_node) = (node(from_node)?, node(to_node)?);

        let source_port = source_node.output(from_port)
            .ok_or_else(|| ConnectionError::PortNotFound(from_port.to_string()))?;
        let target_port = target_node.input(to_port)
            .ok_or_else(|| ConnectionError::PortNotFound(to_port.to_string()))?;

        debug_assert_eq!(source_port.direction, PortDirection::Output);
        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }
        if !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }

        let occupied = if target_port.multi_connect {
            self.is_connected(from_node, from_port, to_node, to_port)
        } else {
            self.connections.values().any(|c| c.targets(to_node, to_port))
        };
        if occupied {
            return Err(ConnectionError::PortAlreadyConnected(to_port.to_string()));
        }

        let connection = Connection::new(
            SocketRef::new(from_node, from_port),
            SocketRef::new(to_node, to_port),
        );
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Check whether an identical connection exists
    pub fn is_connected(&self, from_node: NodeId, from_port: &str, to_node: NodeId, to_port: &str) -> bool {
        let from = SocketRef::new(from_node, from_port);
        let to = SocketRef::new(to_node, to_port);
        self.connections.values().any(|c| c.joins(&from, &to))
    }

    /// Links in creation order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of links
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Deselect every node and clear the active node
    pub fn deselect_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        self.active = None;
    }

    /// Select a node
    pub fn select(&mut self, node_id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.selected = true;
        }
    }

    /// Get the selected nodes in graph order
    pub fn selected_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.selected)
    }

    /// Set the active node
    pub fn set_active(&mut self, node_id: Option<NodeId>) {
        self.active = node_id.filter(|id| self.nodes.contains_key(id));
    }

    /// Get the active node
    pub fn active_node(&self) -> Option<NodeId> {
        self.active
    }
}

/// Why [`Graph::connect`] refused a link
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// One of the endpoints is not in the graph
    #[error("No node {0:?} in this graph")]
    NodeNotFound(NodeId),

    /// No socket with this identifier on the relevant side
    #[error("No socket '{0}'")]
    PortNotFound(String),

    /// Output and input types have no conversion between them
    #[error("Socket types cannot be linked")]
    IncompatiblePorts,

    /// The input accepts a single link and already has one
    #[error("Socket '{0}' already has an incoming link")]
    PortAlreadyConnected(String),

    /// Both ends are on the same node
    #[error("A node cannot link to itself")]
    SelfLoop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeCategory, NodeType};
    use crate::port::{Port, PortType};

    fn value_type() -> NodeType {
        NodeType::new("CompositorNodeValue", "Value", NodeCategory::Input, "")
            .with_outputs(vec![Port::output("Value", PortType::Float)])
    }

    fn blur_type() -> NodeType {
        NodeType::new("CompositorNodeBlur", "Blur", NodeCategory::Filter, "")
            .with_inputs(vec![
                Port::input("Image", PortType::Image),
                Port::input("Size", PortType::Float),
            ])
            .with_outputs(vec![Port::output("Image", PortType::Image)])
    }

    #[test]
    fn test_connect_by_identifier() {
        let mut graph = Graph::new("Compositing", GraphKind::Compositing);
        let value = graph.add_node(Node::new(&value_type()));
        let blur = graph.add_node(Node::new(&blur_type()));

        graph.connect(value, "Value", blur, "Size").unwrap();
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.is_connected(value, "Value", blur, "Size"));

        let err = graph.connect(value, "Value", blur, "Size").unwrap_err();
        assert!(matches!(err, ConnectionError::PortAlreadyConnected(_)));

        let err = graph.connect(value, "Value", blur, "Missing").unwrap_err();
        assert!(matches!(err, ConnectionError::PortNotFound(_)));
    }

    #[test]
    fn test_multi_input_refuses_identical_link() {
        let sum_type = NodeType::new("CompositorNodeSum", "Sum", NodeCategory::Converter, "")
            .with_inputs(vec![Port::input("Values", PortType::Float).multi()]);

        let mut graph = Graph::new("Compositing", GraphKind::Compositing);
        let a = graph.add_node(Node::new(&value_type()));
        let b = graph.add_node(Node::new(&value_type()));
        let sum = graph.add_node(Node::new(&sum_type));

        graph.connect(a, "Value", sum, "Values").unwrap();
        graph.connect(b, "Value", sum, "Values").unwrap();
        let err = graph.connect(a, "Value", sum, "Values").unwrap_err();
        assert!(matches!(err, ConnectionError::PortAlreadyConnected(_)));
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_clear_drops_connections() {
        let mut graph = Graph::new("Compositing", GraphKind::Compositing);
        let value = graph.add_node(Node::new(&value_type()));
        let blur = graph.add_node(Node::new(&blur_type()));
        graph.connect(value, "Value", blur, "Size").unwrap();
        graph.set_active(Some(blur));

        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.active_node(), None);
    }

    #[test]
    fn test_selection_and_bounds() {
        let mut graph = Graph::new("Compositing", GraphKind::Compositing);

        let a = graph.add_node(Node::new(&value_type()).with_position(-50.0, 0.0));
        let b = graph.add_node(Node::new(&blur_type()).with_position(300.0, 20.0));
        graph.select(b);
        graph.set_active(Some(b));

        let selected: Vec<NodeId> = graph.selected_nodes().map(|n| n.id).collect();
        assert_eq!(selected, vec![b]);
        assert_eq!(graph.active_node(), Some(b));

        graph.deselect_all();
        assert_eq!(graph.selected_nodes().count(), 0);
        assert_eq!(graph.active_node(), None);
        assert!(graph.node(a).is_some());
    }

    #[test]
    fn test_graph_kind_parsing() {
        assert_eq!("compositing".parse::<GraphKind>().unwrap(), GraphKind::Compositing);
        assert_eq!("SHADER".parse::<GraphKind>().unwrap(), GraphKind::Shader);
        assert!("audio".parse::<GraphKind>().is_err());
        assert_eq!(GraphKind::Geometry.type_prefix(), "GeometryNode");
    }
}
