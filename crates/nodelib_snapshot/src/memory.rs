// SPDX-License-Identifier: MIT OR Apache-2.0
//! [`HostGraphAdapter`] for the in-memory [`GraphStore`].

use crate::adapter::{HostGraphAdapter, HostValue, NodeInfo, NodeLayout, SocketInfo};
use crate::document::{LinkRecord, Value};
use crate::error::HostError;
use nodelib_graph::{
    ConnectionError, Graph, GraphId, GraphKind, GraphStore, Node, NodeId, Port, PortType, PortValue,
    StoreError,
};

/// Live representation of a port or property value, `None` for an unset
/// object reference
pub fn port_value_to_host(value: &PortValue) -> Option<HostValue> {
    Some(match value {
        PortValue::Bool(b) => HostValue::Bool(*b),
        PortValue::Int(i) => HostValue::Int(i64::from(*i)),
        PortValue::Float(f) => HostValue::Float(f64::from(*f)),
        PortValue::Vector(v) => HostValue::Tuple(v.iter().map(|c| f64::from(*c)).collect()),
        PortValue::Color(c) => HostValue::Tuple(c.iter().map(|c| f64::from(*c)).collect()),
        PortValue::String(s) => HostValue::String(s.clone()),
        PortValue::Object(Some(name)) => HostValue::Opaque(format!("Object(\"{name}\")")),
        PortValue::Object(None) => return None,
    })
}

/// Object name inside an `Object("name")` representation
fn object_name(repr: &str) -> Option<&str> {
    repr.strip_prefix("Object(\"")?.strip_suffix("\")")
}

/// Convert a document value into the representation used by `target`.
///
/// Strings only reach string settings, object references written as
/// `Object("name")` and numbers written as `"nan"` or `"inf"`. Other string
/// fallbacks never convert back.
pub fn value_to_port_value(value: &Value, target: PortType) -> Option<PortValue> {
    let natural = match value {
        Value::Bool(b) => PortValue::Bool(*b),
        Value::Int(i) => PortValue::Int(i32::try_from(*i).ok()?),
        Value::Float(f) => PortValue::Float(*f as f32),
        Value::String(s) => match target {
            PortType::String => PortValue::String(s.clone()),
            PortType::Object => PortValue::String(object_name(s)?.to_string()),
            _ => PortValue::Float(value.as_f64()? as f32),
        },
        Value::Sequence(_) => {
            let numbers = value.as_numbers()?;
            match numbers.as_slice() {
                [x, y, z] => PortValue::Vector([*x as f32, *y as f32, *z as f32]),
                [r, g, b, a] => PortValue::Color([*r as f32, *g as f32, *b as f32, *a as f32]),
                _ => return None,
            }
        }
    };
    natural.convert_to(target)
}

impl From<StoreError> for HostError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::GraphNotFound(_) => HostError::GraphNotFound,
            StoreError::NodeNotFound(_) => HostError::NodeNotFound,
            StoreError::UnknownNodeType { type_id, .. } => HostError::UnknownNodeType(type_id),
            StoreError::NotAGroupNode(name) => HostError::NotAGroup(name),
        }
    }
}

impl From<ConnectionError> for HostError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::NodeNotFound(_) => HostError::NodeNotFound,
            ConnectionError::PortNotFound(port) => HostError::SocketNotFound(port),
            other => HostError::ConnectionRejected(other.to_string()),
        }
    }
}

fn socket_info(port: &Port) -> SocketInfo {
    SocketInfo {
        identifier: port.identifier.clone(),
        name: port.name.clone(),
        enabled: port.enabled,
    }
}

fn node_ref(store: &GraphStore, graph: GraphId, node: NodeId) -> Option<&Node> {
    store.graph(graph)?.node(node)
}

fn node_mut_ref(store: &mut GraphStore, graph: GraphId, node: NodeId) -> Result<&mut Node, HostError> {
    graph_mut_ref(store, graph)?.node_mut(node).ok_or(HostError::NodeNotFound)
}

fn graph_mut_ref(store: &mut GraphStore, graph: GraphId) -> Result<&mut Graph, HostError> {
    store.graph_mut(graph).ok_or(HostError::GraphNotFound)
}

impl HostGraphAdapter for GraphStore {
    type GraphRef = GraphId;
    type NodeRef = NodeId;

    fn graph_kind(&self, graph: GraphId) -> Option<GraphKind> {
        self.graph(graph).map(|g| g.kind)
    }

    fn graph_name(&self, graph: GraphId) -> Option<String> {
        self.graph(graph).map(|g| g.name.clone())
    }

    fn nodes(&self, graph: GraphId) -> Vec<NodeId> {
        self.graph(graph).map(|g| g.node_ids().collect()).unwrap_or_default()
    }

    fn selected_nodes(&self, graph: GraphId) -> Vec<NodeId> {
        self.graph(graph)
            .map(|g| g.selected_nodes().map(|n| n.id).collect())
            .unwrap_or_default()
    }

    fn node_info(&self, graph: GraphId, node: NodeId) -> Option<NodeInfo> {
        let node = node_ref(self, graph, node)?;
        Some(NodeInfo {
            name: node.name.clone(),
            type_name: node.node_type.clone(),
            layout: NodeLayout {
                position: node.position,
                size: node.size,
                label: node.label.clone(),
                muted: node.muted,
                hidden: node.hidden,
                color: node.color,
                use_custom_color: node.use_custom_color,
            },
        })
    }

    fn list_input_sockets(&self, graph: GraphId, node: NodeId) -> Vec<SocketInfo> {
        node_ref(self, graph, node)
            .map(|n| n.inputs.iter().map(socket_info).collect())
            .unwrap_or_default()
    }

    fn list_output_sockets(&self, graph: GraphId, node: NodeId) -> Vec<SocketInfo> {
        node_ref(self, graph, node)
            .map(|n| n.outputs.iter().map(socket_info).collect())
            .unwrap_or_default()
    }

    fn get_default_value(&self, graph: GraphId, node: NodeId, identifier: &str) -> Option<HostValue> {
        let port = node_ref(self, graph, node)?.input(identifier)?;
        port.default_value.as_ref().and_then(port_value_to_host)
    }

    fn node_properties(&self, graph: GraphId, node: NodeId) -> Vec<(String, HostValue)> {
        node_ref(self, graph, node)
            .map(|n| {
                n.properties
                    .iter()
                    .filter_map(|(key, value)| Some((key.clone(), port_value_to_host(value)?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn group_graph(&self, graph: GraphId, node: NodeId) -> Option<GraphId> {
        node_ref(self, graph, node)?
            .group
            .filter(|inner| self.graph(*inner).is_some())
    }

    fn list_existing_links(&self, graph: GraphId) -> Vec<LinkRecord> {
        let Some(graph) = self.graph(graph) else {
            return Vec::new();
        };
        graph
            .connections()
            .filter_map(|c| {
                let from = graph.node(c.from.node)?;
                let to = graph.node(c.to.node)?;
                Some(LinkRecord::new(&from.name, &c.from.socket, &to.name, &c.to.socket))
            })
            .collect()
    }

    fn known_type_identifiers(&self, kind_prefix: &str) -> Vec<String> {
        self.registries().known_type_ids(kind_prefix)
    }

    fn create_node(&mut self, graph: GraphId, type_name: &str) -> Result<NodeId, HostError> {
        Ok(GraphStore::create_node(self, graph, type_name)?)
    }

    fn set_node_name(&mut self, graph: GraphId, node: NodeId, name: &str) -> Result<(), HostError> {
        node_mut_ref(self, graph, node)?.name = name.to_string();
        Ok(())
    }

    fn apply_layout(&mut self, graph: GraphId, node: NodeId, layout: &NodeLayout) -> Result<(), HostError> {
        let node = node_mut_ref(self, graph, node)?;
        node.position = layout.position;
        node.size = layout.size;
        node.label = layout.label.clone();
        node.muted = layout.muted;
        node.hidden = layout.hidden;
        node.color = layout.color;
        node.use_custom_color = layout.use_custom_color;
        Ok(())
    }

    fn set_property(&mut self, graph: GraphId, node: NodeId, key: &str, value: &Value) -> Result<(), HostError> {
        let node = node_mut_ref(self, graph, node)?;
        let target = node
            .properties
            .get(key)
            .map(PortValue::port_type)
            .ok_or_else(|| HostError::UnknownProperty(key.to_string()))?;
        let converted = value_to_port_value(value, target).ok_or_else(|| HostError::ValueRejected {
            target: key.to_string(),
            reason: format!("expected {target:?}"),
        })?;
        if node.set_property(key, converted) {
            Ok(())
        } else {
            Err(HostError::ValueRejected {
                target: key.to_string(),
                reason: format!("expected {target:?}"),
            })
        }
    }

    fn set_default_value(
        &mut self,
        graph: GraphId,
        node: NodeId,
        identifier: &str,
        value: &Value,
    ) -> Result<(), HostError> {
        let port = node_mut_ref(self, graph, node)?
            .input_mut(identifier)
            .ok_or_else(|| HostError::SocketNotFound(identifier.to_string()))?;
        let target = port.port_type;
        let accepted = value_to_port_value(value, target).is_some_and(|v| port.set_default(v));
        if accepted {
            Ok(())
        } else {
            Err(HostError::ValueRejected {
                target: identifier.to_string(),
                reason: format!("expected {target:?}"),
            })
        }
    }

    fn set_socket_enabled(
        &mut self,
        graph: GraphId,
        node: NodeId,
        identifier: &str,
        enabled: bool,
    ) -> Result<(), HostError> {
        let port = node_mut_ref(self, graph, node)?
            .input_mut(identifier)
            .ok_or_else(|| HostError::SocketNotFound(identifier.to_string()))?;
        port.enabled = enabled;
        Ok(())
    }

    fn connect(
        &mut self,
        graph: GraphId,
        from_node: NodeId,
        from_socket: &str,
        to_node: NodeId,
        to_socket: &str,
    ) -> Result<(), HostError> {
        graph_mut_ref(self, graph)?
            .connect(from_node, from_socket, to_node, to_socket)?;
        Ok(())
    }

    fn ensure_group_graph(&mut self, graph: GraphId, node: NodeId, name: &str) -> Result<GraphId, HostError> {
        Ok(GraphStore::ensure_group_graph(self, graph, node, name)?)
    }

    fn clear_graph(&mut self, graph: GraphId) -> Result<(), HostError> {
        graph_mut_ref(self, graph)?.clear();
        Ok(())
    }

    fn set_selection(&mut self, graph: GraphId, nodes: &[NodeId], active: Option<NodeId>) -> Result<(), HostError> {
        let graph = graph_mut_ref(self, graph)?;
        graph.deselect_all();
        for node in nodes {
            graph.select(*node);
        }
        graph.set_active(active);
        Ok(())
    }
}
