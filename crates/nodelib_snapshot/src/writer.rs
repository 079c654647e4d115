// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capture a selection of live nodes into a [`GraphDocument`].

use crate::adapter::{HostGraphAdapter, HostValue};
use crate::document::{
    GraphDocument, LinkRecord, NodeBody, NodeRecord, SocketRecord, Value, GROUP_TREE_PROPERTY,
};
use crate::error::{Result, SnapshotError};
use nodelib_graph::GraphKind;
use std::collections::HashSet;

/// Serialize a live value by kind.
///
/// Primitives pass through, tuples and other iterables become sequences,
/// and anything else is kept as its string representation.
pub fn encode_value(value: HostValue) -> Value {
    match value {
        HostValue::Bool(b) => Value::Bool(b),
        HostValue::Int(i) => Value::Int(i),
        HostValue::Float(f) => Value::Float(f),
        HostValue::Tuple(items) => Value::Sequence(items.into_iter().map(Value::Float).collect()),
        HostValue::Sequence(items) => Value::Sequence(items.into_iter().map(encode_value).collect()),
        HostValue::String(s) | HostValue::Opaque(s) => Value::String(s),
    }
}

/// Read-only walker producing snapshot documents
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphSnapshotWriter;

impl GraphSnapshotWriter {
    /// Create a writer
    pub fn new() -> Self {
        Self
    }

    /// Capture the host's current selection in `graph`
    pub fn capture_selection<H: HostGraphAdapter>(
        &self,
        host: &H,
        graph: Option<H::GraphRef>,
    ) -> Result<GraphDocument> {
        let graph = graph.ok_or(SnapshotError::NoHostGraph)?;
        let selected = host.selected_nodes(graph);
        self.capture_nodes(host, graph, &selected)
    }

    /// Capture exactly `nodes` and the links running between them
    pub fn capture_nodes<H: HostGraphAdapter>(
        &self,
        host: &H,
        graph: H::GraphRef,
        nodes: &[H::NodeRef],
    ) -> Result<GraphDocument> {
        let kind = host.graph_kind(graph).ok_or(SnapshotError::NoHostGraph)?;
        if nodes.is_empty() {
            return Err(SnapshotError::EmptySelection);
        }

        let document = self.capture(host, graph, kind, nodes);
        tracing::info!(
            "Captured {} nodes and {} links from {}",
            document.node_count(),
            document.link_count(),
            document.source_graph_name
        );
        Ok(document)
    }

    fn capture<H: HostGraphAdapter>(
        &self,
        host: &H,
        graph: H::GraphRef,
        kind: GraphKind,
        nodes: &[H::NodeRef],
    ) -> GraphDocument {
        let mut document = GraphDocument::new(kind, host.graph_name(graph).unwrap_or_default());
        let mut seen = HashSet::new();

        for &node in nodes {
            if !seen.insert(node) {
                continue;
            }
            match self.node_record(host, graph, kind, node) {
                Some(record) => document.nodes.push(record),
                None => tracing::warn!("Node {:?} vanished during capture", node),
            }
        }

        let names: HashSet<&str> = document.nodes.iter().map(|n| n.name.as_str()).collect();
        let links: Vec<LinkRecord> = host
            .list_existing_links(graph)
            .into_iter()
            .filter(|link| names.contains(link.from_node.as_str()) && names.contains(link.to_node.as_str()))
            .collect();
        document.links = links;
        document
    }

    fn node_record<H: HostGraphAdapter>(
        &self,
        host: &H,
        graph: H::GraphRef,
        kind: GraphKind,
        node: H::NodeRef,
    ) -> Option<NodeRecord> {
        let info = host.node_info(graph, node)?;
        let layout = info.layout;

        let inputs = host
            .list_input_sockets(graph, node)
            .into_iter()
            .map(|socket| SocketRecord {
                default_value: host
                    .get_default_value(graph, node, &socket.identifier)
                    .map(encode_value),
                name: socket.name,
                identifier: socket.identifier,
                enabled: socket.enabled,
            })
            .collect();

        let properties = host
            .node_properties(graph, node)
            .into_iter()
            .filter(|(key, _)| key != GROUP_TREE_PROPERTY)
            .map(|(key, value)| (key, encode_value(value)))
            .collect();

        // Group containment is acyclic in the host, so this terminates
        let body = match host.group_graph(graph, node) {
            Some(inner) => {
                let members = host.nodes(inner);
                tracing::debug!("Capturing group {} ({} nodes)", info.name, members.len());
                NodeBody::Group(Box::new(self.capture(host, inner, kind, &members)))
            }
            None => NodeBody::Leaf,
        };

        tracing::debug!("Captured node {} ({})", info.name, info.type_name);
        Some(NodeRecord {
            name: info.name,
            node_type: info.type_name,
            position: layout.position,
            size: layout.size,
            label: layout.label,
            muted: layout.muted,
            hidden: layout.hidden,
            color: layout.color,
            use_custom_color: layout.use_custom_color,
            inputs,
            properties,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodelib_graph::{GraphStore, NodeId, PortValue};

    fn compositing_scene() -> (GraphStore, nodelib_graph::GraphId, Vec<NodeId>) {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Compositing", GraphKind::Compositing);
        let layers = store.create_node(graph, "CompositorNodeRLayers").unwrap();
        let blur = store.create_node(graph, "CompositorNodeBlur").unwrap();
        let composite = store.create_node(graph, "CompositorNodeComposite").unwrap();
        let g = store.graph_mut(graph).unwrap();
        g.connect(layers, "Image", blur, "Image").unwrap();
        g.connect(blur, "Image", composite, "Image").unwrap();
        (store, graph, vec![layers, blur, composite])
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let (store, graph, _) = compositing_scene();
        let err = GraphSnapshotWriter::new().capture_selection(&store, Some(graph)).unwrap_err();
        assert!(matches!(err, SnapshotError::EmptySelection));
    }

    #[test]
    fn test_missing_graph_is_an_error() {
        let (store, _, _) = compositing_scene();
        let err = GraphSnapshotWriter::new()
            .capture_selection(&store, None::<nodelib_graph::GraphId>)
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NoHostGraph));
    }

    #[test]
    fn test_links_crossing_the_selection_are_dropped() {
        let (mut store, graph, nodes) = compositing_scene();
        let g = store.graph_mut(graph).unwrap();
        g.select(nodes[0]);
        g.select(nodes[1]);

        let doc = GraphSnapshotWriter::new().capture_selection(&store, Some(graph)).unwrap();
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.links, vec![LinkRecord::new("Render Layers", "Image", "Blur", "Image")]);
        assert_eq!(doc.graph_kind, GraphKind::Compositing);
        assert_eq!(doc.source_graph_name, "Compositing");
    }

    #[test]
    fn test_node_state_is_recorded() {
        let (mut store, graph, nodes) = compositing_scene();
        let node = store.graph_mut(graph).unwrap().node_mut(nodes[1]).unwrap();
        node.position = [120.0, -40.0];
        node.label = "Soften".to_string();
        node.muted = true;
        node.set_property("size_x", PortValue::Int(8));
        node.input_mut("Size").unwrap().set_default(PortValue::Float(0.25));

        let doc = GraphSnapshotWriter::new().capture_nodes(&store, graph, &[nodes[1]]).unwrap();
        let blur = doc.node("Blur").unwrap();
        assert_eq!(blur.node_type, "CompositorNodeBlur");
        assert_eq!(blur.position, [120.0, -40.0]);
        assert_eq!(blur.label, "Soften");
        assert!(blur.muted);
        assert_eq!(blur.properties["size_x"], Value::Int(8));
        assert_eq!(blur.input("Size").unwrap().default_value, Some(Value::Float(0.25)));
        assert_eq!(blur.input("Image").unwrap().default_value, None);
    }

    #[test]
    fn test_encode_value_fallbacks() {
        assert_eq!(
            encode_value(HostValue::Tuple(vec![1.0, 0.5, 0.0])),
            Value::Sequence(vec![Value::Float(1.0), Value::Float(0.5), Value::Float(0.0)])
        );
        assert_eq!(
            encode_value(HostValue::Sequence(vec![HostValue::Int(1), HostValue::Bool(true)])),
            Value::Sequence(vec![Value::Int(1), Value::Bool(true)])
        );
        assert_eq!(
            encode_value(HostValue::Opaque("Object(\"Cube\")".to_string())),
            Value::String("Object(\"Cube\")".to_string())
        );
    }

    #[test]
    fn test_group_nodes_embed_their_internal_graph() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Geometry Nodes", GraphKind::Geometry);
        let group = store.create_node(graph, "GeometryNodeGroup").unwrap();
        let inner = store.ensure_group_graph(graph, group, "Scatter").unwrap();
        let input = store.create_node(inner, "NodeGroupInput").unwrap();
        let points = store.create_node(inner, "GeometryNodeMeshToPoints").unwrap();
        store.graph_mut(inner).unwrap().connect(input, "Input_0", points, "Mesh").unwrap();

        let doc = GraphSnapshotWriter::new().capture_nodes(&store, graph, &[group]).unwrap();
        let nested = doc.nodes[0].group_document().unwrap();
        assert_eq!(nested.source_graph_name, "Scatter");
        assert_eq!(nested.node_count(), 2);
        assert_eq!(nested.link_count(), 1);
        assert_eq!(nested.graph_kind, GraphKind::Geometry);
    }
}
