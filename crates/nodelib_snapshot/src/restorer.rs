// SPDX-License-Identifier: MIT OR Apache-2.0
//! Replay a [`GraphDocument`] onto a live graph.
//!
//! Restoring runs in three passes over the document:
//!
//! 1. Nodes, in document order. Each gets a unique name, its layout shifted
//!    by the placement offset, its settings and socket defaults. Group nodes
//!    restore their nested document into their own internal graph.
//! 2. Links, in document order, resolved through the recorded node names.
//! 3. Selection: the new nodes become the selection.
//!
//! Fatal problems are detected before anything is created. Everything after
//! that is best effort: a node or link that cannot be restored is recorded
//! in the [`RestoreReport`] and skipped.

use crate::adapter::{HostGraphAdapter, NodeLayout};
use crate::document::{GraphDocument, LinkRecord, NodeBody, NodeRecord};
use crate::error::{Result, SnapshotError};
use crate::report::{RestoreIssue, RestoreReport};
use crate::resolver::TypeNameResolver;
use indexmap::IndexMap;
use nodelib_graph::{unique_name, GraphKind};
use std::collections::HashSet;

/// Horizontal gap between existing nodes and appended ones
pub const DEFAULT_PLACEMENT_MARGIN: f32 = 200.0;

/// How a document is applied to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreMode {
    /// Add next to the existing nodes and select the result
    Append,
    /// Restore into a graph that was just cleared, at recorded positions
    Replace,
}

/// Caller-tunable restore settings
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOptions {
    /// Fixed placement offset, overriding the computed one
    pub offset: Option<[f32; 2]>,
    /// Gap to the right of the existing nodes
    pub margin: f32,
    /// Select the created nodes when appending
    pub select_imported: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            offset: None,
            margin: DEFAULT_PLACEMENT_MARGIN,
            select_imported: true,
        }
    }
}

impl RestoreOptions {
    /// Place nodes at their recorded position plus `offset`
    pub fn with_offset(mut self, offset: [f32; 2]) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the gap to the existing nodes
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Choose whether created nodes are selected
    pub fn with_selection(mut self, select_imported: bool) -> Self {
        self.select_imported = select_imported;
        self
    }
}

/// A created node and the name it ended up with
struct Restored<N> {
    node: N,
    name: String,
}

/// Applies documents to a host graph
#[derive(Debug, Clone, Default)]
pub struct GraphRestorer {
    resolver: TypeNameResolver,
    options: RestoreOptions,
}

impl GraphRestorer {
    /// Create a restorer
    pub fn new(resolver: TypeNameResolver, options: RestoreOptions) -> Self {
        Self { resolver, options }
    }

    /// Append `document` to `target`.
    ///
    /// Fails without touching the graph if the target is gone or any part
    /// of the document belongs to a different graph kind.
    pub fn restore<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        target: H::GraphRef,
        document: &GraphDocument,
    ) -> Result<RestoreReport> {
        let kind = host.graph_kind(target).ok_or(SnapshotError::NoHostGraph)?;
        document.validate_kind(kind)?;

        let report = self.restore_into(host, target, kind, document, RestoreMode::Append);
        tracing::info!(
            "Restored {} into {}: {}",
            document.source_graph_name,
            host.graph_name(target).unwrap_or_default(),
            report
        );
        Ok(report)
    }

    fn restore_into<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        graph: H::GraphRef,
        kind: GraphKind,
        document: &GraphDocument,
        mode: RestoreMode,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();
        let offset = self.placement_offset(host, graph, document, mode);
        let mut taken: HashSet<String> = host
            .nodes(graph)
            .into_iter()
            .filter_map(|node| host.node_info(graph, node))
            .map(|info| info.name)
            .collect();

        // Pass 1: nodes
        let mut restored: IndexMap<&str, Restored<H::NodeRef>> = IndexMap::new();
        let mut created = Vec::new();
        for record in &document.nodes {
            let Some(node) = self.instantiate(host, graph, kind, record) else {
                report.nodes_skipped += 1;
                report.push(RestoreIssue::UnknownNodeType {
                    node: record.name.clone(),
                    node_type: record.node_type.clone(),
                });
                continue;
            };

            let name = self.assign_name(host, graph, node, &record.name, &mut taken, &mut report);
            self.apply_record(host, graph, kind, node, &name, record, offset, &mut report);

            tracing::debug!("Restored node {} as {}", record.name, name);
            report.nodes_created += 1;
            report.created_names.push(name.clone());
            created.push(node);
            restored.entry(record.name.as_str()).or_insert(Restored { node, name });
        }

        // Pass 2: links
        let mut existing: HashSet<LinkRecord> = host.list_existing_links(graph).into_iter().collect();
        for link in &document.links {
            match self.connect(host, graph, link, &restored, &existing) {
                Ok(actual) => {
                    tracing::debug!(
                        "Linked {}:{} -> {}:{}",
                        actual.from_node,
                        actual.from_socket_identifier,
                        actual.to_node,
                        actual.to_socket_identifier
                    );
                    existing.insert(actual);
                    report.links_created += 1;
                }
                Err(issue) => {
                    report.links_skipped += 1;
                    report.push(issue);
                }
            }
        }

        // Pass 3: selection
        if mode == RestoreMode::Append && self.options.select_imported && !created.is_empty() {
            if let Err(e) = host.set_selection(graph, &created, created.first().copied()) {
                tracing::warn!("Could not select restored nodes: {}", e);
            }
        }

        report
    }

    /// Offset added to every recorded position
    fn placement_offset<H: HostGraphAdapter>(
        &self,
        host: &H,
        graph: H::GraphRef,
        document: &GraphDocument,
        mode: RestoreMode,
    ) -> [f32; 2] {
        if mode == RestoreMode::Replace {
            return [0.0, 0.0];
        }
        if let Some(offset) = self.options.offset {
            return offset;
        }

        let right_edge = host
            .nodes(graph)
            .into_iter()
            .filter_map(|node| host.node_info(graph, node))
            .map(|info| info.layout.position[0] + info.layout.size[0])
            .reduce(f32::max);
        let left_edge = document.nodes.iter().map(|n| n.position[0]).reduce(f32::min);

        match (right_edge, left_edge) {
            (Some(right), Some(left)) => [right + self.options.margin - left, 0.0],
            _ => [0.0, 0.0],
        }
    }

    /// Create a node of the recorded type or the first fallback the host accepts
    fn instantiate<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        graph: H::GraphRef,
        kind: GraphKind,
        record: &NodeRecord,
    ) -> Option<H::NodeRef> {
        match host.create_node(graph, &record.node_type) {
            Ok(node) => return Some(node),
            Err(e) => tracing::debug!("Cannot create {} as {}: {}", record.name, record.node_type, e),
        }

        let candidates = self
            .resolver
            .candidates(&record.node_type, kind, |prefix| host.known_type_identifiers(prefix));
        for candidate in candidates {
            if let Ok(node) = host.create_node(graph, &candidate) {
                tracing::info!("Restored {} ({}) as {}", record.name, record.node_type, candidate);
                return Some(node);
            }
        }
        None
    }

    fn assign_name<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        graph: H::GraphRef,
        node: H::NodeRef,
        recorded: &str,
        taken: &mut HashSet<String>,
        report: &mut RestoreReport,
    ) -> String {
        let wanted = unique_name(recorded, taken);
        let name = match host.set_node_name(graph, node, &wanted) {
            Ok(()) => wanted,
            Err(e) => {
                report.push(RestoreIssue::LayoutRejected {
                    node: recorded.to_string(),
                    reason: e.to_string(),
                });
                host.node_info(graph, node).map_or(wanted, |info| info.name)
            }
        };
        taken.insert(name.clone());
        name
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_record<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        graph: H::GraphRef,
        kind: GraphKind,
        node: H::NodeRef,
        name: &str,
        record: &NodeRecord,
        offset: [f32; 2],
        report: &mut RestoreReport,
    ) {
        let layout = NodeLayout {
            position: [record.position[0] + offset[0], record.position[1] + offset[1]],
            size: record.size,
            label: record.label.clone(),
            muted: record.muted,
            hidden: record.hidden,
            color: record.color,
            use_custom_color: record.use_custom_color,
        };
        if let Err(e) = host.apply_layout(graph, node, &layout) {
            report.push(RestoreIssue::LayoutRejected {
                node: name.to_string(),
                reason: e.to_string(),
            });
        }

        for (key, value) in &record.properties {
            if let Err(e) = host.set_property(graph, node, key, value) {
                report.push(RestoreIssue::PropertyRejected {
                    node: name.to_string(),
                    key: key.clone(),
                    reason: e.to_string(),
                });
            }
        }

        if let NodeBody::Group(nested) = &record.body {
            self.restore_group(host, graph, kind, node, name, nested, report);
        }

        let sockets = host.list_input_sockets(graph, node);
        for socket in &record.inputs {
            let Some(live) = sockets.iter().find(|s| s.identifier == socket.identifier) else {
                report.push(RestoreIssue::MissingSocket {
                    node: name.to_string(),
                    identifier: socket.identifier.clone(),
                });
                continue;
            };

            if let Some(value) = &socket.default_value {
                if let Err(e) = host.set_default_value(graph, node, &socket.identifier, value) {
                    report.push(RestoreIssue::ValueRejected {
                        node: name.to_string(),
                        identifier: socket.identifier.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            if live.enabled != socket.enabled {
                if let Err(e) = host.set_socket_enabled(graph, node, &socket.identifier, socket.enabled) {
                    report.push(RestoreIssue::ValueRejected {
                        node: name.to_string(),
                        identifier: socket.identifier.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn restore_group<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        graph: H::GraphRef,
        kind: GraphKind,
        node: H::NodeRef,
        name: &str,
        nested: &GraphDocument,
        report: &mut RestoreReport,
    ) {
        let graph_name = if nested.source_graph_name.is_empty() {
            name
        } else {
            nested.source_graph_name.as_str()
        };

        let inner = host
            .ensure_group_graph(graph, node, graph_name)
            .and_then(|inner| host.clear_graph(inner).map(|()| inner));
        match inner {
            Ok(inner) => {
                tracing::debug!("Restoring group {} ({} nodes)", name, nested.node_count());
                let nested_report = self.restore_into(host, inner, kind, nested, RestoreMode::Replace);
                report.groups.insert(name.to_string(), nested_report);
            }
            Err(e) => report.push(RestoreIssue::GroupRejected {
                node: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Resolve and create one link, returning it as it now exists in the graph
    fn connect<H: HostGraphAdapter>(
        &self,
        host: &mut H,
        graph: H::GraphRef,
        link: &LinkRecord,
        restored: &IndexMap<&str, Restored<H::NodeRef>>,
        existing: &HashSet<LinkRecord>,
    ) -> std::result::Result<LinkRecord, RestoreIssue> {
        let (from, to) = match (
            restored.get(link.from_node.as_str()),
            restored.get(link.to_node.as_str()),
        ) {
            (Some(from), Some(to)) => (from, to),
            (from, _) => {
                let missing = if from.is_none() { &link.from_node } else { &link.to_node };
                return Err(RestoreIssue::LinkEndpointMissing {
                    from_node: link.from_node.clone(),
                    to_node: link.to_node.clone(),
                    missing: missing.clone(),
                });
            }
        };

        let has_output = host
            .list_output_sockets(graph, from.node)
            .iter()
            .any(|s| s.identifier == link.from_socket_identifier);
        if !has_output {
            return Err(RestoreIssue::MissingSocket {
                node: from.name.clone(),
                identifier: link.from_socket_identifier.clone(),
            });
        }
        let has_input = host
            .list_input_sockets(graph, to.node)
            .iter()
            .any(|s| s.identifier == link.to_socket_identifier);
        if !has_input {
            return Err(RestoreIssue::MissingSocket {
                node: to.name.clone(),
                identifier: link.to_socket_identifier.clone(),
            });
        }

        let actual = LinkRecord::new(
            &from.name,
            &link.from_socket_identifier,
            &to.name,
            &link.to_socket_identifier,
        );
        if existing.contains(&actual) {
            return Err(RestoreIssue::DuplicateLinkSkipped {
                from_node: actual.from_node,
                from_socket: actual.from_socket_identifier,
                to_node: actual.to_node,
                to_socket: actual.to_socket_identifier,
            });
        }

        host.connect(
            graph,
            from.node,
            &link.from_socket_identifier,
            to.node,
            &link.to_socket_identifier,
        )
        .map_err(|e| RestoreIssue::LinkRejected {
            from_node: actual.from_node.clone(),
            from_socket: actual.from_socket_identifier.clone(),
            to_node: actual.to_node.clone(),
            to_socket: actual.to_socket_identifier.clone(),
            reason: e.to_string(),
        })?;
        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SocketRecord, Value};
    use crate::reader::GraphSnapshotReader;
    use crate::writer::GraphSnapshotWriter;
    use nodelib_graph::{GraphId, GraphStore, PortValue};

    fn restorer() -> GraphRestorer {
        GraphRestorer::default()
    }

    fn blur_chain(store: &mut GraphStore) -> GraphId {
        let graph = store.create_graph("Compositing", GraphKind::Compositing);
        let layers = store.create_node(graph, "CompositorNodeRLayers").unwrap();
        let blur = store.create_node(graph, "CompositorNodeBlur").unwrap();
        let composite = store.create_node(graph, "CompositorNodeComposite").unwrap();

        let g = store.graph_mut(graph).unwrap();
        g.connect(layers, "Image", blur, "Image").unwrap();
        g.connect(blur, "Image", composite, "Image").unwrap();
        g.node_mut(blur).unwrap().position = [300.0, 20.0];
        g.node_mut(composite).unwrap().position = [600.0, 0.0];

        let blur = g.node_mut(blur).unwrap();
        blur.label = "Soften".to_string();
        blur.use_custom_color = true;
        blur.color = [0.2, 0.4, 0.6];
        blur.set_property("filter_type", PortValue::String("FAST_GAUSS".to_string()));
        blur.set_property("size_x", PortValue::Int(12));
        blur.input_mut("Size").unwrap().set_default(PortValue::Float(0.25));
        graph
    }

    fn capture_all(store: &GraphStore, graph: GraphId) -> GraphDocument {
        let nodes = store.nodes(graph);
        GraphSnapshotWriter::new().capture_nodes(store, graph, &nodes).unwrap()
    }

    fn math_node(name: &str) -> NodeRecord {
        NodeRecord::new(name, "ShaderNodeMath")
    }

    #[test]
    fn test_round_trip_into_empty_graph() {
        let mut store = GraphStore::new();
        let source = blur_chain(&mut store);
        let document = capture_all(&store, source);

        let json = document.to_json_pretty().unwrap();
        let parsed = GraphSnapshotReader::new().read_str(&json).unwrap();
        assert_eq!(parsed, document);

        let target = store.create_graph("Compositing.001", GraphKind::Compositing);
        let report = restorer().restore(&mut store, target, &parsed).unwrap();
        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.nodes_created, 3);
        assert_eq!(report.links_created, 2);

        let restored = capture_all(&store, target);
        assert_eq!(restored.nodes, document.nodes);
        assert_eq!(restored.links, document.links);
    }

    #[test]
    fn test_repeated_import_numbers_names() {
        let mut store = GraphStore::new();
        let graph = blur_chain(&mut store);
        let blur = store.graph(graph).unwrap().node_by_name("Blur").unwrap().id;
        let document = GraphSnapshotWriter::new().capture_nodes(&store, graph, &[blur]).unwrap();

        let first = restorer().restore(&mut store, graph, &document).unwrap();
        let second = restorer().restore(&mut store, graph, &document).unwrap();
        assert_eq!(first.created_names, vec!["Blur.001"]);
        assert_eq!(second.created_names, vec!["Blur.002"]);
        assert!(store.graph(graph).unwrap().node_by_name("Blur").is_some());
    }

    #[test]
    fn test_link_idempotence() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Material", GraphKind::Shader);

        let mut document = GraphDocument::new(GraphKind::Shader, "Material");
        document.nodes.push(math_node("A"));
        document.nodes.push(math_node("B"));
        let link = LinkRecord::new("A", "Value", "B", "Value");
        document.links = vec![link.clone(), link];

        let report = restorer().restore(&mut store, graph, &document).unwrap();
        assert_eq!(report.links_created, 1);
        assert_eq!(report.links_skipped, 1);
        assert!(matches!(report.issues[0], RestoreIssue::DuplicateLinkSkipped { .. }));
        assert_eq!(store.graph(graph).unwrap().connection_count(), 1);
    }

    #[test]
    fn test_restoring_twice_never_duplicates_links() {
        let mut store = GraphStore::new();
        let graph = blur_chain(&mut store);
        let document = capture_all(&store, graph);

        for _ in 0..2 {
            let report = restorer().restore(&mut store, graph, &document).unwrap();
            assert!(report.is_clean(), "{:?}", report.issues);
            assert_eq!(report.links_created, 2);
            assert_eq!(report.links_skipped, 0);
        }

        let g = store.graph(graph).unwrap();
        assert_eq!(g.node_count(), 9);
        assert_eq!(g.connection_count(), 6);
        let distinct: HashSet<_> = g.connections().map(|c| (c.from.clone(), c.to.clone())).collect();
        assert_eq!(distinct.len(), 6);

        // Each copy is wired to itself, not to the nodes it was copied from
        let blur = g.node_by_name("Blur.002").unwrap().id;
        let feeding: Vec<&str> = g
            .connections()
            .filter(|c| c.to.node == blur)
            .filter_map(|c| g.node(c.from.node))
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(feeding, vec!["Render Layers.002"]);
    }

    #[test]
    fn test_kind_mismatch_creates_nothing() {
        let mut store = GraphStore::new();
        let source = blur_chain(&mut store);
        let document = capture_all(&store, source);
        let target = store.create_graph("Material", GraphKind::Shader);

        let err = restorer().restore(&mut store, target, &document).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::GraphKindMismatch { document: GraphKind::Compositing, target: GraphKind::Shader }
        ));
        assert_eq!(store.graph(target).unwrap().node_count(), 0);
    }

    #[test]
    fn test_nested_kind_mismatch_creates_nothing() {
        let mut store = GraphStore::new();
        let target = store.create_graph("Geometry Nodes", GraphKind::Geometry);

        let mut group = NodeRecord::new("Group", "GeometryNodeGroup");
        group.body = NodeBody::Group(Box::new(GraphDocument::new(GraphKind::Shader, "Inner")));
        let mut document = GraphDocument::new(GraphKind::Geometry, "Geometry Nodes");
        document.nodes.push(NodeRecord::new("Cube", "GeometryNodeMeshCube"));
        document.nodes.push(group);

        assert!(restorer().restore(&mut store, target, &document).is_err());
        assert_eq!(store.graph(target).unwrap().node_count(), 0);
    }

    #[test]
    fn test_missing_target_graph() {
        let mut store = GraphStore::new();
        let document = GraphDocument::new(GraphKind::Shader, "Material");
        let err = restorer().restore(&mut store, GraphId::new(), &document).unwrap_err();
        assert!(matches!(err, SnapshotError::NoHostGraph));
    }

    #[test]
    fn test_dangling_link_is_skipped() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Material", GraphKind::Shader);

        let mut document = GraphDocument::new(GraphKind::Shader, "Material");
        document.nodes.push(math_node("A"));
        document.nodes.push(math_node("B"));
        document.links.push(LinkRecord::new("Gone", "Value", "B", "Value_001"));
        document.links.push(LinkRecord::new("A", "Value", "B", "Value"));

        let report = restorer().restore(&mut store, graph, &document).unwrap();
        assert_eq!(report.links_created, 1);
        assert_eq!(report.links_skipped, 1);
        assert_eq!(
            report.issues,
            vec![RestoreIssue::LinkEndpointMissing {
                from_node: "Gone".to_string(),
                to_node: "B".to_string(),
                missing: "Gone".to_string(),
            }]
        );
    }

    fn scatter_group(name: &str) -> NodeRecord {
        let mut inner = GraphDocument::new(GraphKind::Geometry, "Scatter");
        inner.nodes.push(NodeRecord::new("Group Input", "NodeGroupInput"));
        inner.nodes.push(NodeRecord::new("Mesh to Points", "GeometryNodeMeshToPoints"));
        inner.nodes.push(NodeRecord::new("Group Output", "NodeGroupOutput"));
        inner.links.push(LinkRecord::new("Group Input", "Input_0", "Mesh to Points", "Mesh"));
        inner.links.push(LinkRecord::new("Mesh to Points", "Points", "Group Output", "Output_0"));

        let mut group = NodeRecord::new(name, "GeometryNodeGroup");
        group.body = NodeBody::Group(Box::new(inner));
        group
    }

    #[test]
    fn test_nested_group_restore() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Geometry Nodes", GraphKind::Geometry);
        let mut document = GraphDocument::new(GraphKind::Geometry, "Geometry Nodes");
        document.nodes.push(scatter_group("Group"));

        let first = restorer().restore(&mut store, graph, &document).unwrap();
        let second = restorer().restore(&mut store, graph, &document).unwrap();

        assert_eq!(first.groups["Group"].nodes_created, 3);
        assert_eq!(first.groups["Group"].links_created, 2);
        assert_eq!(second.groups["Group.001"].nodes_created, 3);
        assert_eq!(first.total_nodes_created(), 4);

        let g = store.graph(graph).unwrap();
        assert_eq!(g.node_count(), 2);
        let inner_graphs: Vec<GraphId> = g.nodes().filter_map(|n| n.group).collect();
        assert_eq!(inner_graphs.len(), 2);
        assert_ne!(inner_graphs[0], inner_graphs[1]);
        let names: Vec<&str> = inner_graphs.iter().map(|id| store.graph(*id).unwrap().name.as_str()).collect();
        assert_eq!(names, vec!["Scatter", "Scatter.001"]);
        for inner in inner_graphs {
            let inner = store.graph(inner).unwrap();
            assert_eq!(inner.node_count(), 3);
            assert_eq!(inner.connection_count(), 2);
            assert!(inner.node_by_name("Group Input").is_some());
        }
    }

    #[test]
    fn test_edited_group_contents_are_restored() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Geometry Nodes", GraphKind::Geometry);
        let mut document = GraphDocument::new(GraphKind::Geometry, "Geometry Nodes");
        document.nodes.push(scatter_group("Group"));
        restorer().restore(&mut store, graph, &document).unwrap();

        let group = store.graph(graph).unwrap().node_by_name("Group").unwrap().id;
        let inner = store.ensure_group_graph(graph, group, "Scatter").unwrap();
        store.create_node(inner, "GeometryNodeMeshCube").unwrap();

        let snapshot = GraphSnapshotWriter::new().capture_nodes(&store, graph, &[group]).unwrap();
        assert_eq!(snapshot.nodes[0].group_document().unwrap().node_count(), 4);

        let target = store.create_graph("Geometry Nodes.001", GraphKind::Geometry);
        let report = restorer().restore(&mut store, target, &snapshot).unwrap();
        assert_eq!(report.groups["Group"].nodes_created, 4);
        assert_eq!(report.groups["Group"].links_created, 2);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Geometry Nodes", GraphKind::Geometry);

        let mut document = GraphDocument::new(GraphKind::Geometry, "Geometry Nodes");
        document.nodes.push(NodeRecord::new("Scatter", "MESH_TO_POINTS"));
        document.nodes.push(NodeRecord::new("Frame", "FRAME"));
        document.nodes.push(NodeRecord::new("Portal", "GeometryNodeTeleport"));

        let report = restorer().restore(&mut store, graph, &document).unwrap();
        assert_eq!(report.nodes_created, 2);
        assert_eq!(report.nodes_skipped, 1);
        assert_eq!(
            report.issues,
            vec![RestoreIssue::UnknownNodeType {
                node: "Portal".to_string(),
                node_type: "GeometryNodeTeleport".to_string(),
            }]
        );

        let g = store.graph(graph).unwrap();
        assert_eq!(g.node_by_name("Scatter").unwrap().node_type, "GeometryNodeMeshToPoints");
        assert_eq!(g.node_by_name("Frame").unwrap().node_type, "NodeFrame");
    }

    #[test]
    fn test_missing_socket_is_a_warning() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Compositing", GraphKind::Compositing);

        let mut blur = NodeRecord::new("Blur", "CompositorNodeBlur");
        blur.inputs.push(SocketRecord {
            name: "Radius".to_string(),
            identifier: "Radius".to_string(),
            default_value: Some(Value::Float(3.0)),
            enabled: true,
        });
        blur.inputs.push(SocketRecord {
            name: "Size".to_string(),
            identifier: "Size".to_string(),
            default_value: Some(Value::Float(0.5)),
            enabled: true,
        });
        let mut document = GraphDocument::new(GraphKind::Compositing, "Compositing");
        document.nodes.push(blur);

        let report = restorer().restore(&mut store, graph, &document).unwrap();
        assert_eq!(report.nodes_created, 1);
        assert_eq!(
            report.issues,
            vec![RestoreIssue::MissingSocket {
                node: "Blur".to_string(),
                identifier: "Radius".to_string(),
            }]
        );
        let node = store.graph(graph).unwrap().node_by_name("Blur").unwrap();
        assert_eq!(node.input("Size").unwrap().default_value, Some(PortValue::Float(0.5)));
    }

    #[test]
    fn test_link_to_missing_socket_is_skipped() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Material", GraphKind::Shader);

        let mut document = GraphDocument::new(GraphKind::Shader, "Material");
        document.nodes.push(math_node("A"));
        document.nodes.push(math_node("B"));
        document.links.push(LinkRecord::new("A", "Value", "B", "Value_009"));

        let report = restorer().restore(&mut store, graph, &document).unwrap();
        assert_eq!(report.links_skipped, 1);
        assert!(matches!(&report.issues[0], RestoreIssue::MissingSocket { identifier, .. } if identifier == "Value_009"));
    }

    #[test]
    fn test_placement_offset() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Material", GraphKind::Shader);
        store.create_node(graph, "ShaderNodeMath").unwrap();

        let mut document = GraphDocument::new(GraphKind::Shader, "Material");
        let mut record = math_node("Math");
        record.position = [50.0, -30.0];
        document.nodes.push(record);

        // Existing right edge 140, margin 200, document left edge 50
        restorer().restore(&mut store, graph, &document).unwrap();
        let placed = store.graph(graph).unwrap().node_by_name("Math.001").unwrap();
        assert_eq!(placed.position, [340.0, -30.0]);

        let fixed = GraphRestorer::new(TypeNameResolver::default(), RestoreOptions::default().with_offset([10.0, 20.0]));
        fixed.restore(&mut store, graph, &document).unwrap();
        let placed = store.graph(graph).unwrap().node_by_name("Math.002").unwrap();
        assert_eq!(placed.position, [60.0, -10.0]);
    }

    #[test]
    fn test_restored_nodes_become_the_selection() {
        let mut store = GraphStore::new();
        let graph = store.create_graph("Material", GraphKind::Shader);
        let existing = store.create_node(graph, "ShaderNodeMath").unwrap();
        store.graph_mut(graph).unwrap().select(existing);

        let mut document = GraphDocument::new(GraphKind::Shader, "Material");
        document.nodes.push(math_node("A"));
        document.nodes.push(math_node("B"));
        restorer().restore(&mut store, graph, &document).unwrap();

        let g = store.graph(graph).unwrap();
        let selected: Vec<&str> = g.selected_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(selected, vec!["A", "B"]);
        assert_eq!(g.active_node(), Some(g.node_by_name("A").unwrap().id));

        let quiet = GraphRestorer::new(TypeNameResolver::default(), RestoreOptions::default().with_selection(false));
        quiet.restore(&mut store, graph, &document).unwrap();
        let selected = store.graph(graph).unwrap().selected_nodes().count();
        assert_eq!(selected, 2);
    }
}
