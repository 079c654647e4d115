// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene-level container owning every graph, including group internals.
//!
//! Group nodes do not embed their internal graph. They reference another
//! graph in the same store by [`GraphId`], so a group graph can be shared
//! by several group nodes.

use crate::graph::{Graph, GraphId, GraphKind};
use crate::graphs::create_registry;
use crate::naming::unique_name;
use crate::node::{NodeId, NodeRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Current scene file format version
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// Node type registries for every graph kind
#[derive(Debug, Clone)]
pub struct TypeRegistries {
    compositing: NodeRegistry,
    shader: NodeRegistry,
    geometry: NodeRegistry,
}

impl TypeRegistries {
    /// Registries populated with the builtin node types
    pub fn builtin() -> Self {
        Self {
            compositing: create_registry(GraphKind::Compositing),
            shader: create_registry(GraphKind::Shader),
            geometry: create_registry(GraphKind::Geometry),
        }
    }

    /// Get the registry for a graph kind
    pub fn for_kind(&self, kind: GraphKind) -> &NodeRegistry {
        match kind {
            GraphKind::Compositing => &self.compositing,
            GraphKind::Shader => &self.shader,
            GraphKind::Geometry => &self.geometry,
        }
    }

    /// Every known type ID starting with `prefix`, without duplicates
    pub fn known_type_ids(&self, prefix: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for kind in GraphKind::all() {
            for id in self.for_kind(*kind).ids_with_prefix(prefix) {
                if !ids.iter().any(|known| known == id) {
                    ids.push(id.to_string());
                }
            }
        }
        ids
    }
}

impl Default for TypeRegistries {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Collection of graphs making up a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStore {
    /// Format version
    pub version: u32,
    /// Graphs by ID
    graphs: IndexMap<GraphId, Graph>,
    /// Available node types
    #[serde(skip)]
    registries: TypeRegistries,
}

impl GraphStore {
    /// Create an empty store with the builtin node types
    pub fn new() -> Self {
        Self {
            version: SCENE_FORMAT_VERSION,
            graphs: IndexMap::new(),
            registries: TypeRegistries::builtin(),
        }
    }

    /// Node type registries
    pub fn registries(&self) -> &TypeRegistries {
        &self.registries
    }

    /// Create a new empty graph
    pub fn create_graph(&mut self, name: impl Into<String>, kind: GraphKind) -> GraphId {
        let graph = Graph::new(name, kind);
        let id = graph.id;
        self.graphs.insert(id, graph);
        id
    }

    /// Get a graph by ID
    pub fn graph(&self, graph_id: GraphId) -> Option<&Graph> {
        self.graphs.get(&graph_id)
    }

    /// Get a mutable graph by ID
    pub fn graph_mut(&mut self, graph_id: GraphId) -> Option<&mut Graph> {
        self.graphs.get_mut(&graph_id)
    }

    /// Find a graph by name
    pub fn graph_by_name(&self, name: &str) -> Option<&Graph> {
        self.graphs.values().find(|g| g.name == name)
    }

    /// Get all graphs
    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.values()
    }

    /// Instantiate a node of `type_id` in a graph.
    ///
    /// Only types registered for the graph's kind can be created.
    pub fn create_node(&mut self, graph_id: GraphId, type_id: &str) -> Result<NodeId, StoreError> {
        let graph = self.graphs.get_mut(&graph_id)
            .ok_or(StoreError::GraphNotFound(graph_id))?;
        let node = self.registries.for_kind(graph.kind).create_node(type_id)
            .ok_or_else(|| StoreError::UnknownNodeType {
                type_id: type_id.to_string(),
                kind: graph.kind,
            })?;
        tracing::trace!("Created {} in graph {}", type_id, graph.name);
        Ok(graph.add_node(node))
    }

    /// Get the internal graph of a group node, creating it if needed.
    ///
    /// A new internal graph takes `name`, numbered if another graph already
    /// uses it.
    pub fn ensure_group_graph(
        &mut self,
        graph_id: GraphId,
        node_id: NodeId,
        name: &str,
    ) -> Result<GraphId, StoreError> {
        let graph = self.graphs.get(&graph_id)
            .ok_or(StoreError::GraphNotFound(graph_id))?;
        let kind = graph.kind;
        let node = graph.node(node_id)
            .ok_or(StoreError::NodeNotFound(node_id))?;
        if !node.is_group {
            return Err(StoreError::NotAGroupNode(node.name.clone()));
        }

        if let Some(existing) = node.group.filter(|id| self.graphs.contains_key(id)) {
            return Ok(existing);
        }

        let taken: HashSet<String> = self.graphs.values().map(|g| g.name.clone()).collect();
        let group_id = self.create_graph(unique_name(name, &taken), kind);
        if let Some(node) = self.graphs.get_mut(&graph_id).and_then(|g| g.node_mut(node_id)) {
            node.group = Some(group_id);
        }
        Ok(group_id)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Save the store to a scene file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = self.to_ron().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Load a store from a scene file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_ron(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if store.version > SCENE_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Scene version {} is newer than supported version {}",
                    store.version, SCENE_FORMAT_VERSION
                ),
            ));
        }

        Ok(store)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Error raised by graph store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Graph not found
    #[error("Graph not found: {0:?}")]
    GraphNotFound(GraphId),

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Type is not registered for the graph's kind
    #[error("Unknown node type {type_id} for {kind} graphs")]
    UnknownNodeType {
        /// Requested type ID
        type_id: String,
        /// Kind of the target graph
        kind: GraphKind,
    },

    /// Node cannot hold an internal graph
    #[error("Node is not a group node: {0}")]
    NotAGroupNode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_node_respects_kind() {
        let mut store = GraphStore::new();
        let comp = store.create_graph("Compositing", GraphKind::Compositing);

        assert!(store.create_node(comp, "CompositorNodeBlur").is_ok());
        let err = store.create_node(comp, "GeometryNodeMeshToPoints").unwrap_err();
        assert!(matches!(err, StoreError::UnknownNodeType { .. }));
    }

    #[test]
    fn test_group_graph_is_created_once() {
        let mut store = GraphStore::new();
        let geo = store.create_graph("Geometry Nodes", GraphKind::Geometry);
        let group = store.create_node(geo, "GeometryNodeGroup").unwrap();

        let inner = store.ensure_group_graph(geo, group, "Scatter").unwrap();
        let again = store.ensure_group_graph(geo, group, "Scatter").unwrap();
        assert_eq!(inner, again);
        assert_eq!(store.graph(inner).unwrap().kind, GraphKind::Geometry);

        let second = store.create_node(geo, "GeometryNodeGroup").unwrap();
        let other = store.ensure_group_graph(geo, second, "Scatter").unwrap();
        assert_eq!(store.graph(other).unwrap().name, "Scatter.001");
        assert_eq!(store.graph_by_name("Scatter").unwrap().id, inner);

        let plain = store.create_node(geo, "GeometryNodeSetPosition").unwrap();
        assert!(matches!(
            store.ensure_group_graph(geo, plain, "Nope"),
            Err(StoreError::NotAGroupNode(_))
        ));
    }

    #[test]
    fn test_known_type_ids_span_kinds() {
        let registries = TypeRegistries::builtin();
        let shader_ids = registries.known_type_ids("ShaderNode");
        assert!(shader_ids.iter().any(|id| id == "ShaderNodeBsdfPrincipled"));
        assert_eq!(shader_ids.iter().filter(|id| *id == "ShaderNodeMath").count(), 1);
    }

    #[test]
    fn test_scene_serialization() {
        let mut store = GraphStore::new();
        let comp = store.create_graph("Compositing", GraphKind::Compositing);
        store.create_node(comp, "CompositorNodeGlare").unwrap();

        let ron = store.to_ron().unwrap();
        let loaded = GraphStore::from_ron(&ron).unwrap();
        let graph = loaded.graph_by_name("Compositing").unwrap();
        assert_eq!(graph.node_count(), 1);
        assert!(loaded.registries().for_kind(GraphKind::Compositing).get("CompositorNodeGlare").is_some());
    }
}
