// SPDX-License-Identifier: MIT OR Apache-2.0
//! The host interface consumed by the writer and restorer.
//!
//! Graph engines expose their node systems in wildly different ways. The
//! snapshot code only talks to them through [`HostGraphAdapter`], which
//! names exactly the operations capture and restore need.

use crate::document::{LinkRecord, Value};
use crate::error::HostError;
use nodelib_graph::GraphKind;
use std::fmt;
use std::hash::Hash;

/// A value read from a live socket or node setting, before serialization
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Fixed-size numeric tuple (vector, color, euler)
    Tuple(Vec<f64>),
    /// Any other iterable
    Sequence(Vec<HostValue>),
    /// String
    String(String),
    /// Value with no portable form, carried as its display representation
    Opaque(String),
}

/// Visual state of a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    /// Position in graph coordinates
    pub position: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
    /// Display label
    pub label: String,
    /// Mute flag
    pub muted: bool,
    /// Hide (collapse) flag
    pub hidden: bool,
    /// Custom color
    pub color: [f32; 3],
    /// Whether the custom color is shown
    pub use_custom_color: bool,
}

/// Read-only description of a live node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    /// Node name, unique within its graph
    pub name: String,
    /// Host type tag
    pub type_name: String,
    /// Visual state
    pub layout: NodeLayout,
}

/// Read-only description of a live socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketInfo {
    /// Stable identifier
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Whether the socket is enabled
    pub enabled: bool,
}

/// Operations a graph engine exposes to snapshot capture and restore.
///
/// Handles are cheap copies owned by the host. Methods taking a stale
/// handle return `None`, an empty list, or [`HostError::NodeNotFound`].
pub trait HostGraphAdapter {
    /// Handle to a graph
    type GraphRef: Copy + Eq + fmt::Debug;
    /// Handle to a node
    type NodeRef: Copy + Eq + Hash + fmt::Debug;

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Kind of a graph, `None` when the handle is stale
    fn graph_kind(&self, graph: Self::GraphRef) -> Option<GraphKind>;

    /// Name of a graph
    fn graph_name(&self, graph: Self::GraphRef) -> Option<String>;

    /// All nodes of a graph in host order
    fn nodes(&self, graph: Self::GraphRef) -> Vec<Self::NodeRef>;

    /// Selected nodes of a graph in host order
    fn selected_nodes(&self, graph: Self::GraphRef) -> Vec<Self::NodeRef>;

    /// Name, type and layout of a node
    fn node_info(&self, graph: Self::GraphRef, node: Self::NodeRef) -> Option<NodeInfo>;

    /// Input sockets of a node in node order
    fn list_input_sockets(&self, graph: Self::GraphRef, node: Self::NodeRef) -> Vec<SocketInfo>;

    /// Output sockets of a node in node order
    fn list_output_sockets(&self, graph: Self::GraphRef, node: Self::NodeRef) -> Vec<SocketInfo>;

    /// Default value of an input socket, `None` when it has none
    fn get_default_value(
        &self,
        graph: Self::GraphRef,
        node: Self::NodeRef,
        identifier: &str,
    ) -> Option<HostValue>;

    /// Node settings worth persisting
    fn node_properties(&self, graph: Self::GraphRef, node: Self::NodeRef) -> Vec<(String, HostValue)>;

    /// Internal graph of a group node
    fn group_graph(&self, graph: Self::GraphRef, node: Self::NodeRef) -> Option<Self::GraphRef>;

    /// Existing links, with endpoints named by node name and socket identifier
    fn list_existing_links(&self, graph: Self::GraphRef) -> Vec<LinkRecord>;

    /// Every instantiable type identifier starting with `kind_prefix`
    fn known_type_identifiers(&self, kind_prefix: &str) -> Vec<String>;

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Instantiate a node of `type_name`
    fn create_node(&mut self, graph: Self::GraphRef, type_name: &str) -> Result<Self::NodeRef, HostError>;

    /// Rename a node. Callers guarantee uniqueness.
    fn set_node_name(&mut self, graph: Self::GraphRef, node: Self::NodeRef, name: &str) -> Result<(), HostError>;

    /// Apply the supported parts of a layout
    fn apply_layout(&mut self, graph: Self::GraphRef, node: Self::NodeRef, layout: &NodeLayout) -> Result<(), HostError>;

    /// Change a node setting
    fn set_property(
        &mut self,
        graph: Self::GraphRef,
        node: Self::NodeRef,
        key: &str,
        value: &Value,
    ) -> Result<(), HostError>;

    /// Change an input socket's default value
    fn set_default_value(
        &mut self,
        graph: Self::GraphRef,
        node: Self::NodeRef,
        identifier: &str,
        value: &Value,
    ) -> Result<(), HostError>;

    /// Enable or disable an input socket
    fn set_socket_enabled(
        &mut self,
        graph: Self::GraphRef,
        node: Self::NodeRef,
        identifier: &str,
        enabled: bool,
    ) -> Result<(), HostError>;

    /// Connect an output socket to an input socket
    fn connect(
        &mut self,
        graph: Self::GraphRef,
        from_node: Self::NodeRef,
        from_socket: &str,
        to_node: Self::NodeRef,
        to_socket: &str,
    ) -> Result<(), HostError>;

    /// Internal graph of a group node, created if it has none
    fn ensure_group_graph(
        &mut self,
        graph: Self::GraphRef,
        node: Self::NodeRef,
        name: &str,
    ) -> Result<Self::GraphRef, HostError>;

    /// Remove every node and link from a graph
    fn clear_graph(&mut self, graph: Self::GraphRef) -> Result<(), HostError>;

    /// Replace the selection and active node
    fn set_selection(
        &mut self,
        graph: Self::GraphRef,
        nodes: &[Self::NodeRef],
        active: Option<Self::NodeRef>,
    ) -> Result<(), HostError>;
}
