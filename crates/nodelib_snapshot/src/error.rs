// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for snapshot capture and restore.

use nodelib_graph::GraphKind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Fatal errors. Every one of them is raised before the target graph is touched.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Capture was requested with no nodes selected
    #[error("Nothing selected to capture")]
    EmptySelection,

    /// No eligible graph was found
    #[error("No node graph available")]
    NoHostGraph,

    /// Document and target graph kinds differ
    #[error("Document is a {document} graph but the target is a {target} graph")]
    GraphKindMismatch {
        /// Kind recorded in the document (or a nested group document)
        document: GraphKind,
        /// Kind of the target graph
        target: GraphKind,
    },

    /// Structurally invalid document
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Filesystem or stream failure
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::MalformedDocument(err.to_string())
    }
}

/// A host refused an individual operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The host cannot instantiate this type in the graph
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Graph handle no longer valid
    #[error("Graph not found")]
    GraphNotFound,

    /// Node handle no longer valid
    #[error("Node not found")]
    NodeNotFound,

    /// No socket with this identifier
    #[error("Socket not found: {0}")]
    SocketNotFound(String),

    /// Value cannot be stored in the socket or property
    #[error("Value rejected for {target}: {reason}")]
    ValueRejected {
        /// Socket identifier or property key
        target: String,
        /// Why the host refused it
        reason: String,
    },

    /// Node has no setting with this key
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Host refused the connection
    #[error("Connection rejected: {0}")]
    ConnectionRejected(String),

    /// Node cannot hold an internal graph
    #[error("Not a group node: {0}")]
    NotAGroup(String),
}
