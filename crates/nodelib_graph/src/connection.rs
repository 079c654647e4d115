// SPDX-License-Identifier: MIT OR Apache-2.0
//! Links between sockets.
//!
//! A link always runs from an output socket to an input socket. Both ends
//! are stored as a [`SocketRef`], which names a socket by its identifier
//! rather than its display name.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link handle, stable for the lifetime of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Fresh random handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One end of a link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    /// Owning node
    pub node: NodeId,
    /// Socket identifier on `node`
    pub socket: String,
}

impl SocketRef {
    /// Point at `socket` on `node`
    pub fn new(node: NodeId, socket: impl Into<String>) -> Self {
        Self { node, socket: socket.into() }
    }

    /// True when this end sits on `socket` of `node`
    pub fn is(&self, node: NodeId, socket: &str) -> bool {
        self.node == node && self.socket == socket
    }
}

/// A directed link, output end first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Link handle
    pub id: ConnectionId,
    /// Output end
    pub from: SocketRef,
    /// Input end
    pub to: SocketRef,
}

impl Connection {
    /// Link two ends under a fresh handle
    pub fn new(from: SocketRef, to: SocketRef) -> Self {
        Self { id: ConnectionId::new(), from, to }
    }

    /// True when the link feeds `socket` on `node`
    pub fn targets(&self, node: NodeId, socket: &str) -> bool {
        self.to.is(node, socket)
    }

    /// True when the link has exactly these two ends
    pub fn joins(&self, from: &SocketRef, to: &SocketRef) -> bool {
        self.from == *from && self.to == *to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_endpoint_queries() {
        let mix = NodeId::new();
        let out = NodeId::new();
        let link = Connection::new(SocketRef::new(mix, "Image"), SocketRef::new(out, "Image"));

        assert!(link.targets(out, "Image"));
        assert!(!link.targets(mix, "Image"));
        assert!(!link.targets(out, "Alpha"));

        assert!(link.joins(&SocketRef::new(mix, "Image"), &SocketRef::new(out, "Image")));
        assert!(!link.joins(&SocketRef::new(out, "Image"), &SocketRef::new(mix, "Image")));
    }
}
