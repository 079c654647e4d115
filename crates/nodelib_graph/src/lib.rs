// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory node graph host for `nodelib`.
//!
//! This crate models the graphs a 3D content-creation application exposes
//! to its add-ons:
//! - Compositor graphs
//! - Material/shader graphs
//! - Geometry node graphs
//!
//! ## Architecture
//!
//! A [`GraphStore`] owns every graph of a scene. Graphs hold nodes and
//! connections; group nodes point at another graph in the same store.
//! Node types come from per-kind registries, so only types valid for a
//! graph's kind can be instantiated in it. Ports are addressed by stable
//! identifiers rather than display names.

pub mod connection;
pub mod graph;
pub mod graphs;
pub mod naming;
pub mod node;
pub mod port;
pub mod store;

pub use connection::{Connection, ConnectionId, SocketRef};
pub use naming::unique_name;
pub use graph::{ConnectionError, Graph, GraphId, GraphKind, UnknownGraphKind};
pub use node::{Node, NodeCategory, NodeId, NodeRegistry, NodeType};
pub use port::{Port, PortDirection, PortType, PortValue};
pub use store::{GraphStore, StoreError, TypeRegistries};
