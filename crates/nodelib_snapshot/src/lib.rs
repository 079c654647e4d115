// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot and restore of node graph selections.
//!
//! Artists build node networks once and want them again elsewhere: in
//! another material, another scene, another file. This crate captures a
//! selection of nodes into a portable JSON [`GraphDocument`] and replays it
//! into any graph of the same kind.
//!
//! ## Architecture
//!
//! - [`GraphSnapshotWriter`] walks a live selection, read-only
//! - [`GraphSnapshotReader`] parses documents back
//! - [`GraphRestorer`] replays a document: nodes, then links, then selection
//! - [`TypeNameResolver`] finds stand-ins for node types the host lacks
//! - [`NodeLibrary`] keeps named documents on disk, one file per graph kind
//!
//! Every graph engine is reached through [`HostGraphAdapter`]. The
//! [`memory`] module implements it for the in-memory `nodelib_graph` store.

pub mod adapter;
pub mod document;
pub mod error;
pub mod library;
pub mod memory;
pub mod reader;
pub mod report;
pub mod resolver;
pub mod restorer;
pub mod writer;

pub use adapter::{HostGraphAdapter, HostValue, NodeInfo, NodeLayout, SocketInfo};
pub use document::{GraphDocument, LinkRecord, NodeBody, NodeRecord, SocketRecord, Value};
pub use error::{HostError, Result, SnapshotError};
pub use library::{EntrySummary, LibraryError, NodeLibrary};
pub use reader::GraphSnapshotReader;
pub use report::{RestoreIssue, RestoreReport};
pub use resolver::{RenameRule, TypeNameResolver, DEFAULT_RENAMES};
pub use nodelib_graph::unique_name;
pub use restorer::{GraphRestorer, RestoreMode, RestoreOptions, DEFAULT_PLACEMENT_MARGIN};
pub use writer::{encode_value, GraphSnapshotWriter};
