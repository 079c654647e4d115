// SPDX-License-Identifier: MIT OR Apache-2.0
//! Builtin node type registries, one per graph kind.

pub mod common;
pub mod compositing;
pub mod geometry;
pub mod shader;

use crate::graph::GraphKind;
use crate::node::NodeRegistry;

/// Create the builtin registry for a graph kind
pub fn create_registry(kind: GraphKind) -> NodeRegistry {
    match kind {
        GraphKind::Compositing => compositing::create_compositing_registry(),
        GraphKind::Shader => shader::create_shader_registry(),
        GraphKind::Geometry => geometry::create_geometry_registry(),
    }
}
