// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parse durable bytes back into a [`GraphDocument`].

use crate::document::GraphDocument;
use crate::error::{Result, SnapshotError};
use std::io::Read;
use std::path::Path;

/// Stateless document parser.
///
/// Only the document structure is checked. Whether the nodes and links make
/// sense for a particular graph is the restorer's business.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphSnapshotReader;

impl GraphSnapshotReader {
    /// Create a reader
    pub fn new() -> Self {
        Self
    }

    /// Parse a document from a JSON string
    pub fn read_str(&self, json: &str) -> Result<GraphDocument> {
        let document: GraphDocument = serde_json::from_str(json)?;
        tracing::debug!(
            "Read {} document with {} nodes and {} links",
            document.graph_kind,
            document.node_count(),
            document.link_count()
        );
        Ok(document)
    }

    /// Parse a document from raw bytes
    pub fn read_slice(&self, bytes: &[u8]) -> Result<GraphDocument> {
        let json = std::str::from_utf8(bytes)
            .map_err(|e| SnapshotError::MalformedDocument(format!("invalid UTF-8: {e}")))?;
        self.read_str(json)
    }

    /// Parse a document from a stream
    pub fn read_from<R: Read>(&self, mut reader: R) -> Result<GraphDocument> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.read_slice(&bytes)
    }

    /// Parse a document file
    pub fn read_file(&self, path: &Path) -> Result<GraphDocument> {
        let bytes = std::fs::read(path)?;
        self.read_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{LinkRecord, Value};
    use nodelib_graph::GraphKind;

    const BLUR_CHAIN: &str = r#"{
        "nodes": [
            {
                "name": "Render Layers",
                "type": "CompositorNodeRLayers",
                "position": [0.0, 0.0],
                "inputs": [],
                "properties": {},
                "exporter": "legacy"
            },
            {
                "name": "Blur",
                "type": "CompositorNodeBlur",
                "position": [300.0, 0.0],
                "inputs": [
                    { "name": "Image", "identifier": "Image", "default_value": [0.8, 0.8, 0.8, 1.0], "enabled": true },
                    { "name": "Size", "identifier": "Size", "default_value": 0.5, "enabled": true }
                ],
                "properties": { "filter_type": "FAST_GAUSS", "use_relative": false }
            }
        ],
        "links": [
            { "from_node": "Render Layers", "from_socket_identifier": "Image",
              "to_node": "Blur", "to_socket_identifier": "Image" }
        ],
        "graph_kind": "COMPOSITING",
        "source_graph_name": "Compositing",
        "created_with": "4.2"
    }"#;

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc = GraphSnapshotReader::new().read_str(BLUR_CHAIN).unwrap();
        assert_eq!(doc.graph_kind, GraphKind::Compositing);
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.version, 1);

        let blur = doc.node("Blur").unwrap();
        assert_eq!(blur.properties["filter_type"], Value::String("FAST_GAUSS".to_string()));
        assert_eq!(blur.input("Size").unwrap().default_value, Some(Value::Float(0.5)));
        assert_eq!(doc.links[0], LinkRecord::new("Render Layers", "Image", "Blur", "Image"));
    }

    #[test]
    fn test_missing_required_keys() {
        let reader = GraphSnapshotReader::new();
        for json in [
            r#"{ "links": [], "graph_kind": "SHADER" }"#,
            r#"{ "nodes": [], "graph_kind": "SHADER" }"#,
            r#"{ "nodes": [], "links": [] }"#,
            r#"{ "nodes": [{ "type": "ShaderNodeMath" }], "links": [], "graph_kind": "SHADER" }"#,
            r#"{ "nodes": [], "links": [{ "from_node": "A" }], "graph_kind": "SHADER" }"#,
        ] {
            let err = reader.read_str(json).unwrap_err();
            assert!(matches!(err, SnapshotError::MalformedDocument(_)), "{json}");
        }
    }

    #[test]
    fn test_unknown_graph_kind_is_malformed() {
        let err = GraphSnapshotReader::new()
            .read_str(r#"{ "nodes": [], "links": [], "graph_kind": "TEXTURE" }"#)
            .unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedDocument(_)));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let err = GraphSnapshotReader::new()
            .read_str(r#"{ "nodes": [], "links": [], "graph_kind": "SHADER", "version": 7 }"#)
            .unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedDocument(_)));
    }

    #[test]
    fn test_dangling_links_still_parse() {
        let json = r#"{
            "nodes": [{ "name": "Math", "type": "ShaderNodeMath" }],
            "links": [{ "from_node": "Gone", "from_socket_identifier": "Value",
                        "to_node": "Math", "to_socket_identifier": "Value" }],
            "graph_kind": "SHADER"
        }"#;
        let doc = GraphSnapshotReader::new().read_slice(json.as_bytes()).unwrap();
        assert_eq!(doc.link_count(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let err = GraphSnapshotReader::new().read_from(&[0xff, 0xfe, 0x00][..]).unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedDocument(_)));
    }
}
