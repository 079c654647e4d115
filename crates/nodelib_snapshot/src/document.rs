// SPDX-License-Identifier: MIT OR Apache-2.0
//! Portable snapshot document.
//!
//! On disk a document is JSON:
//!
//! ```json
//! { "nodes": [...], "links": [...], "graph_kind": "COMPOSITING",
//!   "source_graph_name": "Compositing", "version": 1 }
//! ```
//!
//! Group nodes carry their internal graph as a nested document under the
//! `group_node_tree` key of their `properties`. In memory that payload is
//! lifted out into [`NodeBody::Group`]. Unknown fields are ignored.

use crate::error::{Result, SnapshotError};
use indexmap::IndexMap;
use nodelib_graph::GraphKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Property key holding a group node's nested document
pub const GROUP_TREE_PROPERTY: &str = "group_node_tree";

/// Default node size when a record omits it
pub const DEFAULT_RECORD_SIZE: [f32; 2] = [140.0, 100.0];

/// Default node color when a record omits it
pub const DEFAULT_RECORD_COLOR: [f32; 3] = [0.608, 0.608, 0.608];

/// A serialized socket or property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Ordered sequence (vectors, colors, coerced iterables)
    Sequence(Vec<Value>),
    /// String, including the fallback representation of opaque values
    String(String),
}

impl Value {
    /// Convert from JSON. `null` and objects have no representation, and
    /// neither does an array holding one, so sequences keep their length.
    pub fn from_json(json: &Json) -> Option<Value> {
        match json {
            Json::Null | Json::Object(_) => None,
            Json::Bool(b) => Some(Value::Bool(*b)),
            Json::Number(n) => n.as_i64().map(Value::Int).or_else(|| n.as_f64().map(Value::Float)),
            Json::String(s) => Some(Value::String(s.clone())),
            Json::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Sequence),
        }
    }

    /// Convert to JSON. Non-finite floats are written as `"nan"`, `"inf"`
    /// and `"-inf"`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or_else(
                || Json::String(non_finite_name(*f).to_string()),
                Json::Number,
            ),
            Value::Sequence(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::String(s) => Json::String(s.clone()),
        }
    }

    /// Numeric view of a scalar, including the written form of non-finite floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => match s.as_str() {
                "nan" => Some(f64::NAN),
                "inf" => Some(f64::INFINITY),
                "-inf" => Some(f64::NEG_INFINITY),
                _ => None,
            },
            Value::Sequence(_) => None,
        }
    }

    /// Numeric view of a sequence whose items are all scalars
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            Value::Sequence(items) => items.iter().map(Value::as_f64).collect(),
            _ => None,
        }
    }
}

fn non_finite_name(f: f64) -> &'static str {
    if f.is_nan() {
        "nan"
    } else if f.is_sign_negative() {
        "-inf"
    } else {
        "inf"
    }
}

/// An input socket of a captured node
#[derive(Debug, Clone, PartialEq)]
pub struct SocketRecord {
    /// Display name, may repeat within a node
    pub name: String,
    /// Stable identifier, the join key on restore
    pub identifier: String,
    /// Default value, `None` for sockets without one
    pub default_value: Option<Value>,
    /// Whether the socket was enabled
    pub enabled: bool,
}

/// A connection between two captured nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Source node name
    pub from_node: String,
    /// Source output socket identifier
    pub from_socket_identifier: String,
    /// Target node name
    pub to_node: String,
    /// Target input socket identifier
    pub to_socket_identifier: String,
}

impl LinkRecord {
    /// Create a link record
    pub fn new(
        from_node: impl Into<String>,
        from_socket_identifier: impl Into<String>,
        to_node: impl Into<String>,
        to_socket_identifier: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_socket_identifier: from_socket_identifier.into(),
            to_node: to_node.into(),
            to_socket_identifier: to_socket_identifier.into(),
        }
    }
}

/// Body of a captured node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    /// Plain node
    Leaf,
    /// Group node with its internal graph
    Group(Box<GraphDocument>),
}

/// A captured node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Name, unique within the source graph
    pub name: String,
    /// Host type tag used to instantiate the node
    pub node_type: String,
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
    /// Input sockets in node order
    pub inputs: Vec<SocketRecord>,
    /// Node settings
    pub properties: IndexMap<String, Value>,
    /// Leaf or group payload
    pub body: NodeBody,
}

impl NodeRecord {
    /// Create a record with default layout and no sockets
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            position: [0.0, 0.0],
            size: DEFAULT_RECORD_SIZE,
            label: String::new(),
            muted: false,
            hidden: false,
            color: DEFAULT_RECORD_COLOR,
            use_custom_color: false,
            inputs: Vec::new(),
            properties: IndexMap::new(),
            body: NodeBody::Leaf,
        }
    }

    /// Get an input socket by identifier
    pub fn input(&self, identifier: &str) -> Option<&SocketRecord> {
        self.inputs.iter().find(|s| s.identifier == identifier)
    }

    /// Nested document of a group node
    pub fn group_document(&self) -> Option<&GraphDocument> {
        match &self.body {
            NodeBody::Group(document) => Some(document),
            NodeBody::Leaf => None,
        }
    }
}

/// A captured subgraph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDocument {
    /// Captured nodes in capture order
    pub nodes: Vec<NodeRecord>,
    /// Links whose endpoints are both captured
    pub links: Vec<LinkRecord>,
    /// Kind of the source graph
    pub graph_kind: GraphKind,
    /// Name of the source graph
    pub source_graph_name: String,
    /// Format version
    pub version: u32,
}

impl GraphDocument {
    /// Create an empty document
    pub fn new(graph_kind: GraphKind, source_graph_name: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            graph_kind,
            source_graph_name: source_graph_name.into(),
            version: DOCUMENT_FORMAT_VERSION,
        }
    }

    /// Find a node record by name
    pub fn node(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Number of top-level nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of top-level links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Check that this document and every nested group document match `target`
    pub fn validate_kind(&self, target: GraphKind) -> Result<()> {
        if self.graph_kind != target {
            return Err(SnapshotError::GraphKindMismatch {
                document: self.graph_kind,
                target,
            });
        }
        self.nodes
            .iter()
            .filter_map(NodeRecord::group_document)
            .try_for_each(|nested| nested.validate_kind(target))
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn to_raw(&self) -> serde_json::Result<RawDocument> {
        let nodes = self
            .nodes
            .iter()
            .map(NodeRecord::to_raw)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(RawDocument {
            nodes,
            links: self.links.clone(),
            graph_kind: Some(self.graph_kind),
            source_graph_name: self.source_graph_name.clone(),
            version: self.version,
        })
    }
}

impl Serialize for GraphDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GraphDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawDocument::deserialize(deserializer)?
            .into_document(None)
            .map_err(serde::de::Error::custom)
    }
}

impl NodeRecord {
    fn to_raw(&self) -> serde_json::Result<RawNode> {
        let mut properties: IndexMap<String, Json> = self
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        if let NodeBody::Group(document) = &self.body {
            properties.insert(
                GROUP_TREE_PROPERTY.to_string(),
                serde_json::to_value(document.to_raw()?)?,
            );
        }

        Ok(RawNode {
            name: self.name.clone(),
            node_type: self.node_type.clone(),
            position: self.position,
            size: self.size,
            label: self.label.clone(),
            muted: self.muted,
            hidden: self.hidden,
            color: self.color,
            use_custom_color: self.use_custom_color,
            inputs: self
                .inputs
                .iter()
                .map(|socket| RawSocket {
                    name: socket.name.clone(),
                    identifier: socket.identifier.clone(),
                    default_value: socket.default_value.as_ref().map_or(Json::Null, Value::to_json),
                    enabled: socket.enabled,
                })
                .collect(),
            properties,
        })
    }
}

// ============================================================================
// Wire representation
// ============================================================================

fn default_version() -> u32 {
    DOCUMENT_FORMAT_VERSION
}

fn default_size() -> [f32; 2] {
    DEFAULT_RECORD_SIZE
}

fn default_color() -> [f32; 3] {
    DEFAULT_RECORD_COLOR
}

fn default_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
struct RawDocument {
    nodes: Vec<RawNode>,
    links: Vec<LinkRecord>,
    // Nested group documents written by older exporters omit the kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    graph_kind: Option<GraphKind>,
    #[serde(default)]
    source_graph_name: String,
    #[serde(default = "default_version")]
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct RawNode {
    name: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    position: [f32; 2],
    #[serde(default = "default_size")]
    size: [f32; 2],
    #[serde(default)]
    label: String,
    #[serde(default)]
    muted: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default = "default_color")]
    color: [f32; 3],
    #[serde(default)]
    use_custom_color: bool,
    #[serde(default)]
    inputs: Vec<RawSocket>,
    #[serde(default)]
    properties: IndexMap<String, Json>,
}

#[derive(Serialize, Deserialize)]
struct RawSocket {
    #[serde(default)]
    name: String,
    identifier: String,
    #[serde(default)]
    default_value: Json,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

impl RawDocument {
    fn into_document(self, inherited: Option<GraphKind>) -> std::result::Result<GraphDocument, String> {
        if self.version > DOCUMENT_FORMAT_VERSION {
            return Err(format!(
                "document version {} is newer than supported version {}",
                self.version, DOCUMENT_FORMAT_VERSION
            ));
        }
        let graph_kind = self
            .graph_kind
            .or(inherited)
            .ok_or_else(|| "missing field `graph_kind`".to_string())?;

        let nodes = self
            .nodes
            .into_iter()
            .map(|node| node.into_record(graph_kind))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(GraphDocument {
            nodes,
            links: self.links,
            graph_kind,
            source_graph_name: self.source_graph_name,
            version: self.version,
        })
    }
}

impl RawNode {
    fn into_record(self, graph_kind: GraphKind) -> std::result::Result<NodeRecord, String> {
        let mut body = NodeBody::Leaf;
        let mut properties = IndexMap::new();

        for (key, json) in self.properties {
            if key == GROUP_TREE_PROPERTY {
                if json.is_null() {
                    continue;
                }
                let raw: RawDocument = serde_json::from_value(json)
                    .map_err(|e| format!("node `{}`: invalid {GROUP_TREE_PROPERTY}: {e}", self.name))?;
                let nested = raw
                    .into_document(Some(graph_kind))
                    .map_err(|e| format!("node `{}`: {e}", self.name))?;
                body = NodeBody::Group(Box::new(nested));
            } else if let Some(value) = Value::from_json(&json) {
                properties.insert(key, value);
            } else {
                tracing::debug!("Ignoring property {} of node {}: no portable value", key, self.name);
            }
        }

        let inputs = self
            .inputs
            .into_iter()
            .map(|socket| SocketRecord {
                name: socket.name,
                identifier: socket.identifier,
                default_value: Value::from_json(&socket.default_value),
                enabled: socket.enabled,
            })
            .collect();

        Ok(NodeRecord {
            name: self.name,
            node_type: self.node_type,
            position: self.position,
            size: self.size,
            label: self.label,
            muted: self.muted,
            hidden: self.hidden,
            color: self.color,
            use_custom_color: self.use_custom_color,
            inputs,
            properties,
            body,
        })
    }
}
