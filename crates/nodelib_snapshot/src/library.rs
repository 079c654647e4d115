// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named snapshot documents stored on disk.
//!
//! A library directory holds one JSON file per graph kind:
//!
//! | Kind        | File                     |
//! |-------------|--------------------------|
//! | Compositing | `compositing_nodes.json` |
//! | Shader      | `shader_nodes.json`      |
//! | Geometry    | `geometry_nodes.json`    |
//!
//! Each file is `{ "version": 1, "entries": { name: document } }` with
//! entries in insertion order. A missing file is an empty library.

use crate::document::GraphDocument;
use indexmap::IndexMap;
use nodelib_graph::GraphKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current library file format version
pub const LIBRARY_FORMAT_VERSION: u32 = 1;

/// Errors from library storage
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Filesystem failure
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Library file is not valid JSON or holds an invalid document
    #[error("Invalid library file: {0}")]
    Json(#[from] serde_json::Error),

    /// No entry with this name
    #[error("No {kind} library entry named {name}")]
    EntryNotFound {
        /// Library kind
        kind: GraphKind,
        /// Entry name
        name: String,
    },

    /// An entry with this name exists and overwriting was not requested
    #[error("A {kind} library entry named {name} already exists")]
    EntryExists {
        /// Library kind
        kind: GraphKind,
        /// Entry name
        name: String,
    },

    /// Entry names must not be blank
    #[error("Library entry names must not be empty")]
    EmptyName,

    /// Library file written by a newer version
    #[error("Library version {0} is newer than supported version {max}", max = LIBRARY_FORMAT_VERSION)]
    UnsupportedVersion(u32),
}

/// Listing information for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    /// Entry name
    pub name: String,
    /// Top-level node count
    pub node_count: usize,
    /// Top-level link count
    pub link_count: usize,
    /// Graph the entry was captured from
    pub source_graph_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    version: u32,
    #[serde(default)]
    entries: IndexMap<String, GraphDocument>,
}

/// A directory of per-kind library files
#[derive(Debug, Clone)]
pub struct NodeLibrary {
    root: PathBuf,
}

impl NodeLibrary {
    /// Open a library rooted at `root`. Nothing is read until needed.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name used for a graph kind
    pub fn file_name(kind: GraphKind) -> &'static str {
        match kind {
            GraphKind::Compositing => "compositing_nodes.json",
            GraphKind::Shader => "shader_nodes.json",
            GraphKind::Geometry => "geometry_nodes.json",
        }
    }

    /// Full path of the file for a graph kind
    pub fn file_path(&self, kind: GraphKind) -> PathBuf {
        self.root.join(Self::file_name(kind))
    }

    /// Summaries of every entry of a kind, in insertion order
    pub fn entries(&self, kind: GraphKind) -> Result<Vec<EntrySummary>, LibraryError> {
        let file = self.read(kind)?;
        Ok(file
            .entries
            .iter()
            .map(|(name, document)| EntrySummary {
                name: name.clone(),
                node_count: document.node_count(),
                link_count: document.link_count(),
                source_graph_name: document.source_graph_name.clone(),
            })
            .collect())
    }

    /// Load one entry
    pub fn load_entry(&self, kind: GraphKind, name: &str) -> Result<GraphDocument, LibraryError> {
        self.read(kind)?
            .entries
            .shift_remove(name)
            .ok_or_else(|| LibraryError::EntryNotFound {
                kind,
                name: name.to_string(),
            })
    }

    /// Store `document` under `name` in the library of its graph kind.
    ///
    /// An existing entry keeps its position when overwritten.
    pub fn save_entry(&self, name: &str, document: &GraphDocument, overwrite: bool) -> Result<(), LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName);
        }

        let kind = document.graph_kind;
        let mut file = self.read(kind)?;
        if !overwrite && file.entries.contains_key(name) {
            return Err(LibraryError::EntryExists {
                kind,
                name: name.to_string(),
            });
        }
        file.entries.insert(name.to_string(), document.clone());
        self.write(kind, file)?;
        tracing::info!("Saved {} ({} nodes) to the {} library", name, document.node_count(), kind);
        Ok(())
    }

    /// Delete an entry, returning it
    pub fn remove_entry(&self, kind: GraphKind, name: &str) -> Result<GraphDocument, LibraryError> {
        let mut file = self.read(kind)?;
        let document = file.entries.shift_remove(name).ok_or_else(|| LibraryError::EntryNotFound {
            kind,
            name: name.to_string(),
        })?;
        self.write(kind, file)?;
        tracing::info!("Removed {} from the {} library", name, kind);
        Ok(document)
    }

    /// Rename an entry in place
    pub fn rename_entry(&self, kind: GraphKind, from: &str, to: &str) -> Result<(), LibraryError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(LibraryError::EmptyName);
        }

        let mut file = self.read(kind)?;
        if from != to && file.entries.contains_key(to) {
            return Err(LibraryError::EntryExists {
                kind,
                name: to.to_string(),
            });
        }
        let (index, _, document) = file
            .entries
            .shift_remove_full(from)
            .ok_or_else(|| LibraryError::EntryNotFound {
                kind,
                name: from.to_string(),
            })?;
        file.entries.shift_insert(index, to.to_string(), document);
        self.write(kind, file)?;
        tracing::info!("Renamed {} library entry {} to {}", kind, from, to);
        Ok(())
    }

    fn read(&self, kind: GraphKind) -> Result<LibraryFile, LibraryError> {
        let path = self.file_path(kind);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No library file at {}", path.display());
                return Ok(LibraryFile {
                    version: LIBRARY_FORMAT_VERSION,
                    entries: IndexMap::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let file: LibraryFile = serde_json::from_str(&content)?;
        if file.version > LIBRARY_FORMAT_VERSION {
            return Err(LibraryError::UnsupportedVersion(file.version));
        }
        Ok(file)
    }

    fn write(&self, kind: GraphKind, mut file: LibraryFile) -> Result<(), LibraryError> {
        file.version = LIBRARY_FORMAT_VERSION;
        std::fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(self.file_path(kind), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{LinkRecord, NodeRecord};
    use tempfile::TempDir;

    fn document(kind: GraphKind, nodes: &[&str]) -> GraphDocument {
        let mut doc = GraphDocument::new(kind, "Source");
        for name in nodes {
            doc.nodes.push(NodeRecord::new(*name, "NodeReroute"));
        }
        if nodes.len() > 1 {
            doc.links.push(LinkRecord::new(nodes[0], "Output", nodes[1], "Input"));
        }
        doc
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let library = NodeLibrary::new(dir.path().join("not-yet"));
        assert!(library.entries(GraphKind::Shader).unwrap().is_empty());
        assert!(matches!(
            library.load_entry(GraphKind::Shader, "Anything"),
            Err(LibraryError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_save_and_load_entries() {
        let dir = TempDir::new().unwrap();
        let library = NodeLibrary::new(dir.path().join("library"));
        let chain = document(GraphKind::Compositing, &["A", "B"]);
        library.save_entry("Chain", &chain, false).unwrap();
        library.save_entry("Single", &document(GraphKind::Compositing, &["C"]), false).unwrap();

        assert!(dir.path().join("library").join("compositing_nodes.json").exists());
        assert!(library.entries(GraphKind::Shader).unwrap().is_empty());

        let entries = library.entries(GraphKind::Compositing).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Chain", "Single"]);
        assert_eq!(entries[0].node_count, 2);
        assert_eq!(entries[0].link_count, 1);

        assert_eq!(library.load_entry(GraphKind::Compositing, "Chain").unwrap(), chain);
    }

    #[test]
    fn test_overwrite_requires_permission() {
        let dir = TempDir::new().unwrap();
        let library = NodeLibrary::new(dir.path());
        library.save_entry("First", &document(GraphKind::Geometry, &["A"]), false).unwrap();
        library.save_entry("Chain", &document(GraphKind::Geometry, &["A"]), false).unwrap();

        let replacement = document(GraphKind::Geometry, &["A", "B"]);
        assert!(matches!(
            library.save_entry("First", &replacement, false),
            Err(LibraryError::EntryExists { .. })
        ));
        library.save_entry("First", &replacement, true).unwrap();

        let entries = library.entries(GraphKind::Geometry).unwrap();
        assert_eq!(entries[0].name, "First");
        assert_eq!(entries[0].node_count, 2);
        assert!(matches!(
            library.save_entry("  ", &replacement, true),
            Err(LibraryError::EmptyName)
        ));
    }

    #[test]
    fn test_rename_keeps_position() {
        let dir = TempDir::new().unwrap();
        let library = NodeLibrary::new(dir.path());
        for name in ["One", "Two", "Three"] {
            library.save_entry(name, &document(GraphKind::Shader, &["A"]), false).unwrap();
        }

        library.rename_entry(GraphKind::Shader, "Two", "Deux").unwrap();
        let names: Vec<String> = library
            .entries(GraphKind::Shader)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["One", "Deux", "Three"]);

        assert!(matches!(
            library.rename_entry(GraphKind::Shader, "One", "Three"),
            Err(LibraryError::EntryExists { .. })
        ));
        assert!(matches!(
            library.rename_entry(GraphKind::Shader, "Two", "Zwei"),
            Err(LibraryError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_entry() {
        let dir = TempDir::new().unwrap();
        let library = NodeLibrary::new(dir.path());
        library.save_entry("Chain", &document(GraphKind::Shader, &["A", "B"]), false).unwrap();

        let removed = library.remove_entry(GraphKind::Shader, "Chain").unwrap();
        assert_eq!(removed.node_count(), 2);
        assert!(library.entries(GraphKind::Shader).unwrap().is_empty());
        assert!(library.remove_entry(GraphKind::Shader, "Chain").is_err());
    }

    #[test]
    fn test_newer_library_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let library = NodeLibrary::new(dir.path());
        std::fs::write(library.file_path(GraphKind::Shader), r#"{ "version": 2, "entries": {} }"#).unwrap();
        assert!(matches!(
            library.entries(GraphKind::Shader),
            Err(LibraryError::UnsupportedVersion(2))
        ));
    }
}
