// SPDX-License-Identifier: MIT OR Apache-2.0
//! Subcommand implementations.
//!
//! Scene files are RON [`GraphStore`]s. Snapshot documents go to JSON files,
//! to stdout, or to the node library configured in [`AppConfig`].

use crate::config::AppConfig;
use nodelib_graph::{GraphId, GraphKind, GraphStore, NodeId, StoreError};
use nodelib_snapshot::{
    unique_name, GraphDocument, GraphRestorer, GraphSnapshotReader, GraphSnapshotWriter, LibraryError,
    NodeBody, NodeLibrary, SnapshotError, TypeNameResolver,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Errors reported by subcommands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filesystem failure
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Capture or restore failed
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Library storage failed
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Scene edit failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Link refused by the graph
    #[error("Cannot link: {0}")]
    Connection(#[from] nodelib_graph::ConnectionError),

    /// No graph with this name in the scene
    #[error("No graph named {0}")]
    GraphNotFound(String),

    /// A graph with this name already exists
    #[error("A graph named {0} already exists")]
    GraphExists(String),

    /// No node with this name in the graph
    #[error("No node named {name} in {graph}")]
    NodeNotFound {
        /// Graph name
        graph: String,
        /// Node name
        name: String,
    },

    /// Import needs a document source
    #[error("Pass either --file or --entry")]
    NoSource,
}

/// Result of a subcommand
pub type CommandResult = Result<(), CommandError>;

/// Parse `x,y`
pub fn parse_pair(s: &str) -> Result<[f32; 2], String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected x,y but got {s}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad x in {s}: {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad y in {s}: {e}"))?;
    Ok([x, y])
}

/// A link into a newly added node: `NODE:OUTPUT=INPUT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Existing source node name
    pub from_node: String,
    /// Output socket identifier on the source node
    pub from_socket: String,
    /// Input socket identifier on the new node
    pub to_socket: String,
}

/// Parse `NODE:OUTPUT=INPUT`
pub fn parse_link(s: &str) -> Result<LinkSpec, String> {
    let (from, to_socket) = s.split_once('=').ok_or_else(|| format!("expected NODE:OUTPUT=INPUT but got {s}"))?;
    let (from_node, from_socket) = from
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NODE:OUTPUT before '=' in {s}"))?;
    Ok(LinkSpec {
        from_node: from_node.to_string(),
        from_socket: from_socket.to_string(),
        to_socket: to_socket.to_string(),
    })
}

fn load_scene_or_new(path: &Path) -> std::io::Result<GraphStore> {
    if path.exists() {
        GraphStore::load(path)
    } else {
        Ok(GraphStore::new())
    }
}

fn find_graph(store: &GraphStore, name: &str) -> Result<GraphId, CommandError> {
    store
        .graph_by_name(name)
        .map(|g| g.id)
        .ok_or_else(|| CommandError::GraphNotFound(name.to_string()))
}

fn find_node(store: &GraphStore, graph: GraphId, name: &str) -> Result<NodeId, CommandError> {
    let graph = store
        .graph(graph)
        .ok_or_else(|| CommandError::GraphNotFound(format!("{graph:?}")))?;
    graph
        .node_by_name(name)
        .map(|n| n.id)
        .ok_or_else(|| CommandError::NodeNotFound {
            graph: graph.name.clone(),
            name: name.to_string(),
        })
}

// ============================================================================
// Scene editing
// ============================================================================

/// Create a graph in a scene file
#[derive(Debug, clap::Args)]
pub struct NewGraphArgs {
    /// Scene file, created if missing
    pub scene: PathBuf,
    /// Graph name
    #[arg(long)]
    pub name: String,
    /// Graph kind: compositing, shader or geometry
    #[arg(long)]
    pub kind: GraphKind,
}

/// Create a graph
pub fn new_graph(args: NewGraphArgs) -> CommandResult {
    let mut store = load_scene_or_new(&args.scene)?;
    if store.graph_by_name(&args.name).is_some() {
        return Err(CommandError::GraphExists(args.name));
    }
    store.create_graph(args.name.clone(), args.kind);
    store.save(&args.scene)?;
    println!("Created {} graph {}", args.kind, args.name);
    Ok(())
}

/// Add a node to a graph
#[derive(Debug, clap::Args)]
pub struct AddNodeArgs {
    /// Scene file
    pub scene: PathBuf,
    /// Graph name
    #[arg(long)]
    pub graph: String,
    /// Node type identifier
    #[arg(long = "type")]
    pub node_type: String,
    /// Node name, defaults to the type's display name
    #[arg(long)]
    pub name: Option<String>,
    /// Position as x,y
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub at: Option<[f32; 2]>,
    /// Link an existing output into the new node, as NODE:OUTPUT=INPUT
    #[arg(long = "link", value_parser = parse_link)]
    pub links: Vec<LinkSpec>,
    /// Add the node to the selection
    #[arg(long)]
    pub select: bool,
}

/// Add a node
pub fn add_node(args: AddNodeArgs) -> CommandResult {
    let mut store = GraphStore::load(&args.scene)?;
    let graph = find_graph(&store, &args.graph)?;
    let sources = args
        .links
        .iter()
        .map(|link| find_node(&store, graph, &link.from_node))
        .collect::<Result<Vec<_>, _>>()?;

    let node = store.create_node(graph, &args.node_type)?;
    let g = store
        .graph_mut(graph)
        .ok_or_else(|| CommandError::GraphNotFound(args.graph.clone()))?;
    let taken: HashSet<String> = g.nodes().filter(|n| n.id != node).map(|n| n.name.clone()).collect();

    let name = {
        let Some(new_node) = g.node_mut(node) else {
            return Err(CommandError::NodeNotFound {
                graph: args.graph,
                name: args.node_type,
            });
        };
        let wanted = args.name.unwrap_or_else(|| new_node.name.clone());
        new_node.name = unique_name(&wanted, &taken);
        if let Some(at) = args.at {
            new_node.position = at;
        }
        new_node.name.clone()
    };

    for (link, source) in args.links.iter().zip(sources) {
        g.connect(source, &link.from_socket, node, &link.to_socket)?;
    }
    if args.select {
        g.select(node);
    }

    store.save(&args.scene)?;
    println!("Added {} ({}) to {}", name, args.node_type, args.graph);
    Ok(())
}

// ============================================================================
// Export / import
// ============================================================================

/// Capture nodes into a document
#[derive(Debug, clap::Args)]
pub struct ExportArgs {
    /// Scene file
    pub scene: PathBuf,
    /// Graph name
    #[arg(long)]
    pub graph: String,
    /// Nodes to capture, defaults to the graph's selection
    #[arg(long = "node")]
    pub nodes: Vec<String>,
    /// Write the document to this file
    #[arg(long, short)]
    pub out: Option<PathBuf>,
    /// Store the document in the library under this name
    #[arg(long)]
    pub entry: Option<String>,
    /// Replace an existing library entry
    #[arg(long)]
    pub overwrite: bool,
}

/// Export a selection
pub fn export(args: ExportArgs, config: &AppConfig) -> CommandResult {
    let store = GraphStore::load(&args.scene)?;
    let graph = find_graph(&store, &args.graph)?;
    let writer = GraphSnapshotWriter::new();

    let document = if args.nodes.is_empty() {
        writer.capture_selection(&store, Some(graph))?
    } else {
        let nodes = args
            .nodes
            .iter()
            .map(|name| find_node(&store, graph, name))
            .collect::<Result<Vec<_>, _>>()?;
        writer.capture_nodes(&store, graph, &nodes)?
    };

    if let Some(entry) = &args.entry {
        NodeLibrary::new(&config.library_dir).save_entry(entry, &document, args.overwrite)?;
        println!("Saved {} nodes as {} entry {}", document.node_count(), document.graph_kind, entry);
    }
    if let Some(out) = &args.out {
        std::fs::write(out, document.to_json_pretty()?)?;
        println!("Wrote {} nodes to {}", document.node_count(), out.display());
    }
    if args.entry.is_none() && args.out.is_none() {
        println!("{}", document.to_json_pretty()?);
    }
    Ok(())
}

/// Replay a document into a graph
#[derive(Debug, clap::Args)]
pub struct ImportArgs {
    /// Scene file
    pub scene: PathBuf,
    /// Target graph name
    #[arg(long)]
    pub graph: String,
    /// Read the document from this file
    #[arg(long, conflicts_with = "entry")]
    pub file: Option<PathBuf>,
    /// Read the document from the library
    #[arg(long)]
    pub entry: Option<String>,
    /// Fixed placement offset as x,y
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub offset: Option<[f32; 2]>,
}

/// Import a document
pub fn import(args: ImportArgs, config: &AppConfig) -> CommandResult {
    let mut store = GraphStore::load(&args.scene)?;
    let graph = find_graph(&store, &args.graph)?;
    let kind = store
        .graph(graph)
        .map(|g| g.kind)
        .ok_or_else(|| CommandError::GraphNotFound(args.graph.clone()))?;

    let document = match (&args.file, &args.entry) {
        (Some(file), _) => GraphSnapshotReader::new().read_file(file)?,
        (None, Some(entry)) => NodeLibrary::new(&config.library_dir).load_entry(kind, entry)?,
        (None, None) => return Err(CommandError::NoSource),
    };

    let mut options = config.restore_options();
    options.offset = args.offset;
    let report = GraphRestorer::new(TypeNameResolver::default(), options).restore(&mut store, graph, &document)?;
    store.save(&args.scene)?;

    println!("{report}");
    for issue in report.all_issues() {
        println!("  {issue}");
    }
    Ok(())
}

// ============================================================================
// Library management
// ============================================================================

/// List library entries
#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Only list this graph kind
    #[arg(long)]
    pub kind: Option<GraphKind>,
}

/// List entries
pub fn list(args: ListArgs, config: &AppConfig) -> CommandResult {
    let library = NodeLibrary::new(&config.library_dir);
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => GraphKind::all().to_vec(),
    };
    for kind in kinds {
        for entry in library.entries(kind)? {
            println!(
                "{}\t{}\t{} nodes, {} links (from {})",
                kind, entry.name, entry.node_count, entry.link_count, entry.source_graph_name
            );
        }
    }
    Ok(())
}

/// Address of one library entry
#[derive(Debug, clap::Args)]
pub struct EntryArgs {
    /// Graph kind
    #[arg(long)]
    pub kind: GraphKind,
    /// Entry name
    pub name: String,
}

/// Print the nodes and links of an entry
pub fn show(args: EntryArgs, config: &AppConfig) -> CommandResult {
    let document = NodeLibrary::new(&config.library_dir).load_entry(args.kind, &args.name)?;
    println!("{} ({}, from {})", args.name, document.graph_kind, document.source_graph_name);
    print_document(&document, 1);
    Ok(())
}

fn print_document(document: &GraphDocument, depth: usize) {
    let indent = "  ".repeat(depth);
    for node in &document.nodes {
        println!(
            "{indent}{} [{}] at {}, {}",
            node.name, node.node_type, node.position[0], node.position[1]
        );
        if let NodeBody::Group(nested) = &node.body {
            print_document(nested, depth + 1);
        }
    }
    for link in &document.links {
        println!(
            "{indent}{}:{} -> {}:{}",
            link.from_node, link.from_socket_identifier, link.to_node, link.to_socket_identifier
        );
    }
}

/// Delete an entry
pub fn remove(args: EntryArgs, config: &AppConfig) -> CommandResult {
    NodeLibrary::new(&config.library_dir).remove_entry(args.kind, &args.name)?;
    println!("Removed {} entry {}", args.kind, args.name);
    Ok(())
}

/// Rename a library entry
#[derive(Debug, clap::Args)]
pub struct RenameArgs {
    /// Graph kind
    #[arg(long)]
    pub kind: GraphKind,
    /// Current name
    pub from: String,
    /// New name
    pub to: String,
}

/// Rename an entry
pub fn rename(args: RenameArgs, config: &AppConfig) -> CommandResult {
    NodeLibrary::new(&config.library_dir).rename_entry(args.kind, &args.from, &args.to)?;
    println!("Renamed {} entry {} to {}", args.kind, args.from, args.to);
    Ok(())
}
