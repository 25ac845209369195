//! File-level dependency graph.
//!
//! The graph is stored in reverse: each file maps to the files that import it.
//! Files keep their insertion order, which is also the order candidates are
//! offered to the disambiguator.

use crate::error::{Error, Result};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Index of a file in the graph.
pub type FileId = usize;

#[derive(Debug, Clone)]
struct Node {
    path: String,
    importers: Vec<FileId>,
}

/// Reverse dependency graph: file path -> paths of the files importing it.
///
/// Every path seen as either side of an edge is a key, so entry points are
/// present with an empty importer list.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    path_to_id: HashMap<String, FileId>,
    edges: HashSet<(FileId, FileId)>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a graph from its JSON form (`{"<file>": ["<importer>", ...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::GraphParse { source })
    }

    /// Register a file, returning its ID. Re-adding a file returns the existing ID.
    pub fn add_file(&mut self, path: impl Into<String>) -> FileId {
        let path = path.into();
        if let Some(&id) = self.path_to_id.get(&path) {
            return id;
        }
        let id = self.nodes.len();
        self.path_to_id.insert(path.clone(), id);
        self.nodes.push(Node {
            path,
            importers: Vec::new(),
        });
        id
    }

    /// Record that `importer` imports `dependency`.
    pub fn add_edge(&mut self, dependency: impl Into<String>, importer: impl Into<String>) {
        let dep = self.add_file(dependency);
        let imp = self.add_file(importer);
        if self.edges.insert((dep, imp)) {
            self.nodes[dep].importers.push(imp);
        }
    }

    /// Number of files in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.path_to_id.contains_key(path)
    }

    /// All files, in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.path.as_str())
    }

    /// Files that import `target`.
    #[must_use]
    pub fn importers_of(&self, target: &str) -> Vec<&str> {
        self.path_to_id
            .get(target)
            .map(|&id| {
                self.nodes[id]
                    .importers
                    .iter()
                    .map(|&i| self.nodes[i].path.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Files that `file` imports, found by scanning every importer list.
    ///
    /// Use [`ForwardIndex`] when answering this for many files.
    #[must_use]
    pub fn candidates_for(&self, file: &str) -> Vec<&str> {
        let Some(&id) = self.path_to_id.get(file) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|n| n.importers.contains(&id))
            .map(|n| n.path.as_str())
            .collect()
    }
}

impl DependencyGraph {
    /// Copy of the graph with relative paths joined onto `base`.
    ///
    /// File order and edges are unchanged.
    #[must_use]
    pub fn resolve_against(&self, base: &Path) -> Self {
        let resolve = |p: &str| {
            if Path::new(p).is_absolute() {
                p.to_string()
            } else {
                base.join(p).to_string_lossy().into_owned()
            }
        };
        let paths: Vec<String> = self.nodes.iter().map(|n| resolve(&n.path)).collect();

        let mut out = Self::new();
        for path in &paths {
            out.add_file(path.as_str());
        }
        for (dep, node) in self.nodes.iter().enumerate() {
            for &importer in &node.importers {
                out.add_edge(paths[dep].as_str(), paths[importer].as_str());
            }
        }
        out
    }
}

/// Forward adjacency derived once from a [`DependencyGraph`].
///
/// Borrows the graph, so it cannot outlive the pass that built it.
#[derive(Debug)]
pub struct ForwardIndex<'g> {
    graph: &'g DependencyGraph,
    imports: Vec<Vec<FileId>>,
}

impl<'g> ForwardIndex<'g> {
    #[must_use]
    pub fn build(graph: &'g DependencyGraph) -> Self {
        let mut imports = vec![Vec::new(); graph.nodes.len()];
        for (dep, node) in graph.nodes.iter().enumerate() {
            for &importer in &node.importers {
                imports[importer].push(dep);
            }
        }
        Self { graph, imports }
    }

    /// Files that `file` imports, in graph order. Same answer as
    /// [`DependencyGraph::candidates_for`].
    #[must_use]
    pub fn candidates_for(&self, file: &str) -> Vec<&'g str> {
        let graph = self.graph;
        graph
            .path_to_id
            .get(file)
            .map(|&id| {
                self.imports[id]
                    .iter()
                    .map(|&d| graph.nodes[d].path.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            let importers: Vec<&str> = node
                .importers
                .iter()
                .map(|&i| self.nodes[i].path.as_str())
                .collect();
            map.serialize_entry(&node.path, &importers)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DependencyGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GraphVisitor;

        impl<'de> Visitor<'de> for GraphVisitor {
            type Value = DependencyGraph;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from file path to the list of files importing it")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = access.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }

                // Keys take their document order; importers that are never keys follow.
                let mut graph = DependencyGraph::new();
                for (file, _) in &entries {
                    graph.add_file(file.as_str());
                }
                for (file, importers) in entries {
                    for importer in importers {
                        graph.add_edge(file.as_str(), importer);
                    }
                }
                Ok(graph)
            }
        }

        deserializer.deserialize_map(GraphVisitor)
    }
}
