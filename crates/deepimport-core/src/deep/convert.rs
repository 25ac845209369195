//! Batch conversion over every file of a dependency graph.

use super::rewrite::{convert_source, FileConversion};
use crate::config::ConvertOptions;
use crate::error::Error;
use crate::graph::{DependencyGraph, ForwardIndex};
use crate::store::{FileEntry, FileStore};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// A file that could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub code: &'static str,
    pub message: String,
}

impl FileFailure {
    fn new(path: &str, err: &Error) -> Self {
        Self {
            path: path.to_string(),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one conversion pass.
///
/// `conversions` lists the files written back, in graph order. Their content
/// has moved into the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertReport {
    pub conversions: Vec<FileConversion>,
    pub failures: Vec<FileFailure>,
}

impl ConvertReport {
    /// `true` when every file was converted and stored.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn files_changed(&self) -> usize {
        self.conversions.iter().filter(|c| c.changed).count()
    }

    #[must_use]
    pub fn rewrite_count(&self) -> usize {
        self.conversions.iter().map(|c| c.rewrites.len()).sum()
    }

    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.conversions.iter().map(|c| c.unresolved.len()).sum()
    }
}

/// Convert every file tracked in `graph`, reading from and writing to `store`.
///
/// Each file is converted from its original content and the graph alone, so
/// conversions run in parallel and processing order never changes the output.
/// A file that fails to load or store is reported and skipped.
pub fn convert_to_deep_imports<S: FileStore + ?Sized>(
    graph: &DependencyGraph,
    store: &mut S,
    store_root: &Path,
    options: &ConvertOptions,
) -> ConvertReport {
    let index = ForwardIndex::build(graph);
    let mut failures = Vec::new();

    let mut loaded = Vec::with_capacity(graph.len());
    for path in graph.files() {
        match store.get(path) {
            Ok(entry) => loaded.push(entry),
            Err(e) => failures.push(FileFailure::new(path, &e)),
        }
    }

    let converted: Vec<FileConversion> = loaded
        .par_iter()
        .map(|entry| {
            let candidates = index.candidates_for(&entry.path);
            convert_source(
                &candidates,
                &entry.path,
                &entry.content,
                store_root,
                options,
            )
        })
        .collect();

    let mut conversions = Vec::with_capacity(converted.len());
    for mut conversion in converted {
        let content = std::mem::take(&mut conversion.content);
        let entry = FileEntry::new(conversion.path.clone(), content);
        match store.set(&conversion.path, entry) {
            Ok(()) => conversions.push(conversion),
            Err(e) => failures.push(FileFailure::new(&conversion.path, &e)),
        }
    }

    ConvertReport {
        conversions,
        failures,
    }
}
