#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod deep;
pub mod discover;
pub mod error;
pub mod graph;
pub mod imports;
pub mod store;
pub mod version;

pub use config::{Config, ConvertOptions, ScanMode, TieBreak};
pub use deep::{
    convert_source, convert_to_deep_imports, process_imports, ConvertReport, FileConversion,
    FileFailure, Rewrite,
};
pub use discover::{discover_entry_points, DeepImport};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, ForwardIndex};
pub use imports::{find_bare_imports, ImportKind, ImportMatch};
pub use store::{DiskFileStore, FileEntry, FileStore, MemoryFileStore};
pub use version::VERSION;
