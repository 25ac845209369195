use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, surfaced in `--json` output.
pub mod codes {
    pub const CONFIG_READ: &str = "CONFIG_READ";
    pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
    pub const GRAPH_READ: &str = "GRAPH_READ";
    pub const GRAPH_PARSE: &str = "GRAPH_PARSE";
    pub const STORE_READ: &str = "STORE_READ";
    pub const MANIFEST_READ: &str = "MANIFEST_READ";
    pub const MANIFEST_PARSE: &str = "MANIFEST_PARSE";
    pub const FILE_READ: &str = "FILE_READ";
    pub const FILE_WRITE: &str = "FILE_WRITE";
    pub const FILE_NOT_TRACKED: &str = "FILE_NOT_TRACKED";
    pub const OTHER: &str = "OTHER";
}

/// Core error type for deepimport operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read dependency graph at {path}: {source}")]
    GraphRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dependency graph: {source}")]
    GraphParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read dependency store {path}: {source}")]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read package manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse package manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not in the store: {path}")]
    FileNotTracked { path: PathBuf },

    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigRead { .. } => codes::CONFIG_READ,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE,
            Self::GraphRead { .. } => codes::GRAPH_READ,
            Self::GraphParse { .. } => codes::GRAPH_PARSE,
            Self::StoreRead { .. } => codes::STORE_READ,
            Self::ManifestRead { .. } => codes::MANIFEST_READ,
            Self::ManifestParse { .. } => codes::MANIFEST_PARSE,
            Self::FileRead { .. } => codes::FILE_READ,
            Self::FileWrite { .. } => codes::FILE_WRITE,
            Self::FileNotTracked { .. } => codes::FILE_NOT_TRACKED,
            Self::Other(_) => codes::OTHER,
        }
    }
}
