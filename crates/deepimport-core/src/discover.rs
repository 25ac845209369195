//! Dependency-store discovery.
//!
//! Maps every package directory under the store root to its declared entry file.

use crate::error::{Error, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Manifest file name inside each package directory.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Entry used when a manifest names neither `module` nor `main`.
const DEFAULT_ENTRY: &str = "index.js";

/// A package's resolved entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeepImport {
    /// Absolute entry file.
    pub full_path: PathBuf,
    /// Entry as written in the manifest.
    pub relative_path: String,
    /// Package directory.
    pub directory_path: PathBuf,
}

/// Read the entry point of every package under `store_root`.
///
/// Dot-directories are skipped and `@scope` directories are descended one level.
/// Any unreadable or malformed manifest fails the whole discovery.
pub fn discover_entry_points(store_root: &Path) -> Result<BTreeMap<PathBuf, DeepImport>> {
    let dirs = package_dirs(store_root)?;
    let found = dirs
        .par_iter()
        .map(|dir| read_entry_point(dir))
        .collect::<Result<Vec<_>>>()?;

    Ok(found
        .into_iter()
        .map(|entry| (entry.directory_path.clone(), entry))
        .collect())
}

/// Resolve the entry point declared by `package_dir/package.json`.
pub fn read_entry_point(package_dir: &Path) -> Result<DeepImport> {
    let manifest = package_dir.join(PACKAGE_MANIFEST);
    let content = std::fs::read_to_string(&manifest).map_err(|source| Error::ManifestRead {
        path: manifest.clone(),
        source,
    })?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| Error::ManifestParse {
            path: manifest.clone(),
            source,
        })?;

    let field = |name: &str| {
        json.get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    };
    let relative = field("module")
        .or_else(|| field("main"))
        .unwrap_or(DEFAULT_ENTRY)
        .to_string();

    Ok(DeepImport {
        full_path: normalize(&package_dir.join(&relative)),
        relative_path: relative,
        directory_path: package_dir.to_path_buf(),
    })
}

/// Package directories directly under `store_root`, scopes expanded.
fn package_dirs(store_root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for (name, path) in child_dirs(store_root)? {
        if name.starts_with('@') {
            dirs.extend(child_dirs(&path)?.into_iter().map(|(_, p)| p));
        } else {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

/// Non-hidden subdirectories of `dir`, sorted by name.
fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let store_err = |source| Error::StoreRead {
        path: dir.to_path_buf(),
        source,
    };
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(store_err)? {
        let entry = entry.map_err(store_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            out.push((name, path));
        }
    }
    out.sort();
    Ok(out)
}

/// Drop `.` components and fold `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;
    use std::fs;
    use tempfile::tempdir;

    fn package(root: &Path, name: &str, manifest: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PACKAGE_MANIFEST), manifest).unwrap();
        dir
    }

    #[test]
    fn test_module_preferred_over_main() {
        let root = tempdir().unwrap();
        let dir = package(
            root.path(),
            "rxjs",
            r#"{"main": "Rx.js", "module": "./esm/Rx.js"}"#,
        );

        let map = discover_entry_points(root.path()).unwrap();
        let entry = &map[&dir];
        assert_eq!(entry.relative_path, "./esm/Rx.js");
        assert_eq!(entry.full_path, dir.join("esm").join("Rx.js"));
        assert_eq!(entry.directory_path, dir);
    }

    #[test]
    fn test_main_and_index_fallback() {
        let root = tempdir().unwrap();
        let moment = package(root.path(), "moment", r#"{"main": "./moment.js"}"#);
        let bare = package(root.path(), "bare", r#"{"name": "bare", "module": ""}"#);

        let map = discover_entry_points(root.path()).unwrap();
        assert_eq!(map[&moment].full_path, moment.join("moment.js"));
        assert_eq!(map[&bare].relative_path, "index.js");
        assert_eq!(map[&bare].full_path, bare.join("index.js"));
    }

    #[test]
    fn test_scoped_packages_and_hidden_dirs() {
        let root = tempdir().unwrap();
        let core = package(root.path(), "@angular/core", r#"{"module": "index.js"}"#);
        let common = package(root.path(), "@angular/common", r#"{"main": "index.js"}"#);
        fs::create_dir_all(root.path().join(".bin")).unwrap();
        fs::write(root.path().join("stray-file.js"), "").unwrap();

        let map = discover_entry_points(root.path()).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![common, core.clone()]);
        assert_eq!(map[&core].full_path, core.join("index.js"));
    }

    #[test]
    fn test_missing_manifest() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("no-manifest")).unwrap();
        let err = discover_entry_points(root.path()).unwrap_err();
        assert_eq!(err.code(), codes::MANIFEST_READ);
    }

    #[test]
    fn test_malformed_manifest() {
        let root = tempdir().unwrap();
        package(root.path(), "broken", "{ not json");
        let err = discover_entry_points(root.path()).unwrap_err();
        assert_eq!(err.code(), codes::MANIFEST_PARSE);
    }

    #[test]
    fn test_missing_store_root() {
        let root = tempdir().unwrap();
        let err = discover_entry_points(&root.path().join("node_modules")).unwrap_err();
        assert_eq!(err.code(), codes::STORE_READ);
    }

    #[test]
    fn test_empty_store() {
        let root = tempdir().unwrap();
        assert!(discover_entry_points(root.path()).unwrap().is_empty());
    }
}
