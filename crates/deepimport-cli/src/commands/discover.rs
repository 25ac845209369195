//! `deepimport discover` command implementation.

use deepimport_core::version::SCHEMA_VERSION;
use deepimport_core::{discover_entry_points, DeepImport};
use miette::Result;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct DiscoverResultJson {
    ok: bool,
    schema_version: u32,
    store_root: String,
    packages: Vec<DeepImport>,
}

pub fn run(store_root: &Path, json: bool) -> Result<()> {
    let packages = match discover_entry_points(store_root) {
        Ok(map) => map,
        Err(e) => super::fail(&e, json),
    };
    info!(packages = packages.len(), store = %store_root.display(), "discovered entry points");

    if json {
        super::print_json(&DiscoverResultJson {
            ok: true,
            schema_version: SCHEMA_VERSION,
            store_root: store_root.display().to_string(),
            packages: packages.into_values().collect(),
        });
    } else {
        for entry in packages.values() {
            println!(
                "{} has a deep import of {}",
                entry.directory_path.display(),
                entry.relative_path
            );
        }
    }
    Ok(())
}
