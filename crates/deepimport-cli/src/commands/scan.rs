//! `deepimport scan` command implementation.

use deepimport_core::version::SCHEMA_VERSION;
use deepimport_core::{find_bare_imports, Error, ImportMatch, ScanMode};
use miette::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ScanResultJson {
    ok: bool,
    schema_version: u32,
    file: String,
    scan: &'static str,
    imports: Vec<ImportMatch>,
}

pub fn run(file: &Path, mode: ScanMode, json: bool) -> Result<()> {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(source) => super::fail(
            &Error::FileRead {
                path: file.to_path_buf(),
                source,
            },
            json,
        ),
    };
    let imports = find_bare_imports(&source, mode);

    if json {
        super::print_json(&ScanResultJson {
            ok: true,
            schema_version: SCHEMA_VERSION,
            file: file.display().to_string(),
            scan: mode.as_str(),
            imports,
        });
    } else {
        for found in &imports {
            println!(
                "{}:{}: {} ({})",
                file.display(),
                found.line,
                found.specifier,
                found.kind.as_str()
            );
        }
    }
    Ok(())
}
