//! `deepimport convert` command implementation.
//!
//! Loads a dependency graph, rewrites every tracked file on disk and reports
//! per-file rewrites, unresolved specifiers and failures.

use deepimport_core::version::SCHEMA_VERSION;
use deepimport_core::{
    convert_to_deep_imports, Config, ConvertReport, DependencyGraph, DiskFileStore, Error,
    FileConversion, FileFailure,
};
use miette::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert command action.
#[derive(Debug, Clone)]
pub struct ConvertAction {
    /// Directory relative graph paths are resolved against.
    pub cwd: PathBuf,
    /// Dependency graph JSON file.
    pub graph: PathBuf,
    /// Dependency store root.
    pub store_root: PathBuf,
    /// Compute changes without writing.
    pub dry_run: bool,
}

/// JSON output for the convert command.
#[derive(Serialize)]
struct ConvertResultJson<'a> {
    ok: bool,
    schema_version: u32,
    store_root: String,
    scan: &'static str,
    tie_break: &'static str,
    dry_run: bool,
    files: usize,
    files_changed: usize,
    rewrites: usize,
    unresolved: usize,
    written: Vec<String>,
    conversions: &'a [FileConversion],
    failures: &'a [FileFailure],
    duration_ms: u64,
}

/// Run the convert command.
pub fn run(config: &Config, action: ConvertAction) -> Result<()> {
    let start = Instant::now();
    let json = config.json_logs;

    let graph = match load_graph(&action.graph) {
        Ok(graph) => graph.resolve_against(&action.cwd),
        Err(e) => super::fail(&e, json),
    };
    info!(
        files = graph.len(),
        graph = %action.graph.display(),
        scan = config.convert.scan.as_str(),
        tie_break = config.convert.tie_break.as_str(),
        "loaded dependency graph"
    );

    let mut store = DiskFileStore::new().dry_run(action.dry_run);
    let report = convert_to_deep_imports(&graph, &mut store, &action.store_root, &config.convert);
    log_report(&report);

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        files_changed = report.files_changed(),
        rewrites = report.rewrite_count(),
        unresolved = report.unresolved_count(),
        failed = report.failures.len(),
        duration_ms,
        "conversion finished"
    );

    if json {
        super::print_json(&ConvertResultJson {
            ok: report.is_ok(),
            schema_version: SCHEMA_VERSION,
            store_root: action.store_root.display().to_string(),
            scan: config.convert.scan.as_str(),
            tie_break: config.convert.tie_break.as_str(),
            dry_run: action.dry_run,
            files: graph.len(),
            files_changed: report.files_changed(),
            rewrites: report.rewrite_count(),
            unresolved: report.unresolved_count(),
            written: store
                .written()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            conversions: &report.conversions,
            failures: &report.failures,
            duration_ms,
        });
    } else {
        print_human(&report, action.dry_run);
    }

    if report.is_ok() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn load_graph(path: &Path) -> deepimport_core::Result<DependencyGraph> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::GraphRead {
        path: path.to_path_buf(),
        source,
    })?;
    DependencyGraph::from_json(&text)
}

fn log_report(report: &ConvertReport) {
    for conversion in &report.conversions {
        for rewrite in &conversion.rewrites {
            debug!(
                file = %conversion.path,
                line = rewrite.line,
                specifier = %rewrite.specifier,
                deep_path = %rewrite.deep_path,
                "rewrote import"
            );
        }
        for missing in &conversion.unresolved {
            warn!(
                file = %conversion.path,
                line = missing.line,
                specifier = %missing.specifier,
                "no imported file matches specifier"
            );
        }
    }
    for failure in &report.failures {
        warn!(file = %failure.path, code = failure.code, "{}", failure.message);
    }
}

fn print_human(report: &ConvertReport, dry_run: bool) {
    let verb = if dry_run { "would rewrite" } else { "rewrote" };
    for conversion in report.conversions.iter().filter(|c| c.changed) {
        println!(
            "  {} ({} {})",
            conversion.path,
            conversion.rewrites.len(),
            if conversion.rewrites.len() == 1 {
                "import"
            } else {
                "imports"
            }
        );
    }
    println!(
        "{verb} {} imports in {} files ({} unresolved)",
        report.rewrite_count(),
        report.files_changed(),
        report.unresolved_count()
    );
    for failure in &report.failures {
        eprintln!("error: {}: {}", failure.code, failure.message);
    }
}
