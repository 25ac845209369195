//! Rewriting bare specifiers into deep import paths.

use super::disambiguate::select_deep_import;
use crate::config::{ConvertOptions, ScanMode};
use crate::graph::DependencyGraph;
use crate::imports::{find_bare_imports, ImportMatch};
use deepimport_util::path::{relative_to, strip_extension, to_slash};
use serde::Serialize;
use std::ops::Range;
use std::path::Path;

/// One specifier that was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub specifier: String,
    pub deep_path: String,
    /// Absolute file the specifier resolved to.
    pub target: String,
    pub line: u32,
}

/// A specifier no candidate matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub specifier: String,
    pub line: u32,
}

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileConversion {
    pub path: String,
    #[serde(skip)]
    pub content: String,
    pub changed: bool,
    pub rewrites: Vec<Rewrite>,
    pub unresolved: Vec<Unresolved>,
}

/// Path of `file` relative to `store_root`, extension dropped, `/`-separated.
///
/// `/app/node_modules/@angular/core/index.js` under `/app/node_modules`
/// becomes `@angular/core/index`.
#[must_use]
pub fn deep_import_path(store_root: &Path, file: &str) -> String {
    to_slash(&strip_extension(&relative_to(store_root, Path::new(file))))
}

/// Statement text of `found` with only its specifier replaced by `deep_path`.
#[must_use]
pub fn rewrite_statement(found: &ImportMatch, deep_path: &str) -> String {
    found.with_specifier(deep_path)
}

/// Apply `(old_statement, new_statement)` substitutions to `source` in order.
///
/// Each substitution replaces the first occurrence of its statement in the
/// working text only.
#[must_use]
pub fn apply_rewrites(source: &str, substitutions: &[(String, String)]) -> String {
    let mut out = source.to_string();
    for (old, new) in substitutions {
        if old != new {
            out = out.replacen(old.as_str(), new, 1);
        }
    }
    out
}

/// Replace the given byte ranges of `source`.
///
/// Ranges must not overlap; they may come in any order.
#[must_use]
pub fn splice_rewrites(source: &str, edits: &[(Range<usize>, String)]) -> String {
    let mut ordered: Vec<&(Range<usize>, String)> = edits.iter().collect();
    ordered.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (range, replacement) in ordered {
        out.push_str(&source[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Convert one file's source given the files it is known to import.
#[must_use]
pub fn convert_source(
    candidates: &[&str],
    file_path: &str,
    content: &str,
    store_root: &Path,
    options: &ConvertOptions,
) -> FileConversion {
    let mut substitutions = Vec::new();
    let mut edits = Vec::new();
    let mut rewrites = Vec::new();
    let mut unresolved = Vec::new();

    for found in find_bare_imports(content, options.scan) {
        let Some(target) =
            select_deep_import(candidates, file_path, &found.specifier, options.tie_break)
        else {
            unresolved.push(Unresolved {
                specifier: found.specifier,
                line: found.line,
            });
            continue;
        };

        let deep_path = deep_import_path(store_root, target);
        let rewritten = rewrite_statement(&found, &deep_path);
        edits.push((found.offset..found.offset + found.statement.len(), rewritten.clone()));
        substitutions.push((found.statement.clone(), rewritten));
        rewrites.push(Rewrite {
            specifier: found.specifier,
            deep_path,
            target: target.to_string(),
            line: found.line,
        });
    }

    // Lexical matches carry exact spans; textual matches are located by search.
    let converted = match options.scan {
        ScanMode::Lexical => splice_rewrites(content, &edits),
        ScanMode::Pattern => apply_rewrites(content, &substitutions),
    };
    FileConversion {
        path: file_path.to_string(),
        changed: converted != content,
        content: converted,
        rewrites,
        unresolved,
    }
}

/// Convert `content` of `file_path` against `graph` with default options.
///
/// Scans the whole graph for the file's imports; batch callers should go
/// through [`super::convert_to_deep_imports`], which indexes the graph once.
#[must_use]
pub fn process_imports(
    graph: &DependencyGraph,
    file_path: &str,
    content: &str,
    store_root: &Path,
) -> String {
    let candidates = graph.candidates_for(file_path);
    convert_source(
        &candidates,
        file_path,
        content,
        store_root,
        &ConvertOptions::default(),
    )
    .content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanMode;

    const ROOT: &str = "/app/node_modules";

    #[test]
    fn test_deep_import_path() {
        let root = Path::new(ROOT);
        assert_eq!(
            deep_import_path(root, "/app/node_modules/@angular/core/index.js"),
            "@angular/core/index"
        );
        assert_eq!(
            deep_import_path(root, "/app/node_modules/moment/lib/moment.js"),
            "moment/lib/moment"
        );
    }

    #[test]
    fn test_rewrite_statement_keeps_quotes_and_call() {
        let found = find_bare_imports("const u = require(\"node-uuid\");", ScanMode::Lexical);
        assert_eq!(
            rewrite_statement(&found[0], "node-uuid/index"),
            "require(\"node-uuid/index\");"
        );
    }

    #[test]
    fn test_apply_rewrites_replaces_first_occurrence_only() {
        let source = "from 'a';\nx();\nfrom 'a';\n";
        let out = apply_rewrites(source, &[("from 'a';".into(), "from 'a/index';".into())]);
        assert_eq!(out, "from 'a/index';\nx();\nfrom 'a';\n");
    }

    #[test]
    fn test_splice_rewrites_out_of_order() {
        let source = "0123456789";
        let out = splice_rewrites(source, &[(6..8, "B".into()), (1..3, "AA".into())]);
        assert_eq!(out, "0AA345B89");
        assert_eq!(splice_rewrites(source, &[]), source);
    }

    #[test]
    fn test_repeated_statement_rewrites_first_occurrence() {
        let candidates = ["/app/node_modules/a/index.js"];
        let source = "import a from 'a';\nimport a from 'a';\n";
        for scan in [ScanMode::Lexical, ScanMode::Pattern] {
            let conv = convert_source(
                &candidates,
                "/app/src/main.js",
                source,
                Path::new(ROOT),
                &ConvertOptions::default().with_scan(scan),
            );
            assert_eq!(
                conv.content, "import a from 'a/index';\nimport a from 'a';\n",
                "{scan:?}"
            );
            assert_eq!(conv.rewrites.len(), 1);
        }
    }

    #[test]
    fn test_lexical_leaves_comments_and_strings_alone() {
        let candidates = ["/app/node_modules/lodash/lodash.js"];
        let source = "// old: import x from 'lodash';\n\
                      const s = \"import x from 'lodash';\";\n\
                      import x from 'lodash';\n";
        let conv = convert_source(
            &candidates,
            "/app/src/main.js",
            source,
            Path::new(ROOT),
            &ConvertOptions::default(),
        );
        assert_eq!(
            conv.content,
            "// old: import x from 'lodash';\n\
             const s = \"import x from 'lodash';\";\n\
             import x from 'lodash/lodash';\n"
        );
        assert_eq!(conv.rewrites.len(), 1);
        assert_eq!(conv.rewrites[0].line, 3);
    }

    #[test]
    fn test_apply_rewrites_without_substitutions_is_identity() {
        let source = "import a from './a';\n";
        assert_eq!(apply_rewrites(source, &[]), source);
    }

    #[test]
    fn test_convert_source_rewrites_only_specifier() {
        let candidates = ["/app/node_modules/@angular/core/index.js"];
        let source = "import { Component } from '@angular/core';\nconst x = 1;\n";
        let conv = convert_source(
            &candidates,
            "/app/src/a.js",
            source,
            Path::new(ROOT),
            &ConvertOptions::default(),
        );
        assert_eq!(
            conv.content,
            "import { Component } from '@angular/core/index';\nconst x = 1;\n"
        );
        assert!(conv.changed);
        assert_eq!(conv.rewrites.len(), 1);
        assert_eq!(conv.rewrites[0].deep_path, "@angular/core/index");
        assert!(conv.unresolved.is_empty());
    }

    #[test]
    fn test_convert_source_leaves_unresolved_verbatim() {
        let candidates = ["/app/node_modules/@angular/core/index.js"];
        let source = "import _ from 'lodash';\nimport { C } from '@angular/core';\n";
        for scan in [ScanMode::Lexical, ScanMode::Pattern] {
            let conv = convert_source(
                &candidates,
                "/app/src/a.js",
                source,
                Path::new(ROOT),
                &ConvertOptions::default().with_scan(scan),
            );
            assert!(conv.content.contains("import _ from 'lodash';"));
            assert!(conv.content.contains("from '@angular/core/index';"));
            assert_eq!(
                conv.unresolved,
                vec![Unresolved {
                    specifier: "lodash".into(),
                    line: 1
                }]
            );
        }
    }

    #[test]
    fn test_convert_source_relative_only_is_unchanged() {
        let source = "import { PageOne } from '../page-one/page-one';\n";
        let conv = convert_source(
            &["/app/src/page-one/page-one.js"],
            "/app/src/home.js",
            source,
            Path::new(ROOT),
            &ConvertOptions::default(),
        );
        assert_eq!(conv.content, source);
        assert!(!conv.changed);
        assert!(conv.rewrites.is_empty());
    }

    #[test]
    fn test_second_conversion_is_a_fixed_point() {
        let candidates = [
            "/app/node_modules/@angular/core/index.js",
            "/app/node_modules/node-uuid/uuid.js",
        ];
        let source = "import { C } from '@angular/core';\nconst u = require('node-uuid');\n";
        let options = ConvertOptions::default();
        let first = convert_source(&candidates, "/app/a.js", source, Path::new(ROOT), &options);
        let second = convert_source(
            &candidates,
            "/app/a.js",
            &first.content,
            Path::new(ROOT),
            &options,
        );
        assert!(first.changed);
        assert_eq!(second.content, first.content);
        assert!(!second.changed);
    }

    #[test]
    fn test_process_imports_uses_graph() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("/app/node_modules/rxjs/Rx.js", "/app/src/main.js");
        let out = process_imports(
            &graph,
            "/app/src/main.js",
            "import { Observable } from 'rxjs';",
            Path::new(ROOT),
        );
        assert_eq!(out, "import { Observable } from 'rxjs/Rx';");
    }
}
