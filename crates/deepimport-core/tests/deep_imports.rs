//! End-to-end deep import conversion over an Angular/Ionic style app.

use deepimport_core::{
    convert_source, convert_to_deep_imports, find_bare_imports, process_imports, ConvertOptions,
    DependencyGraph, FileStore, MemoryFileStore, ScanMode,
};
use std::path::Path;

const STORE_ROOT: &str = "/app/node_modules";
const APP_MODULE: &str = "/app/app/app.module.js";
const PAGE_ONE: &str = "/app/src/pages/page-one.js";
const PAGE_TWO: &str = "/app/src/pages/page-two.js";
const ANGULAR_CORE: &str = "/app/node_modules/@angular/core/index.js";
const ANGULAR_COMPONENT: &str = "/app/node_modules/@angular/core/src/component.js";
const IONIC: &str = "/app/node_modules/ionic-angular/index.js";
const IONIC_NAV: &str = "/app/node_modules/ionic-angular/navigation/nav-controller.js";
const NODE_UUID: &str = "/app/node_modules/node-uuid/index.js";
const MOMENT: &str = "/app/node_modules/moment/lib/moment.js";

const PAGE_ONE_SOURCE: &str = r#"
import { Component } from '@angular/core';

import { NavController } from 'ionic-angular';

import { PageOne } from '../page-one/page-one';

const uuid = require('node-uuid');
const moment = require('moment');

@Component({
  selector: 'page-home',
  template: `
  <ion-header>
    <ion-navbar>
      <ion-title>Ionic Blank</ion-title>
    </ion-navbar>
  </ion-header>
  <button ion-button (click)="nextPage()">Next Page</button>
  `
})
export class HomePage {
  constructor(public navCtrl: NavController) {}

  nextPage() {
    this.navCtrl.push(PageOne);
  }
}
"#;

fn app_graph() -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    graph.add_file(APP_MODULE);
    graph.add_edge(PAGE_ONE, APP_MODULE);
    graph.add_edge(PAGE_TWO, APP_MODULE);
    for importer in [PAGE_ONE, PAGE_TWO, IONIC, IONIC_NAV] {
        graph.add_edge(ANGULAR_CORE, importer);
    }
    graph.add_edge(ANGULAR_COMPONENT, ANGULAR_CORE);
    graph.add_edge(IONIC, PAGE_ONE);
    graph.add_edge(IONIC, PAGE_TWO);
    graph.add_edge(IONIC_NAV, IONIC);
    graph.add_edge(NODE_UUID, PAGE_ONE);
    graph.add_edge(MOMENT, PAGE_ONE);
    graph
}

#[test]
fn test_process_imports_converts_page() {
    let graph = app_graph();
    let out = process_imports(&graph, PAGE_ONE, PAGE_ONE_SOURCE, Path::new(STORE_ROOT));

    assert!(!out.contains("from '@angular/core';"));
    assert!(out.contains("import { Component } from '@angular/core/index';"));
    assert!(out.contains("import { NavController } from 'ionic-angular/index';"));
    assert!(out.contains("const uuid = require('node-uuid/index');"));
    assert!(out.contains("const moment = require('moment/lib/moment');"));
    assert!(out.contains("import { PageOne } from '../page-one/page-one';"));
}

#[test]
fn test_both_scan_modes_agree_on_page() {
    let graph = app_graph();
    let candidates = graph.candidates_for(PAGE_ONE);
    let lexical = convert_source(
        &candidates,
        PAGE_ONE,
        PAGE_ONE_SOURCE,
        Path::new(STORE_ROOT),
        &ConvertOptions::default(),
    );
    let pattern = convert_source(
        &candidates,
        PAGE_ONE,
        PAGE_ONE_SOURCE,
        Path::new(STORE_ROOT),
        &ConvertOptions::default().with_scan(ScanMode::Pattern),
    );
    assert_eq!(lexical.content, pattern.content);
    assert_eq!(lexical.rewrites.len(), 4);
}

#[test]
fn test_only_the_specifier_changes() {
    let graph = app_graph();
    let out = process_imports(&graph, PAGE_ONE, PAGE_ONE_SOURCE, Path::new(STORE_ROOT));
    let restored = out
        .replace("'@angular/core/index'", "'@angular/core'")
        .replace("'ionic-angular/index'", "'ionic-angular'")
        .replace("'node-uuid/index'", "'node-uuid'")
        .replace("'moment/lib/moment'", "'moment'");
    assert_eq!(restored, PAGE_ONE_SOURCE);
}

#[test]
fn test_relative_only_source_is_untouched() {
    let graph = app_graph();
    let source = "import { PageTwo } from '../page-two/page-two';\nconst p = require('./p');\n";
    for mode in [ScanMode::Lexical, ScanMode::Pattern] {
        assert!(find_bare_imports(source, mode).is_empty());
    }
    assert_eq!(
        process_imports(&graph, PAGE_TWO, source, Path::new(STORE_ROOT)),
        source
    );
}

#[test]
fn test_importers_and_candidates() {
    let graph = app_graph();

    let mut importers = graph.importers_of(IONIC);
    importers.sort_unstable();
    assert_eq!(importers, vec![PAGE_ONE, PAGE_TWO]);

    let candidates = graph.candidates_for(PAGE_ONE);
    assert!(candidates.contains(&ANGULAR_CORE));
    assert!(candidates.contains(&MOMENT));
    assert!(!candidates.contains(&ANGULAR_COMPONENT));
    assert!(!candidates.contains(&IONIC_NAV));
}

#[test]
fn test_batch_conversion_from_json_graph() {
    let json = serde_json::json!({
        "/app/src/main.js": [],
        ANGULAR_CORE: ["/app/src/main.js", IONIC],
        IONIC: ["/app/src/main.js"],
    })
    .to_string();
    let graph = DependencyGraph::from_json(&json).unwrap();

    let mut store = MemoryFileStore::new();
    store.insert(
        "/app/src/main.js",
        "import { C } from '@angular/core';\nimport { N } from \"ionic-angular\";\n",
    );
    store.insert(ANGULAR_CORE, "export const C = 1;\n");
    store.insert(IONIC, "import { C } from '@angular/core';\n");

    let report = convert_to_deep_imports(
        &graph,
        &mut store,
        Path::new(STORE_ROOT),
        &ConvertOptions::default(),
    );

    assert!(report.is_ok());
    assert_eq!(report.files_changed(), 2);
    assert_eq!(
        store.get("/app/src/main.js").unwrap().content,
        "import { C } from '@angular/core/index';\nimport { N } from \"ionic-angular/index\";\n"
    );
    assert_eq!(
        store.get(IONIC).unwrap().content,
        "import { C } from '@angular/core/index';\n"
    );
}

#[test]
fn test_first_match_follows_graph_key_order() {
    // The nested copy is named as an importer of rxjs before either copy of
    // @angular/core appears as a key; the top-level copy is still the first key.
    let nested = "/app/node_modules/ionic-angular/node_modules/@angular/core/index.js";
    let json = format!(
        r#"{{
            "/app/node_modules/rxjs/Rx.js": ["{nested}"],
            "{ANGULAR_CORE}": ["{PAGE_ONE}"],
            "{nested}": ["{PAGE_ONE}"],
            "{PAGE_ONE}": []
        }}"#
    );
    let graph = DependencyGraph::from_json(&json).unwrap();

    let out = process_imports(
        &graph,
        PAGE_ONE,
        "import { Component } from '@angular/core';\n",
        Path::new(STORE_ROOT),
    );
    assert_eq!(out, "import { Component } from '@angular/core/index';\n");
}

#[test]
fn test_repeated_statement_only_first_is_rewritten() {
    let graph = app_graph();
    let source = "import m from 'moment';\nimport m from 'moment';\n";
    for scan in [ScanMode::Lexical, ScanMode::Pattern] {
        let conv = convert_source(
            &graph.candidates_for(PAGE_ONE),
            PAGE_ONE,
            source,
            Path::new(STORE_ROOT),
            &ConvertOptions::default().with_scan(scan),
        );
        assert_eq!(
            conv.content,
            "import m from 'moment/lib/moment';\nimport m from 'moment';\n",
            "{scan:?}"
        );
    }
}

#[test]
fn test_lexical_conversion_skips_comments_and_strings() {
    let graph = app_graph();
    let source = "/* import { C } from '@angular/core'; */\n\
                  const doc = 'import { C } from \\'@angular/core\\';';\n\
                  // import { C } from '@angular/core';\n\
                  import { C } from '@angular/core';\n";
    let out = process_imports(&graph, PAGE_ONE, source, Path::new(STORE_ROOT));
    // Only the real statement on the last line changes.
    assert!(out.ends_with("import { C } from '@angular/core/index';\n"));
    assert_eq!(out.matches("'@angular/core/index'").count(), 1);
    assert_eq!(
        out.replace("'@angular/core/index'", "'@angular/core'"),
        source
    );
}
