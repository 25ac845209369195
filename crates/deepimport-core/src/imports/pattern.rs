//! Textual import patterns.
//!
//! Matches `from ... '<spec>';` and `require(... '<spec>');` anywhere in the
//! text, including inside comments and string literals.

use super::{ImportKind, ImportMatch, LineCounter};
use regex_lite::Regex;
use std::sync::OnceLock;

const FROM_PATTERN: &str = r#"from.*?['"`]([^\.].*?)['"`];"#;
const REQUIRE_PATTERN: &str = r#"require.*?['"`]([^\.].*?)['"`]\);"#;

fn from_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FROM_PATTERN).ok()).as_ref()
}

fn require_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REQUIRE_PATTERN).ok()).as_ref()
}

/// Match both patterns over `source`: all `from` statements first, then all
/// `require` calls.
#[must_use]
pub fn scan_patterns(source: &str) -> Vec<ImportMatch> {
    let mut out = Vec::new();
    if let Some(re) = from_regex() {
        collect(re, source, ImportKind::EsmFrom, &mut out);
    }
    if let Some(re) = require_regex() {
        collect(re, source, ImportKind::CjsRequire, &mut out);
    }
    out
}

fn collect(re: &Regex, source: &str, kind: ImportKind, out: &mut Vec<ImportMatch>) {
    let mut lines = LineCounter::new(source);
    for caps in re.captures_iter(source) {
        let (Some(whole), Some(spec)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(ImportMatch {
            statement: whole.as_str().to_string(),
            specifier: spec.as_str().to_string(),
            specifier_start: spec.start() - whole.start(),
            offset: whole.start(),
            kind,
            line: lines.line_at(whole.start()),
        });
    }
}
