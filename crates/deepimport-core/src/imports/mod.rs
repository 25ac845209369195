//! Import discovery for JavaScript/TypeScript source.
//!
//! Finds import/require statements whose specifier is bare (does not start
//! with `.`), keeping the verbatim statement text so it can be rewritten in
//! place later.

mod pattern;
mod scan;

pub use pattern::scan_patterns;
pub use scan::ImportScanner;

use crate::config::ScanMode;
use rustc_hash::FxHashSet as HashSet;
use serde::Serialize;

/// Shape of the statement a specifier was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import ... from '<spec>'` or `export ... from '<spec>'`.
    EsmFrom,
    /// `import '<spec>'`.
    EsmSideEffect,
    /// `import('<spec>')`.
    DynamicImport,
    /// `require('<spec>')`.
    CjsRequire,
}

impl ImportKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EsmFrom => "esm_from",
            Self::EsmSideEffect => "esm_side_effect",
            Self::DynamicImport => "dynamic_import",
            Self::CjsRequire => "cjs_require",
        }
    }
}

/// One import statement as it appears in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportMatch {
    /// Entire matched statement text, verbatim.
    pub statement: String,
    /// Module specifier without quotes.
    pub specifier: String,
    /// Byte offset of the specifier inside `statement`.
    pub specifier_start: usize,
    /// Byte offset of `statement` in the scanned source.
    pub offset: usize,
    pub kind: ImportKind,
    /// Line of the statement start (1-indexed).
    pub line: u32,
}

impl ImportMatch {
    /// `true` when the specifier names a package rather than a relative path.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        is_bare_specifier(&self.specifier)
    }

    /// Statement text with the specifier replaced by `replacement`.
    #[must_use]
    pub fn with_specifier(&self, replacement: &str) -> String {
        let end = self.specifier_start + self.specifier.len();
        let mut out = String::with_capacity(self.statement.len() + replacement.len());
        out.push_str(&self.statement[..self.specifier_start]);
        out.push_str(replacement);
        out.push_str(&self.statement[end..]);
        out
    }
}

/// Check whether a specifier is bare (`lodash`, `@scope/pkg`) rather than relative.
#[must_use]
pub fn is_bare_specifier(specifier: &str) -> bool {
    !specifier.is_empty() && !specifier.starts_with('.')
}

/// Find every statement with a bare specifier.
///
/// Results are in first-appearance order and deduplicated by statement text,
/// so repeated identical statements are reported once.
#[must_use]
pub fn find_bare_imports(source: &str, mode: ScanMode) -> Vec<ImportMatch> {
    let found: Vec<ImportMatch> = match mode {
        ScanMode::Lexical => ImportScanner::new(source).collect(),
        ScanMode::Pattern => scan_patterns(source),
    };

    let mut seen = HashSet::default();
    found
        .into_iter()
        .filter(ImportMatch::is_bare)
        .filter(|m| seen.insert(m.statement.clone()))
        .collect()
}

/// Line numbers (1-indexed) for byte offsets visited in increasing order.
struct LineCounter<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> LineCounter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, pos: usize) -> u32 {
        let pos = pos.min(self.bytes.len());
        if pos < self.pos {
            self.pos = 0;
            self.line = 1;
        }
        for &b in &self.bytes[self.pos..pos] {
            if b == b'\n' {
                self.line = self.line.saturating_add(1);
            }
        }
        self.pos = pos;
        self.line
    }
}
