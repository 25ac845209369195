//! Picking the file a bare specifier refers to.

use crate::config::TieBreak;
use std::path::Path;

/// Directory name of the dependency store inside a package scope.
const STORE_DIR: &str = "node_modules";

/// Candidates whose path contains `specifier`, in candidate order.
#[must_use]
pub fn filter_candidates<'c>(candidates: &[&'c str], specifier: &str) -> Vec<&'c str> {
    candidates
        .iter()
        .copied()
        .filter(|path| path.contains(specifier))
        .collect()
}

/// Resolve `specifier`, written in `importer`, to one of `candidates`.
///
/// `None` when no candidate matches; the statement is then left alone.
#[must_use]
pub fn select_deep_import<'c>(
    candidates: &[&'c str],
    importer: &str,
    specifier: &str,
    tie_break: TieBreak,
) -> Option<&'c str> {
    let matches = filter_candidates(candidates, specifier);
    match matches.as_slice() {
        [] => None,
        [only] => Some(*only),
        [first, ..] => match tie_break {
            TieBreak::First => Some(*first),
            TieBreak::NearestScope => {
                Some(nearest_scope(&matches, importer, specifier).unwrap_or(*first))
            }
        },
    }
}

/// The match inside the `node_modules` closest above `importer`.
fn nearest_scope<'c>(matches: &[&'c str], importer: &str, specifier: &str) -> Option<&'c str> {
    for dir in Path::new(importer).ancestors().skip(1) {
        let package_dir = dir.join(STORE_DIR).join(specifier);
        if let Some(found) = matches
            .iter()
            .find(|m| Path::new(m).starts_with(&package_dir))
        {
            return Some(*found);
        }
    }
    None
}
