//! Path helpers for building module specifiers.

use std::path::{Component, Path, PathBuf};

/// Express `target` relative to `base`.
///
/// Paths outside `base` get `..` segments. When no relative form exists (one
/// path absolute, the other not) `target` is returned unchanged.
#[must_use]
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf())
}

/// Drop the extension of the final path component (`lib/moment.js` -> `lib/moment`).
///
/// Only the last extension goes: `rxjs/bundles/rx.min.js` -> `rxjs/bundles/rx.min`.
#[must_use]
pub fn strip_extension(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Render a path with `/` separators regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            Component::CurDir => {}
            Component::ParentDir => push_segment(&mut out, ".."),
            Component::Normal(name) => push_segment(&mut out, &name.to_string_lossy()),
        }
    }
    out
}

fn push_segment(out: &mut String, segment: &str) {
    if !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(segment);
}
