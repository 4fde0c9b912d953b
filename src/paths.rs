//! Data-root path containment.
//!
//! Every file path the core touches is a root-relative string coming from a
//! parsed document or an incoming request, and is re-validated here before
//! any read. Validation is lexical — `.` and `..` components are resolved
//! without touching the filesystem — so a path is rejected for escaping the
//! root whether or not its target exists.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a root-relative path.
///
/// Resolves `.` and `..` components. Returns `None` when the path is
/// absolute, carries a Windows prefix, or walks above its starting point —
/// all of which would escape the data root.
pub fn normalize(rel: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

/// Resolve a root-relative path to an absolute path under `root`.
///
/// Returns `None` when the path escapes the root. Callers treat that
/// identically to not-found — the rejection must not reveal anything about
/// the filesystem outside the root.
pub fn resolve_under_root(root: &Path, rel: &Path) -> Option<PathBuf> {
    let normalized = normalize(rel)?;
    Some(root.join(normalized))
}
