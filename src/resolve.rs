//! Identifier resolution: slugs and unique-id fragments to content.
//!
//! A request arrives as an opaque string — a slug (`getting-started`), or a
//! slug with a trailing id fragment (`some-page-a1b2c3d4`). Resolution runs
//! in two passes:
//!
//! 1. **Tree pass** — depth-first slug match over the workspace tree. First
//!    match wins; slugs are unique per sibling set in practice but global
//!    uniqueness is not guaranteed, so this is a documented
//!    first-match-wins contract rather than a uniqueness guarantee.
//! 2. **Disk pass** — when the tree pass misses and the request carries a
//!    trailing dash token of at least eight characters, that token is
//!    matched as a unique-id fragment against a walk of the data root.
//!    The walk is file-name-sorted so the first match is deterministic, and
//!    it covers files the tree never lists (datasets and orphaned pages).
//!
//! Failures distinguish "nothing matches" from "matched but unreadable" so
//! a serving layer can answer 404 vs 500. Containment violations surface as
//! not-found — they reveal nothing about the filesystem outside the root.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::dataset::{self, DatasetError};
use crate::naming;
use crate::page;
use crate::paths;
use crate::types::{CsvPair, NavNode, PageContent};

#[derive(Error, Debug)]
pub enum ResolveError {
    /// No node or file matches the request. The 404 class.
    #[error("nothing in the export matches '{0}'")]
    NotFound(String),
    /// A matching file exists but could not be read. The 500 class.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// A matching dataset exists but is not parseable delimited text.
    #[error("malformed dataset {path}: {reason}")]
    Malformed { path: String, reason: String },
}

impl ResolveError {
    /// Whether this failure should be presented as an absent resource
    /// rather than a server-side fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// What kind of file a disk-pass lookup is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Page,
    Dataset,
}

impl FileKind {
    fn matches_ext(self, ext: &str) -> bool {
        match self {
            FileKind::Page => ext == "md",
            FileKind::Dataset => ext == "csv",
        }
    }
}

/// One ancestor entry for breadcrumb rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub title: String,
    pub slug: String,
}

/// A resolved page: content plus the ancestor chain and the slug the page
/// is addressable under.
#[derive(Debug, Clone, Serialize)]
pub struct PageResolution {
    pub slug: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub page: PageContent,
}

/// A resolved dataset pair plus the root-relative path it was loaded from.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetResolution {
    pub file_path: String,
    pub pair: CsvPair,
}

// ============================================================================
// Tree pass
// ============================================================================

/// Depth-first slug search. First match wins.
pub fn find_node_by_slug<'a>(tree: &'a [NavNode], slug: &str) -> Option<&'a NavNode> {
    find_with_trail(tree, &mut Vec::new(), &|n| n.slug == slug).map(|(_, node)| node)
}

/// Depth-first search returning the matched node and its ancestor chain,
/// outermost first.
pub fn find_node_with_trail<'a>(
    tree: &'a [NavNode],
    slug: &str,
) -> Option<(Vec<&'a NavNode>, &'a NavNode)> {
    find_with_trail(tree, &mut Vec::new(), &|n| n.slug == slug)
}

fn find_with_trail<'a>(
    nodes: &'a [NavNode],
    trail: &mut Vec<&'a NavNode>,
    pred: &impl Fn(&NavNode) -> bool,
) -> Option<(Vec<&'a NavNode>, &'a NavNode)> {
    for node in nodes {
        if pred(node) {
            return Some((trail.clone(), node));
        }
        trail.push(node);
        if let Some(found) = find_with_trail(&node.children, trail, pred) {
            return Some(found);
        }
        trail.pop();
    }
    None
}

// ============================================================================
// Disk pass
// ============================================================================

/// Extract the candidate unique-id fragment from a request string: the
/// trailing dash-delimited token, when it is at least eight characters.
pub fn id_fragment(request: &str) -> Option<&str> {
    let tail = request.rsplit('-').next()?;
    (tail.len() >= naming::MIN_ID_LEN).then_some(tail)
}

/// Scan the data root for a file of `kind` whose decoded unique id contains
/// `fragment`, case-insensitively. Dashes are stripped from the fragment
/// before matching; fragments shorter than eight characters never match.
///
/// The walk is sorted by file name, so when several files satisfy the same
/// fragment the first in traversal order wins — a deliberate best-effort
/// contract, not a uniqueness guarantee.
pub fn find_file_by_unique_id(
    data_root: &Path,
    fragment: &str,
    kind: FileKind,
) -> Option<PathBuf> {
    let needle = fragment.replace('-', "").to_lowercase();
    if needle.len() < naming::MIN_ID_LEN {
        return None;
    }

    for entry in WalkDir::new(data_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !kind.matches_ext(&ext) {
            continue;
        }
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy()) else {
            continue;
        };
        // The `_all` dataset variant decodes through its base name.
        let base = match kind {
            FileKind::Dataset => stem
                .strip_suffix(dataset::ALL_MARKER)
                .unwrap_or(stem.as_ref()),
            FileKind::Page => stem.as_ref(),
        };
        if let Some(id) = naming::decode_entry_name(base).unique_id
            && id.to_lowercase().contains(&needle)
        {
            debug!(fragment = %fragment, path = %path.display(), "fragment matched");
            return path.strip_prefix(data_root).ok().map(Path::to_path_buf);
        }
    }
    None
}

// ============================================================================
// Resolution operations
// ============================================================================

/// Resolve a request to a page: slug lookup over `tree`, then unique-id
/// fragment matching against the data root.
pub fn resolve_page(
    data_root: &Path,
    tree: &[NavNode],
    request: &str,
) -> Result<PageResolution, ResolveError> {
    if let Some((trail, node)) = find_node_with_trail(tree, request)
        && !node.is_csv
        && let Some(rel) = node.file_path.as_deref()
    {
        let content = load_page(data_root, Path::new(rel), request)?;
        return Ok(PageResolution {
            slug: node.slug.clone(),
            breadcrumbs: crumbs(&trail),
            page: content,
        });
    }

    if let Some(fragment) = id_fragment(request)
        && let Some(rel) = find_file_by_unique_id(data_root, fragment, FileKind::Page)
    {
        let content = load_page(data_root, &rel, request)?;
        // The file may still be reachable through the tree; if so, keep its
        // canonical slug and breadcrumb chain.
        let rel_str = rel.to_string_lossy();
        let by_path = find_with_trail(tree, &mut Vec::new(), &|n| {
            n.file_path.as_deref() == Some(rel_str.as_ref())
        });
        let (slug, breadcrumbs) = match by_path {
            Some((trail, node)) => (node.slug.clone(), crumbs(&trail)),
            None => {
                let stem = rel
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let title = naming::decode_entry_name(&stem).title;
                (naming::slugify(&title), vec![])
            }
        };
        return Ok(PageResolution {
            slug,
            breadcrumbs,
            page: content,
        });
    }

    Err(ResolveError::NotFound(request.to_string()))
}

/// Resolve a request to a dataset pair: slug lookup for a CSV node, then
/// unique-id fragment matching against the data root.
pub fn resolve_dataset(
    data_root: &Path,
    tree: &[NavNode],
    request: &str,
) -> Result<DatasetResolution, ResolveError> {
    let rel = match find_node_by_slug(tree, request) {
        Some(node) if node.is_csv => node.file_path.as_deref().map(PathBuf::from),
        _ => None,
    };
    let rel = match rel {
        Some(rel) => rel,
        None => id_fragment(request)
            .and_then(|fragment| find_file_by_unique_id(data_root, fragment, FileKind::Dataset))
            .ok_or_else(|| ResolveError::NotFound(request.to_string()))?,
    };

    let pair = dataset::load_pair(data_root, &rel).map_err(|err| match err {
        DatasetError::NotFound(_) => ResolveError::NotFound(request.to_string()),
        DatasetError::Io { path, source } => ResolveError::Io { path, source },
        DatasetError::Malformed { path, reason } => ResolveError::Malformed { path, reason },
    })?;

    Ok(DatasetResolution {
        file_path: rel.to_string_lossy().into_owned(),
        pair,
    })
}

/// Read and extract a page body, with the not-found / unreadable split.
fn load_page(data_root: &Path, rel: &Path, request: &str) -> Result<PageContent, ResolveError> {
    let Some(abs) = paths::resolve_under_root(data_root, rel) else {
        return Err(ResolveError::NotFound(request.to_string()));
    };
    match fs::read_to_string(&abs) {
        Ok(content) => Ok(page::extract(&content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ResolveError::NotFound(request.to_string()))
        }
        Err(err) => Err(ResolveError::Io {
            path: rel.display().to_string(),
            source: err,
        }),
    }
}

fn crumbs(trail: &[&NavNode]) -> Vec<Breadcrumb> {
    trail
        .iter()
        .map(|n| Breadcrumb {
            title: n.title.clone(),
            slug: n.slug.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan;
    use crate::test_helpers::*;
    use std::fs;

    #[test]
    fn slug_lookup_finds_nested_node() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let node = find_node_by_slug(&ws.tree, "deep-dive").unwrap();
        assert_eq!(node.title, "Deep Dive");
    }

    #[test]
    fn unknown_slug_is_not_found_not_a_crash() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let err = resolve_page(tmp.path(), &ws.tree, "unknown-page").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn page_resolution_carries_breadcrumbs() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let resolved = resolve_page(tmp.path(), &ws.tree, "deep-dive").unwrap();
        assert_eq!(resolved.slug, "deep-dive");
        assert_eq!(
            resolved.breadcrumbs,
            vec![Breadcrumb {
                title: "Getting Started".into(),
                slug: "getting-started".into(),
            }]
        );
        assert_eq!(resolved.page.title, "Deep Dive");
    }

    #[test]
    fn top_level_page_has_empty_breadcrumbs() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let resolved = resolve_page(tmp.path(), &ws.tree, "getting-started").unwrap();
        assert!(resolved.breadcrumbs.is_empty());
    }

    #[test]
    fn orphaned_file_resolves_by_fragment() {
        // The file is on disk but listed nowhere in the nav tree.
        let tmp = std_export();
        write_file(
            tmp.path(),
            "Some Page-a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6.md",
            "# Some Page\n",
        );
        let ws = scan::scan(tmp.path()).unwrap();

        let resolved = resolve_page(tmp.path(), &ws.tree, "page-a1b2c3d4").unwrap();
        assert_eq!(resolved.page.title, "Some Page");
        assert_eq!(resolved.slug, "some-page");
        assert!(resolved.breadcrumbs.is_empty());
    }

    #[test]
    fn fragment_matching_is_case_insensitive() {
        let tmp = std_export();
        write_file(
            tmp.path(),
            "Some Page-a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6.md",
            "# Some Page\n",
        );
        let ws = scan::scan(tmp.path()).unwrap();

        let resolved = resolve_page(tmp.path(), &ws.tree, "page-A1B2C3D4E5F6").unwrap();
        assert_eq!(resolved.page.title, "Some Page");
    }

    #[test]
    fn short_fragment_is_rejected_even_when_it_would_match() {
        let tmp = std_export();
        write_file(
            tmp.path(),
            "Some Page-a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6.md",
            "# Some Page\n",
        );
        let ws = scan::scan(tmp.path()).unwrap();

        let err = resolve_page(tmp.path(), &ws.tree, "page-a1b2c3d").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn dashed_fragment_matches_after_delimiter_stripping() {
        let tmp = std_export();
        write_file(
            tmp.path(),
            "Some Page-a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6.md",
            "# Some Page\n",
        );

        let found = find_file_by_unique_id(tmp.path(), "a1b2-c3d4", FileKind::Page);
        assert!(found.is_some());
        assert!(find_file_by_unique_id(tmp.path(), "a1b2-c3", FileKind::Page).is_none());
    }

    #[test]
    fn first_match_in_sorted_walk_wins() {
        let tmp = tempdir();
        write_index(tmp.path(), "Demo", &[]);
        write_file(tmp.path(), "Bbb deadbeef00000001.md", "# Bbb\n");
        write_file(tmp.path(), "Aaa deadbeef00000002.md", "# Aaa\n");

        let found = find_file_by_unique_id(tmp.path(), "deadbeef", FileKind::Page).unwrap();
        assert_eq!(found, PathBuf::from("Aaa deadbeef00000002.md"));
    }

    #[test]
    fn fragment_pass_respects_file_kind() {
        let tmp = tempdir();
        write_index(tmp.path(), "Demo", &[]);
        write_file(tmp.path(), "Doc feedface00112233.md", "# Doc\n");

        assert!(find_file_by_unique_id(tmp.path(), "feedface", FileKind::Dataset).is_none());
        assert!(find_file_by_unique_id(tmp.path(), "feedface", FileKind::Page).is_some());
    }

    #[test]
    fn tree_listed_file_that_vanished_is_not_found() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();
        fs::remove_file(tmp.path().join(getting_started_file())).unwrap();

        let err = resolve_page(tmp.path(), &ws.tree, "getting-started").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn dataset_resolves_by_slug() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let resolved = resolve_dataset(tmp.path(), &ws.tree, "board").unwrap();
        assert_eq!(resolved.pair.filtered.columns, vec!["Name", "Status"]);
        assert!(resolved.pair.all.rows.len() >= resolved.pair.filtered.rows.len());
    }

    #[test]
    fn dataset_resolves_by_fragment() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let by_slug = resolve_dataset(tmp.path(), &ws.tree, "board").unwrap();
        let by_fragment = resolve_dataset(tmp.path(), &ws.tree, &format!("x-{}", uid(3)))
            .unwrap();
        assert_eq!(by_slug.pair, by_fragment.pair);
    }

    #[test]
    fn page_request_does_not_resolve_dataset_node() {
        let tmp = std_export();
        let ws = scan::scan(tmp.path()).unwrap();

        let err = resolve_page(tmp.path(), &ws.tree, "board").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_dataset_is_distinguished_from_not_found() {
        let tmp = tempdir();
        let name = format!("Bad {}.csv", uid(9));
        write_index(tmp.path(), "Demo", &[("Bad", &encode(&name))]);
        write_file(tmp.path(), &name, "A\n\"unterminated\n");
        let ws = scan::scan(tmp.path()).unwrap();

        let err = resolve_dataset(tmp.path(), &ws.tree, "bad").unwrap_err();
        assert!(matches!(err, ResolveError::Malformed { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn id_fragment_extraction() {
        assert_eq!(id_fragment("page-a1b2c3d4"), Some("a1b2c3d4"));
        assert_eq!(id_fragment("a1b2c3d4e5"), Some("a1b2c3d4e5"));
        assert_eq!(id_fragment("page-short"), None);
        assert_eq!(id_fragment(""), None);
    }
}
