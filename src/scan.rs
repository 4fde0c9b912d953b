//! Export tree parsing.
//!
//! Builds the full [`Workspace`] tree for an unpacked export. The export
//! carries its navigation in two places and this module stitches them
//! together:
//!
//! - `index.html` at the data root lists the top-level entries as an anchor
//!   list, in the order the workspace was arranged in the source tool.
//! - Each entry's nested children live on disk: a page file
//!   `Title <id>.md` with a same-stem directory `Title <id>/` has its
//!   sub-pages inside that directory, recursively.
//!
//! ## Directory Structure
//!
//! ```text
//! data/
//! ├── index.html                           # Root navigation description
//! ├── Getting Started 4a1b….md             # Top-level page
//! ├── Getting Started 4a1b…/               # … with nested sub-pages
//! │   ├── Deep Dive 9f8e….md
//! │   └── screenshot.png                   # Assets are not nav entries
//! ├── Board a1b2….csv                      # Dataset (view-filtered rows)
//! ├── Board a1b2…_all.csv                  # Complete variant (not listed)
//! └── Projects 77aa…/                      # Section: directory, no file
//!     └── Alpha 55cc….md
//! ```
//!
//! ## Classification
//!
//! Per entry: absolute-URL anchor → external link; `.csv` → dataset; `.md` →
//! page; directory without a same-stem file → section header. A page that is
//! both a file and a directory gets the file path and the children.
//!
//! ## Ordering
//!
//! Top-level order is the root index's anchor order. Child order is the
//! directory listing as the filesystem returns it — the export tool writes
//! entries in navigation order and the tree must not re-sort them.
//!
//! ## Failure semantics
//!
//! A missing or unreadable `index.html` is fatal: nothing can be resolved
//! without it. Everything below the root is best-effort — a malformed or
//! unreadable sub-entry is logged and skipped, and the rest of the tree
//! still builds.

use percent_encoding::percent_decode_str;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::naming;
use crate::paths;
use crate::types::{NavNode, Workspace};

/// Root navigation description, relative to the data root.
pub const INDEX_FILENAME: &str = "index.html";

/// Slug used when a title slugifies to nothing.
const FALLBACK_SLUG: &str = "untitled";

#[derive(Error, Debug)]
pub enum ScanError {
    /// The root index is missing or unreadable — no tree can be built.
    #[error("cannot read root index {path}: {source}")]
    RootIndex {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Parse the export under `data_root` into a workspace tree.
pub fn scan(data_root: &Path) -> Result<Workspace, ScanError> {
    let index_path = data_root.join(INDEX_FILENAME);
    let html = fs::read_to_string(&index_path).map_err(|source| ScanError::RootIndex {
        path: index_path.display().to_string(),
        source,
    })?;

    let index = parse_root_index(&html);
    let mut tree = Vec::new();
    for entry in &index.entries {
        if let Some(node) = node_for_entry(data_root, entry) {
            tree.push(node);
        }
    }

    let name = index
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| {
            data_root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "Workspace".to_string());

    debug!(nodes = tree.len(), name = %name, "export tree built");
    Ok(Workspace {
        id: non_empty_slug(&name),
        name,
        tree,
    })
}

/// One anchor from the root index, in document order.
struct RootEntry {
    label: String,
    href: String,
}

struct RootIndex {
    title: Option<String>,
    entries: Vec<RootEntry>,
}

fn parse_root_index(html: &str) -> RootIndex {
    let document = Html::parse_document(html);
    let title_sel = Selector::parse("title").unwrap();
    let anchor_sel = Selector::parse("a[href]").unwrap();

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());

    let entries = document
        .select(&anchor_sel)
        .filter_map(|el| {
            let href = el.value().attr("href")?.to_string();
            let label = el.text().collect::<String>().trim().to_string();
            Some(RootEntry { label, href })
        })
        .collect();

    RootIndex { title, entries }
}

/// Build the node for one root-index anchor. `None` means the entry was
/// skipped (logged); the rest of the tree still builds.
fn node_for_entry(data_root: &Path, entry: &RootEntry) -> Option<NavNode> {
    if entry.href.starts_with("http://") || entry.href.starts_with("https://") {
        let title = if entry.label.is_empty() {
            entry.href.clone()
        } else {
            entry.label.clone()
        };
        return Some(NavNode {
            id: entry.href.clone(),
            slug: non_empty_slug(&title),
            title,
            file_path: None,
            is_csv: false,
            is_external: true,
            external_url: Some(entry.href.clone()),
            children: vec![],
        });
    }

    let decoded = percent_decode_str(&entry.href).decode_utf8_lossy();
    let Some(rel) = paths::normalize(Path::new(decoded.as_ref())) else {
        warn!(href = %entry.href, "root entry escapes the data root, skipping");
        return None;
    };
    let abs = data_root.join(&rel);

    if abs.is_dir() {
        return Some(section_node(data_root, &rel));
    }
    if abs.is_file() {
        match node_for_file(data_root, &rel) {
            Some(node) => return Some(node),
            None => {
                warn!(path = %rel.display(), "root entry has unsupported type, skipping");
                return None;
            }
        }
    }

    warn!(href = %entry.href, path = %rel.display(), "root entry has no backing file, skipping");
    None
}

/// Build a page or dataset node from a `.md`/`.csv` file, attaching children
/// from a same-stem sibling directory when one exists. `None` for any other
/// file type.
fn node_for_file(data_root: &Path, rel: &Path) -> Option<NavNode> {
    let ext = rel
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let is_csv = match ext.as_str() {
        "md" => false,
        "csv" => true,
        _ => return None,
    };

    let stem = rel.file_stem()?.to_string_lossy();
    let parsed = naming::decode_entry_name(&stem);
    let title = if parsed.title.is_empty() {
        stem.to_string()
    } else {
        parsed.title
    };
    let rel_str = rel.to_string_lossy().into_owned();
    let id = parsed.unique_id.unwrap_or_else(|| rel_str.clone());

    // `Title <id>.md` next to `Title <id>/` means the page has sub-pages.
    let dir_rel = rel.parent().unwrap_or(Path::new("")).join(stem.as_ref());
    let children = if data_root.join(&dir_rel).is_dir() {
        scan_dir(data_root, &dir_rel)
    } else {
        vec![]
    };

    Some(NavNode {
        id,
        slug: non_empty_slug(&title),
        title,
        file_path: Some(rel_str),
        is_csv,
        is_external: false,
        external_url: None,
        children,
    })
}

/// Build a section-header node for a directory with no same-stem file.
fn section_node(data_root: &Path, rel: &Path) -> NavNode {
    let dir_name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parsed = naming::decode_entry_name(&dir_name);
    let title = if parsed.title.is_empty() {
        dir_name
    } else {
        parsed.title
    };
    let rel_str = rel.to_string_lossy().into_owned();

    NavNode {
        id: parsed.unique_id.unwrap_or(rel_str),
        slug: non_empty_slug(&title),
        title,
        file_path: None,
        is_csv: false,
        is_external: false,
        external_url: None,
        children: scan_dir(data_root, rel),
    }
}

/// Build the child nodes of a directory, in listing order.
fn scan_dir(data_root: &Path, rel_dir: &Path) -> Vec<NavNode> {
    let abs = data_root.join(rel_dir);
    let entries = match fs::read_dir(&abs) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %rel_dir.display(), error = %err, "cannot list directory, skipping subtree");
            return vec![];
        }
    };

    // Collected up front so sibling lookups (file ↔ same-stem directory,
    // filtered ↔ _all variant) don't re-stat the directory per entry.
    let mut listing: Vec<(OsString, PathBuf)> = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => listing.push((entry.file_name(), entry.path())),
            Err(err) => {
                warn!(path = %rel_dir.display(), error = %err, "unreadable directory entry, skipping");
            }
        }
    }
    let names: HashSet<&OsString> = listing.iter().map(|(name, _)| name).collect();
    let has_sibling = |name: String| names.contains(&OsString::from(name));

    let mut nodes = Vec::new();
    for (name, abs_path) in &listing {
        let name_str = name.to_string_lossy();
        if name_str.starts_with('.') {
            continue;
        }
        let rel = rel_dir.join(name);

        if abs_path.is_dir() {
            // A same-stem file owns this directory as its children.
            if has_sibling(format!("{name_str}.md")) || has_sibling(format!("{name_str}.csv")) {
                continue;
            }
            nodes.push(section_node(data_root, &rel));
            continue;
        }

        let Some(stem) = rel.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let ext = rel
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        // The complete variant of a dataset pairs with its base file rather
        // than appearing as its own entry.
        if ext == "csv"
            && let Some(base) = stem.strip_suffix(crate::dataset::ALL_MARKER)
            && has_sibling(format!("{base}.csv"))
        {
            continue;
        }

        if ext == "md" || ext == "csv" {
            if let Some(node) = node_for_file(data_root, &rel) {
                nodes.push(node);
            }
        }
        // Anything else (images, attachments) is content, not navigation.
    }

    nodes
}

/// Slug for a title, with a stable fallback so no node ends up unaddressable.
fn non_empty_slug(title: &str) -> String {
    let slug = naming::slugify(title);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
