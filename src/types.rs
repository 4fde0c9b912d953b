//! Shared types for the parsed export.
//!
//! These types are the contract between the core and its consumers (the CLI
//! here, an HTTP layer elsewhere) and are serialized to JSON at that boundary.
//! A `Workspace` is built whole and never mutated afterwards — consumers hold
//! it behind an `Arc` and every rebuild produces a complete replacement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry in the navigation tree: a page, dataset, section header, or
/// external link.
///
/// Invariants upheld by the scanner:
/// - `is_external` implies `file_path` is `None` and `external_url` is set.
/// - `file_path` being set implies `is_external` is false.
/// - `children` order follows the export's own ordering and is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavNode {
    /// Stable identifier, unique within the tree. The decoded unique id when
    /// the entry name carries one, otherwise the root-relative path (or the
    /// target URL for external links).
    pub id: String,
    /// Human-readable display name, with the unique-id suffix stripped.
    pub title: String,
    /// URL-safe path segment derived from the title. Unique among siblings
    /// in practice, but global uniqueness is not guaranteed.
    pub slug: String,
    /// Root-relative path to the backing document. Absent for section
    /// headers and external links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// True when the backing document is a CSV dataset export.
    #[serde(default)]
    pub is_csv: bool,
    /// True when this entry links out of the workspace.
    #[serde(default)]
    pub is_external: bool,
    /// Target of an external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Ordered child entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

/// Root container for one parsed export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    /// Ordered top-level entries, in root-index order.
    pub tree: Vec<NavNode>,
}

/// A parsed tabular dataset: header-derived column names plus rows keyed by
/// column name. Cells are kept as strings — the export carries no type
/// information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

/// The two related exports of one logical dataset.
///
/// `filtered` holds the rows as constrained by the export's saved view;
/// `all` holds the complete row set. The two files are parsed independently
/// and may disagree on columns and row counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvPair {
    pub filtered: CsvTable,
    pub all: CsvTable,
}

/// A loaded markdown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// First top-level heading, or a placeholder when the document has none.
    /// Not necessarily equal to the nav node title.
    pub title: String,
    /// Raw markdown body.
    pub content: String,
    /// Locally-resolvable image references, in document order, duplicates
    /// preserved. Targets with an absolute URL scheme are excluded. Paths
    /// are relative to the document's own directory, exactly as written.
    pub images: Vec<String>,
}

impl NavNode {
    /// Walk this node and all descendants depth-first, in order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NavNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

impl Workspace {
    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        for node in &self.tree {
            node.walk(&mut |_| count += 1);
        }
        count
    }
}
